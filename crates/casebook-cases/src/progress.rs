//! Derived case progress.

/// Percentage of completed items, rounded half up; `0` when `total` is `0`.
pub fn compute_progress(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = u64::from(completed.min(total));
    let total = u64::from(total);
    // round(100 * c / t) == floor((200 * c + t) / (2 * t))
    let pct = (200 * completed + total) / (2 * total);
    u32::try_from(pct).unwrap_or(100)
}
