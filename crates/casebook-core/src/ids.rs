//! Prefixed, time-ordered identifiers.
//!
//! Every row id is `{prefix}-{uuid-v7}`. The prefix makes ids self-describing
//! in logs and activity metadata; the v7 payload keeps them roughly sortable
//! by creation time.

use uuid::Uuid;

/// Entity prefixes used when minting ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    /// A legal case.
    Case,
    /// A workflow step inside a case.
    Step,
    /// A legacy milestone.
    Milestone,
    /// A time entry.
    TimeEntry,
    /// A comment.
    Comment,
    /// A legal reference.
    LegalReference,
    /// A user.
    User,
    /// An activity record.
    Activity,
}

impl IdPrefix {
    /// The literal prefix string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Step => "step",
            Self::Milestone => "ms",
            Self::TimeEntry => "time",
            Self::Comment => "cmt",
            Self::LegalReference => "ref",
            Self::User => "user",
            Self::Activity => "act",
        }
    }
}

/// Generate a prefixed UUID v7 id.
#[must_use]
pub fn generate_id(prefix: IdPrefix) -> String {
    format!("{}-{}", prefix.as_str(), Uuid::now_v7())
}
