//! Workflow step operations: create, toggle, reorder, delete.

use std::collections::HashSet;

use rusqlite::Connection;
use serde_json::{Value, json};
use tracing::debug;

use casebook_core::now_iso;

use super::{
    CaseService, DeleteStepOptions, normalize_date, recompute_step_progress, require_assignee,
    require_case, required_text, with_immediate,
};
use crate::errors::CaseError;
use crate::repository::CaseRepository;
use crate::types::{
    ActivityKind, Identity, LogActivityParams, WorkflowStep, WorkflowStepCreateParams,
};

/// Extract the `stepIds` array from a reorder request body.
///
/// Anything other than an array of strings is a validation error.
pub fn parse_step_ids(body: &Value) -> Result<Vec<String>, CaseError> {
    let invalid = || CaseError::Validation("stepIds must be an array".to_string());
    let items = body
        .get("stepIds")
        .and_then(Value::as_array)
        .ok_or_else(invalid)?;
    items
        .iter()
        .map(|item| item.as_str().map(String::from).ok_or_else(invalid))
        .collect()
}

impl CaseService {
    // ─────────────────────────────────────────────────────────────────────
    // Workflow steps
    // ─────────────────────────────────────────────────────────────────────

    /// List the steps of a case in order.
    pub fn list_workflow_steps(
        conn: &Connection,
        case_id: &str,
    ) -> Result<Vec<WorkflowStep>, CaseError> {
        require_case(conn, case_id)?;
        CaseRepository::list_steps(conn, case_id)
    }

    /// Append a step after the current last one.
    pub fn create_workflow_step(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        params: &WorkflowStepCreateParams,
    ) -> Result<WorkflowStep, CaseError> {
        let title = required_text(&params.title, "Title")?.to_string();
        if params.estimated_hours.is_some_and(|h| h < 0.0) {
            return Err(CaseError::Validation(
                "Estimated hours cannot be negative".to_string(),
            ));
        }
        let due_date = params
            .due_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(normalize_date)
            .transpose()?;
        let params = WorkflowStepCreateParams {
            title: title.clone(),
            due_date,
            ..params.clone()
        };

        with_immediate(conn, |tx| {
            require_case(tx, case_id)?;
            require_assignee(tx, params.assigned_to_id.as_deref())?;
            let order = CaseRepository::max_step_order(tx, case_id)? + 1;
            let step = CaseRepository::insert_step(tx, case_id, &params, order)?;

            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind: ActivityKind::WorkflowStepCreated,
                    description: format!("Workflow step \"{title}\" added"),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({ "stepId": step.id, "stepTitle": step.title })),
                },
            )?;

            debug!(case_id, step_id = %step.id, order, "workflow step created");
            Ok(step)
        })
    }

    /// Flip a step's completion and recompute case progress.
    pub fn toggle_workflow_step(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        step_id: &str,
    ) -> Result<WorkflowStep, CaseError> {
        with_immediate(conn, |tx| {
            let current = CaseRepository::get_step(tx, case_id, step_id)?
                .ok_or_else(|| CaseError::step_not_found(step_id))?;

            let completed = !current.completed;
            let completed_at = completed.then(now_iso);
            let _ = CaseRepository::set_step_completed(
                tx,
                case_id,
                step_id,
                completed,
                completed_at.as_deref(),
            )?;
            let progress = recompute_step_progress(tx, case_id)?;

            let (kind, verb) = if completed {
                (ActivityKind::WorkflowStepCompleted, "completed")
            } else {
                (ActivityKind::WorkflowStepReopened, "reopened")
            };
            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind,
                    description: format!("Workflow step \"{}\" {verb}", current.title),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({
                        "stepId": step_id,
                        "stepTitle": current.title,
                        "completed": completed,
                    })),
                },
            )?;

            debug!(case_id, step_id, completed, progress, "workflow step toggled");
            CaseRepository::get_step(tx, case_id, step_id)?
                .ok_or_else(|| CaseError::step_not_found(step_id))
        })
    }

    /// Renumber steps to match `step_ids`: position `i` gets order `i + 1`.
    ///
    /// Steps of the case that are not listed keep their previous order. An
    /// id that matches no step of the case rolls back every update.
    pub fn reorder_workflow_steps(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        step_ids: &[String],
    ) -> Result<(), CaseError> {
        let mut seen = HashSet::with_capacity(step_ids.len());
        if let Some(dup) = step_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(CaseError::Validation(format!(
                "Duplicate step id in stepIds: {dup}"
            )));
        }

        with_immediate(conn, |tx| {
            require_case(tx, case_id)?;
            for (index, step_id) in step_ids.iter().enumerate() {
                let order = u32::try_from(index + 1)
                    .map_err(|_| CaseError::Validation("Too many steps".to_string()))?;
                if !CaseRepository::set_step_order(tx, case_id, step_id, order)? {
                    return Err(CaseError::step_not_found(step_id));
                }
            }

            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind: ActivityKind::WorkflowReordered,
                    description: "Workflow steps reordered".to_string(),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({ "stepCount": step_ids.len() })),
                },
            )?;

            debug!(case_id, step_count = step_ids.len(), "workflow steps reordered");
            Ok(())
        })
    }

    /// Remove a step. Other steps keep their orders and dependency lists.
    pub fn delete_workflow_step(
        conn: &mut Connection,
        actor: &Identity,
        case_id: &str,
        step_id: &str,
        options: DeleteStepOptions,
    ) -> Result<(), CaseError> {
        with_immediate(conn, |tx| {
            let step = CaseRepository::get_step(tx, case_id, step_id)?
                .ok_or_else(|| CaseError::step_not_found(step_id))?;
            let _ = CaseRepository::delete_step(tx, case_id, step_id)?;
            if options.recompute_progress {
                let _ = recompute_step_progress(tx, case_id)?;
            }

            let _ = CaseRepository::log_activity(
                tx,
                &LogActivityParams {
                    kind: ActivityKind::WorkflowStepDeleted,
                    description: format!("Workflow step \"{}\" deleted", step.title),
                    user_id: actor.user_id.clone(),
                    case_id: Some(case_id.to_string()),
                    metadata: Some(json!({ "stepTitle": step.title })),
                },
            )?;

            debug!(case_id, step_id, "workflow step deleted");
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::repository::test_support::{identity_for, seed_case, seed_user, setup_db};
    use crate::types::Case;

    struct Fixture {
        conn: Connection,
        actor: Identity,
        case: Case,
    }

    fn fixture() -> Fixture {
        let conn = setup_db();
        let user = seed_user(&conn, "dana@firm.test");
        let case = seed_case(&conn, &user, "Smith v. Jones");
        Fixture {
            actor: identity_for(&user),
            conn,
            case,
        }
    }

    fn add(f: &mut Fixture, title: &str) -> WorkflowStep {
        CaseService::create_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &WorkflowStepCreateParams {
                title: title.to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn progress(f: &Fixture) -> u32 {
        CaseRepository::get_case(&f.conn, &f.case.id)
            .unwrap()
            .unwrap()
            .progress
    }

    fn activity_count(f: &Fixture) -> u32 {
        CaseRepository::count_case_activity(&f.conn, &f.case.id).unwrap()
    }

    fn orders(f: &Fixture) -> Vec<(String, u32)> {
        CaseRepository::list_steps(&f.conn, &f.case.id)
            .unwrap()
            .into_iter()
            .map(|s| (s.title, s.order))
            .collect()
    }

    // --- parse_step_ids ---

    #[test]
    fn parse_step_ids_accepts_string_array() {
        let ids = parse_step_ids(&json!({ "stepIds": ["a", "b"] })).unwrap();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn parse_step_ids_rejects_non_array() {
        for body in [
            json!({ "stepIds": "a,b" }),
            json!({ "stepIds": null }),
            json!({}),
            json!({ "stepIds": [1, 2] }),
        ] {
            let err = parse_step_ids(&body).unwrap_err();
            assert_eq!(err.to_string(), "Validation error: stepIds must be an array");
        }
    }

    // --- Creation ---

    #[test]
    fn create_appends_after_max_order() {
        let mut f = fixture();
        let a = add(&mut f, "Intake");
        let b = add(&mut f, "Discovery");
        assert_eq!(a.order, 1);
        assert_eq!(b.order, 2);
        assert!(b.dependencies.is_empty());

        // A gap left by deletion does not get reused.
        CaseService::delete_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &a.id,
            DeleteStepOptions::default(),
        )
        .unwrap();
        let c = add(&mut f, "Trial");
        assert_eq!(c.order, 3);
    }

    #[test]
    fn create_logs_one_activity() {
        let mut f = fixture();
        let step = add(&mut f, "Intake");
        let activity = CaseRepository::list_case_activity(&f.conn, &f.case.id, 10).unwrap();
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].activity_type, "workflow_step_created");
        assert_eq!(activity[0].description, "Workflow step \"Intake\" added");
        assert_eq!(activity[0].user_id, f.actor.user_id);
        let meta = activity[0].metadata.as_ref().unwrap();
        assert_eq!(meta["stepId"], step.id);
        assert_eq!(meta["stepTitle"], "Intake");
    }

    #[test]
    fn create_rejects_blank_title() {
        let mut f = fixture();
        let err = CaseService::create_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &WorkflowStepCreateParams {
                title: "   ".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_matches!(err, CaseError::Validation(_));
        assert_eq!(activity_count(&f), 0);
    }

    #[test]
    fn create_on_missing_case_is_not_found() {
        let mut f = fixture();
        let err = CaseService::create_workflow_step(
            &mut f.conn,
            &f.actor,
            "case-missing",
            &WorkflowStepCreateParams {
                title: "Intake".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_matches!(err, CaseError::NotFound { entity: "Case", .. });
    }

    #[test]
    fn create_with_unknown_assignee_is_not_found() {
        let mut f = fixture();
        let err = CaseService::create_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &WorkflowStepCreateParams {
                title: "Intake".to_string(),
                assigned_to_id: Some("user-ghost".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_matches!(
            err,
            CaseError::NotFound { entity: "User", ref id } if id == "user-ghost"
        );
        assert!(orders(&f).is_empty());
        assert_eq!(activity_count(&f), 0);
    }

    #[test]
    fn create_with_known_assignee() {
        let mut f = fixture();
        let lee = seed_user(&f.conn, "lee@firm.test");
        let step = CaseService::create_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &WorkflowStepCreateParams {
                title: "Intake".to_string(),
                assigned_to_id: Some(lee.id.clone()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(step.assigned_to_id.as_deref(), Some(lee.id.as_str()));
        assert_eq!(activity_count(&f), 1);
    }

    #[test]
    fn create_normalizes_due_date() {
        let mut f = fixture();
        let step = CaseService::create_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &WorkflowStepCreateParams {
                title: "File answer".to_string(),
                due_date: Some("2026-11-02T17:00:00Z".to_string()),
                estimated_hours: Some(3.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(step.due_date.as_deref(), Some("2026-11-02"));
        assert_eq!(step.estimated_hours, Some(3.0));
    }

    #[test]
    fn create_rejects_negative_estimate() {
        let mut f = fixture();
        let err = CaseService::create_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &WorkflowStepCreateParams {
                title: "x".to_string(),
                estimated_hours: Some(-1.0),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_matches!(err, CaseError::Validation(_));
    }

    // --- Toggle ---

    #[test]
    fn toggle_sets_and_clears_completed_at() {
        let mut f = fixture();
        let step = add(&mut f, "Intake");

        let done =
            CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &f.case.id, &step.id).unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        let reopened =
            CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &f.case.id, &step.id).unwrap();
        assert!(!reopened.completed);
        assert!(reopened.completed_at.is_none());

        let activity = CaseRepository::list_case_activity(&f.conn, &f.case.id, 10).unwrap();
        assert_eq!(activity[0].activity_type, "workflow_step_reopened");
        assert_eq!(activity[0].metadata.as_ref().unwrap()["completed"], false);
        assert_eq!(activity[1].activity_type, "workflow_step_completed");
        assert_eq!(
            activity[1].description,
            "Workflow step \"Intake\" completed"
        );
    }

    #[test]
    fn toggle_all_then_untoggle_all() {
        let mut f = fixture();
        let steps: Vec<_> = ["a", "b", "c"].iter().map(|t| add(&mut f, t)).collect();

        for step in &steps {
            CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &f.case.id, &step.id)
                .unwrap();
        }
        assert_eq!(progress(&f), 100);

        for step in &steps {
            CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &f.case.id, &step.id)
                .unwrap();
        }
        assert_eq!(progress(&f), 0);
    }

    #[test]
    fn progress_rounds_thirds() {
        let mut f = fixture();
        let a = add(&mut f, "a");
        let b = add(&mut f, "b");
        add(&mut f, "c");
        CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &f.case.id, &a.id).unwrap();
        assert_eq!(progress(&f), 33);
        CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &f.case.id, &b.id).unwrap();
        assert_eq!(progress(&f), 67);
    }

    #[test]
    fn toggle_step_from_other_case_is_not_found() {
        let mut f = fixture();
        let step = add(&mut f, "Intake");
        let user = CaseRepository::get_user(&f.conn, &f.actor.user_id)
            .unwrap()
            .unwrap();
        let other = seed_case(&f.conn, &user, "Other");

        let err = CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &other.id, &step.id)
            .unwrap_err();
        assert_matches!(err, CaseError::NotFound { entity: "Workflow step", .. });
        assert_eq!(CaseRepository::count_case_activity(&f.conn, &other.id).unwrap(), 0);
    }

    #[test]
    fn two_step_scenario() {
        let mut f = fixture();
        let a = add(&mut f, "A");
        let b = add(&mut f, "B");
        assert_eq!((a.order, b.order), (1, 2));

        CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &f.case.id, &a.id).unwrap();
        assert_eq!(progress(&f), 50);

        CaseService::reorder_workflow_steps(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &[b.id.clone(), a.id.clone()],
        )
        .unwrap();
        assert_eq!(orders(&f), [("B".to_string(), 1), ("A".to_string(), 2)]);

        CaseService::delete_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &b.id,
            DeleteStepOptions::default(),
        )
        .unwrap();
        // Progress is not recomputed on delete by default.
        assert_eq!(progress(&f), 50);
        assert_eq!(orders(&f), [("A".to_string(), 2)]);

        let types: Vec<_> = CaseRepository::list_case_activity(&f.conn, &f.case.id, 10)
            .unwrap()
            .into_iter()
            .rev()
            .map(|a| a.activity_type)
            .collect();
        assert_eq!(
            types,
            [
                "workflow_step_created",
                "workflow_step_created",
                "workflow_step_completed",
                "workflow_reordered",
                "workflow_step_deleted",
            ]
        );
    }

    // --- Reorder ---

    #[test]
    fn reorder_is_idempotent() {
        let mut f = fixture();
        let ids: Vec<_> = ["a", "b", "c"].iter().map(|t| add(&mut f, t).id).collect();
        let permuted = vec![ids[2].clone(), ids[0].clone(), ids[1].clone()];

        CaseService::reorder_workflow_steps(&mut f.conn, &f.actor, &f.case.id, &permuted).unwrap();
        let first = orders(&f);
        CaseService::reorder_workflow_steps(&mut f.conn, &f.actor, &f.case.id, &permuted).unwrap();
        assert_eq!(orders(&f), first);
        assert_eq!(
            first,
            [
                ("c".to_string(), 1),
                ("a".to_string(), 2),
                ("b".to_string(), 3)
            ]
        );
    }

    #[test]
    fn reorder_leaves_unlisted_steps_alone() {
        let mut f = fixture();
        let a = add(&mut f, "a");
        add(&mut f, "b");
        let c = add(&mut f, "c");

        CaseService::reorder_workflow_steps(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &[c.id.clone(), a.id.clone()],
        )
        .unwrap();
        let step_orders: Vec<_> = CaseRepository::list_steps(&f.conn, &f.case.id)
            .unwrap()
            .into_iter()
            .map(|s| (s.title, s.order))
            .collect();
        assert!(step_orders.contains(&("c".to_string(), 1)));
        assert!(step_orders.contains(&("a".to_string(), 2)));
        assert!(step_orders.contains(&("b".to_string(), 2)));
    }

    #[test]
    fn reorder_unknown_id_rolls_back() {
        let mut f = fixture();
        let a = add(&mut f, "a");
        let b = add(&mut f, "b");
        let before = orders(&f);
        let activities_before = activity_count(&f);

        let err = CaseService::reorder_workflow_steps(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &[b.id.clone(), "step-ghost".to_string(), a.id.clone()],
        )
        .unwrap_err();
        assert_matches!(err, CaseError::NotFound { .. });
        assert_eq!(orders(&f), before);
        assert_eq!(activity_count(&f), activities_before);
    }

    #[test]
    fn reorder_rejects_duplicates() {
        let mut f = fixture();
        let a = add(&mut f, "a");
        let err = CaseService::reorder_workflow_steps(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &[a.id.clone(), a.id.clone()],
        )
        .unwrap_err();
        assert_matches!(err, CaseError::Validation(_));
    }

    #[test]
    fn reorder_records_step_count() {
        let mut f = fixture();
        let a = add(&mut f, "a");
        let b = add(&mut f, "b");
        CaseService::reorder_workflow_steps(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &[b.id.clone(), a.id.clone()],
        )
        .unwrap();
        let latest = &CaseRepository::list_case_activity(&f.conn, &f.case.id, 1).unwrap()[0];
        assert_eq!(latest.description, "Workflow steps reordered");
        assert_eq!(latest.metadata.as_ref().unwrap()["stepCount"], 2);
    }

    #[test]
    fn reorder_missing_case() {
        let mut f = fixture();
        let err = CaseService::reorder_workflow_steps(&mut f.conn, &f.actor, "case-missing", &[])
            .unwrap_err();
        assert_matches!(err, CaseError::NotFound { entity: "Case", .. });
    }

    // --- Delete ---

    #[test]
    fn delete_keeps_other_orders_and_dependencies() {
        let mut f = fixture();
        let a = add(&mut f, "a");
        let b = add(&mut f, "b");
        add(&mut f, "c");
        f.conn
            .execute(
                "UPDATE workflow_steps SET dependencies = ?1 WHERE id = ?2",
                rusqlite::params![format!("[\"{}\"]", b.id), a.id],
            )
            .unwrap();

        CaseService::delete_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &b.id,
            DeleteStepOptions::default(),
        )
        .unwrap();
        assert_eq!(orders(&f), [("a".to_string(), 1), ("c".to_string(), 3)]);
        let a = CaseRepository::get_step(&f.conn, &f.case.id, &a.id)
            .unwrap()
            .unwrap();
        assert_eq!(a.dependencies, [b.id.clone()]);
    }

    #[test]
    fn delete_missing_step_is_not_found() {
        let mut f = fixture();
        let err = CaseService::delete_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            "step-ghost",
            DeleteStepOptions::default(),
        )
        .unwrap_err();
        assert_matches!(err, CaseError::NotFound { .. });
        assert_eq!(activity_count(&f), 0);
    }

    #[test]
    fn delete_can_recompute_progress() {
        let mut f = fixture();
        let a = add(&mut f, "a");
        let b = add(&mut f, "b");
        CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &f.case.id, &a.id).unwrap();
        assert_eq!(progress(&f), 50);

        CaseService::delete_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &b.id,
            DeleteStepOptions {
                recompute_progress: true,
            },
        )
        .unwrap();
        assert_eq!(progress(&f), 100);

        CaseService::delete_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &a.id,
            DeleteStepOptions {
                recompute_progress: true,
            },
        )
        .unwrap();
        assert_eq!(progress(&f), 0);
    }

    #[test]
    fn each_mutation_adds_exactly_one_activity() {
        let mut f = fixture();
        let a = add(&mut f, "a");
        assert_eq!(activity_count(&f), 1);
        let b = add(&mut f, "b");
        assert_eq!(activity_count(&f), 2);
        CaseService::toggle_workflow_step(&mut f.conn, &f.actor, &f.case.id, &a.id).unwrap();
        assert_eq!(activity_count(&f), 3);
        CaseService::reorder_workflow_steps(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &[b.id.clone(), a.id.clone()],
        )
        .unwrap();
        assert_eq!(activity_count(&f), 4);
        CaseService::delete_workflow_step(
            &mut f.conn,
            &f.actor,
            &f.case.id,
            &a.id,
            DeleteStepOptions::default(),
        )
        .unwrap();
        assert_eq!(activity_count(&f), 5);
    }

    #[test]
    fn list_requires_case() {
        let f = fixture();
        assert!(
            CaseService::list_workflow_steps(&f.conn, &f.case.id)
                .unwrap()
                .is_empty()
        );
        let err = CaseService::list_workflow_steps(&f.conn, "case-missing").unwrap_err();
        assert_matches!(err, CaseError::NotFound { .. });
    }

    mod concurrency {
        use std::thread;

        use casebook_store::{ConnectionConfig, ConnectionPool};

        use super::*;

        const WORKERS: usize = 8;

        struct Shared {
            pool: ConnectionPool,
            actor: Identity,
            case_id: String,
            _dir: tempfile::TempDir,
        }

        fn shared() -> Shared {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("casebook.db");
            let pool = casebook_store::new_file(&path, &ConnectionConfig::default()).unwrap();
            let conn = pool.get().unwrap();
            casebook_store::run_migrations(&conn).unwrap();
            let user = seed_user(&conn, "dana@firm.test");
            let case = seed_case(&conn, &user, "Smith v. Jones");
            drop(conn);
            Shared {
                pool,
                actor: identity_for(&user),
                case_id: case.id,
                _dir: dir,
            }
        }

        fn step_params(title: String) -> WorkflowStepCreateParams {
            WorkflowStepCreateParams {
                title,
                ..Default::default()
            }
        }

        #[test]
        fn parallel_toggles_reach_full_progress() {
            let s = shared();
            let step_ids: Vec<String> = {
                let mut conn = s.pool.get().unwrap();
                (0..WORKERS)
                    .map(|i| {
                        CaseService::create_workflow_step(
                            &mut conn,
                            &s.actor,
                            &s.case_id,
                            &step_params(format!("Step {i}")),
                        )
                        .unwrap()
                        .id
                    })
                    .collect()
            };

            thread::scope(|scope| {
                for step_id in &step_ids {
                    let s = &s;
                    scope.spawn(move || {
                        let mut conn = s.pool.get().unwrap();
                        CaseService::toggle_workflow_step(
                            &mut conn,
                            &s.actor,
                            &s.case_id,
                            step_id,
                        )
                        .unwrap();
                    });
                }
            });

            let conn = s.pool.get().unwrap();
            let case = CaseRepository::get_case(&conn, &s.case_id).unwrap().unwrap();
            assert_eq!(case.progress, 100);
            let completed: u32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM activities
                     WHERE case_id = ?1 AND activity_type = 'workflow_step_completed'",
                    [&s.case_id],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(completed as usize, WORKERS);
        }

        #[test]
        fn parallel_creates_get_distinct_orders() {
            let s = shared();

            thread::scope(|scope| {
                for i in 0..WORKERS {
                    let s = &s;
                    scope.spawn(move || {
                        let mut conn = s.pool.get().unwrap();
                        CaseService::create_workflow_step(
                            &mut conn,
                            &s.actor,
                            &s.case_id,
                            &step_params(format!("Step {i}")),
                        )
                        .unwrap();
                    });
                }
            });

            let conn = s.pool.get().unwrap();
            let mut orders: Vec<u32> = CaseRepository::list_steps(&conn, &s.case_id)
                .unwrap()
                .iter()
                .map(|step| step.order)
                .collect();
            orders.sort_unstable();
            let expected: Vec<u32> = (1..=u32::try_from(WORKERS).unwrap()).collect();
            assert_eq!(orders, expected);
            assert_eq!(
                CaseRepository::count_case_activity(&conn, &s.case_id).unwrap() as usize,
                WORKERS
            );
        }
    }

    mod proptests {
        use super::*;
        use crate::progress::compute_progress;
        use proptest::prelude::*;

        fn permutation() -> impl Strategy<Value = Vec<usize>> {
            (1usize..8).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn reorder_assigns_listed_positions(perm in permutation()) {
                let mut f = fixture();
                let steps: Vec<WorkflowStep> =
                    (0..perm.len()).map(|i| add(&mut f, &format!("Step {i}"))).collect();
                let ids: Vec<String> = perm.iter().map(|&i| steps[i].id.clone()).collect();

                CaseService::reorder_workflow_steps(&mut f.conn, &f.actor, &f.case.id, &ids)
                    .unwrap();

                let listed = CaseService::list_workflow_steps(&f.conn, &f.case.id).unwrap();
                let listed_ids: Vec<String> = listed.iter().map(|s| s.id.clone()).collect();
                prop_assert_eq!(listed_ids, ids);
                for (idx, step) in listed.iter().enumerate() {
                    prop_assert_eq!(step.order as usize, idx + 1);
                }
            }

            #[test]
            fn progress_tracks_completed_subset(done in proptest::collection::vec(any::<bool>(), 1..8)) {
                let mut f = fixture();
                let steps: Vec<WorkflowStep> =
                    (0..done.len()).map(|i| add(&mut f, &format!("Step {i}"))).collect();
                for (step, &finish) in steps.iter().zip(&done) {
                    if finish {
                        let _ = CaseService::toggle_workflow_step(
                            &mut f.conn,
                            &f.actor,
                            &f.case.id,
                            &step.id,
                        )
                        .unwrap();
                    }
                }

                let completed = u32::try_from(done.iter().filter(|d| **d).count()).unwrap();
                let total = u32::try_from(done.len()).unwrap();
                prop_assert_eq!(progress(&f), compute_progress(completed, total));
            }
        }
    }
}
