//! Progress derivation over a project's ordered steps.
//!
//! Two directions:
//!
//! - [`summarize`] turns step statuses into a percent-complete value and a
//!   single "current step" label.
//! - [`apply_target_step`] turns a target label back into a full set of
//!   statuses (the bulk transition used by the kanban-style board).
//!
//! The current step follows the *leading run* of done steps: the contiguous
//! prefix of `Done` statuses starting at order index 0. A done step after a
//! gap does not advance it, so `[Todo, Done, Done, Done]` is still
//! "not started".

use serde::{Serialize, Serializer};

use crate::error::CoreError;
use crate::status::StepStatus;

/// Label reported when the leading run is empty.
pub const NOT_STARTED: &str = "not started";

/// Label reported when every step is done.
pub const COMPLETE: &str = "complete";

/// Read access to the parts of a step the calculator needs.
pub trait StepView {
    fn step_name(&self) -> &str;
    fn step_status(&self) -> StepStatus;
    fn order_index(&self) -> i32;
}

/// Where a project currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentStep {
    NotStarted,
    /// Name of the last step in the leading run of done steps.
    At(String),
    Complete,
}

impl CurrentStep {
    pub fn label(&self) -> &str {
        match self {
            Self::NotStarted => NOT_STARTED,
            Self::At(name) => name,
            Self::Complete => COMPLETE,
        }
    }
}

impl Serialize for CurrentStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Target of a bulk step transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTarget {
    NotStarted,
    Complete,
    Named(String),
}

impl StepTarget {
    /// Sentinels win over step names: a step literally named "complete"
    /// cannot be targeted individually.
    pub fn parse(raw: &str) -> Self {
        match raw {
            NOT_STARTED => Self::NotStarted,
            COMPLETE => Self::Complete,
            other => Self::Named(other.to_string()),
        }
    }
}

/// Percent complete and current step, computed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub percent_complete: i32,
    pub current_step: CurrentStep,
}

/// `round(done / total * 100)`, or 0 for a project without steps.
pub fn percent_complete<S: StepView>(steps: &[S]) -> i32 {
    if steps.is_empty() {
        return 0;
    }
    let done = steps
        .iter()
        .filter(|s| s.step_status() == StepStatus::Done)
        .count();
    (done as f64 / steps.len() as f64 * 100.0).round() as i32
}

/// Derive the current step from the leading run of done steps.
pub fn current_step<S: StepView>(steps: &[S]) -> CurrentStep {
    let ordered = in_order(steps);
    let run = ordered
        .iter()
        .take_while(|s| s.step_status() == StepStatus::Done)
        .count();

    if run == 0 {
        CurrentStep::NotStarted
    } else if run == ordered.len() {
        CurrentStep::Complete
    } else {
        CurrentStep::At(ordered[run - 1].step_name().to_string())
    }
}

pub fn summarize<S: StepView>(steps: &[S]) -> ProgressSummary {
    ProgressSummary {
        percent_complete: percent_complete(steps),
        current_step: current_step(steps),
    }
}

/// Re-derive every step's status from a target.
///
/// The returned statuses are aligned index-for-index with `steps`. Prior
/// statuses are ignored, so applying the same target twice yields the same
/// state and an earlier target moves statuses backward.
pub fn apply_target_step<S: StepView>(
    steps: &[S],
    target: &StepTarget,
) -> Result<Vec<StepStatus>, CoreError> {
    let statuses = match target {
        StepTarget::NotStarted => vec![StepStatus::Todo; steps.len()],
        StepTarget::Complete => vec![StepStatus::Done; steps.len()],
        StepTarget::Named(name) => {
            let cutoff = in_order(steps)
                .into_iter()
                .find(|s| s.step_name() == name)
                .map(|s| s.order_index())
                .ok_or_else(|| CoreError::InvalidInput(format!("Unknown step '{name}'")))?;

            steps
                .iter()
                .map(|s| {
                    if s.order_index() <= cutoff {
                        StepStatus::Done
                    } else {
                        StepStatus::Todo
                    }
                })
                .collect()
        }
    };
    Ok(statuses)
}

fn in_order<S: StepView>(steps: &[S]) -> Vec<&S> {
    let mut ordered: Vec<&S> = steps.iter().collect();
    ordered.sort_by_key(|s| s.order_index());
    ordered
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::status::StepStatus::{Done, InProgress, Todo};

    struct TestStep {
        name: &'static str,
        status: StepStatus,
        order: i32,
    }

    impl StepView for TestStep {
        fn step_name(&self) -> &str {
            self.name
        }
        fn step_status(&self) -> StepStatus {
            self.status
        }
        fn order_index(&self) -> i32 {
            self.order
        }
    }

    fn abcd(statuses: [StepStatus; 4]) -> Vec<TestStep> {
        ["A", "B", "C", "D"]
            .into_iter()
            .zip(statuses)
            .enumerate()
            .map(|(i, (name, status))| TestStep {
                name,
                status,
                order: i as i32,
            })
            .collect()
    }

    fn with_statuses(steps: &[TestStep], statuses: &[StepStatus]) -> Vec<TestStep> {
        steps
            .iter()
            .zip(statuses)
            .map(|(s, &status)| TestStep {
                name: s.name,
                status,
                order: s.order,
            })
            .collect()
    }

    #[test]
    fn percent_is_zero_when_all_todo_and_hundred_when_all_done() {
        for n in 1..=7 {
            let todo: Vec<TestStep> = (0..n)
                .map(|i| TestStep { name: "s", status: Todo, order: i })
                .collect();
            let done: Vec<TestStep> = (0..n)
                .map(|i| TestStep { name: "s", status: Done, order: i })
                .collect();
            assert_eq!(percent_complete(&todo), 0);
            assert_eq!(percent_complete(&done), 100);
        }
    }

    #[test]
    fn percent_is_zero_without_steps() {
        let none: Vec<TestStep> = Vec::new();
        assert_eq!(percent_complete(&none), 0);
        assert_eq!(current_step(&none), CurrentStep::NotStarted);
    }

    #[test]
    fn percent_rounds_half_up() {
        // 1 of 8 done = 12.5%
        let steps: Vec<TestStep> = (0..8)
            .map(|i| TestStep {
                name: "s",
                status: if i == 0 { Done } else { Todo },
                order: i,
            })
            .collect();
        assert_eq!(percent_complete(&steps), 13);

        let thirds = vec![
            TestStep { name: "a", status: Done, order: 0 },
            TestStep { name: "b", status: Todo, order: 1 },
            TestStep { name: "c", status: Todo, order: 2 },
        ];
        assert_eq!(percent_complete(&thirds), 33);
    }

    #[test]
    fn in_progress_does_not_count_as_done() {
        let steps = abcd([Done, InProgress, Todo, Todo]);
        assert_eq!(percent_complete(&steps), 25);
        assert_eq!(current_step(&steps), CurrentStep::At("A".into()));
    }

    #[test]
    fn current_step_is_last_step_of_leading_run() {
        let steps = abcd([Done, Done, Todo, Todo]);
        assert_eq!(current_step(&steps).label(), "B");
    }

    #[test]
    fn done_after_gap_does_not_advance_current_step() {
        let steps = abcd([Todo, Done, Done, Done]);
        assert_eq!(current_step(&steps), CurrentStep::NotStarted);
        assert_eq!(current_step(&steps).label(), NOT_STARTED);
        assert_eq!(percent_complete(&steps), 75);
    }

    #[test]
    fn all_done_is_complete() {
        let steps = abcd([Done, Done, Done, Done]);
        assert_eq!(current_step(&steps), CurrentStep::Complete);
    }

    #[test]
    fn current_step_uses_order_index_not_slice_position() {
        let steps = vec![
            TestStep { name: "B", status: Todo, order: 1 },
            TestStep { name: "A", status: Done, order: 0 },
        ];
        assert_eq!(current_step(&steps), CurrentStep::At("A".into()));
    }

    #[test]
    fn apply_named_target_sets_prefix_done_rest_todo() {
        let steps = abcd([Todo, Done, InProgress, Done]);
        let statuses = apply_target_step(&steps, &StepTarget::parse("C")).unwrap();
        assert_eq!(statuses, vec![Done, Done, Done, Todo]);
    }

    #[test]
    fn apply_named_target_is_idempotent() {
        let steps = abcd([Todo, Todo, Todo, Done]);
        let target = StepTarget::parse("C");
        let first = apply_target_step(&steps, &target).unwrap();
        let after_first = with_statuses(&steps, &first);
        let second = apply_target_step(&after_first, &target).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn earlier_target_moves_backward() {
        let steps = abcd([Done, Done, Done, Done]);
        let statuses = apply_target_step(&steps, &StepTarget::parse("A")).unwrap();
        assert_eq!(statuses, vec![Done, Todo, Todo, Todo]);
        let after = with_statuses(&steps, &statuses);
        assert_eq!(current_step(&after), CurrentStep::At("A".into()));
    }

    #[test]
    fn sentinels_reset_or_complete_everything() {
        let steps = abcd([Done, Todo, InProgress, Done]);
        assert_eq!(
            apply_target_step(&steps, &StepTarget::parse(NOT_STARTED)).unwrap(),
            vec![Todo; 4]
        );
        assert_eq!(
            apply_target_step(&steps, &StepTarget::parse(COMPLETE)).unwrap(),
            vec![Done; 4]
        );
    }

    #[test]
    fn unknown_target_is_invalid_input() {
        let steps = abcd([Todo, Todo, Todo, Todo]);
        assert_matches!(
            apply_target_step(&steps, &StepTarget::parse("Z")),
            Err(CoreError::InvalidInput(_))
        );
    }

    #[test]
    fn target_round_trips_through_summary() {
        let steps = abcd([Todo, Todo, Todo, Todo]);
        let statuses = apply_target_step(&steps, &StepTarget::parse("B")).unwrap();
        let summary = summarize(&with_statuses(&steps, &statuses));
        assert_eq!(summary.percent_complete, 50);
        assert_eq!(summary.current_step.label(), "B");
    }

    #[test]
    fn current_step_serializes_as_its_label() {
        let json = serde_json::to_string(&CurrentStep::NotStarted).unwrap();
        assert_eq!(json, "\"not started\"");
    }
}
