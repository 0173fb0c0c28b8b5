//! Step status changes.

use std::sync::Arc;

use backlog_core::error::CoreError;
use backlog_core::progress::{apply_target_step, percent_complete, summarize, StepTarget};
use backlog_core::status::{StatusId, StepStatus};
use backlog_core::types::DbId;
use backlog_db::BacklogStore;

use crate::access::load_owned_project;
use crate::error::EngineResult;
use crate::views::{ProjectProgress, StepChange, StepItem};

pub struct StepService {
    store: Arc<dyn BacklogStore>,
}

impl StepService {
    pub fn new(store: Arc<dyn BacklogStore>) -> Self {
        Self { store }
    }

    /// Set one step's status and report the project's new percent complete.
    pub async fn update_step_status(
        &self,
        step_id: DbId,
        caller_id: DbId,
        status: StepStatus,
    ) -> EngineResult<StepChange> {
        let not_found = || CoreError::NotFound {
            entity: "Step",
            id: step_id,
        };

        let step = self.store.find_step(step_id).await?.ok_or_else(not_found)?;
        load_owned_project(self.store.as_ref(), step.project_id, caller_id).await?;

        let step = self
            .store
            .update_step_status(step_id, status.id())
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(step_id, project_id = step.project_id, ?status, "Updated step status");

        let steps = self.store.list_steps(step.project_id).await?;
        Ok(StepChange {
            step: StepItem::from(&step),
            project_id: step.project_id,
            percent_complete: percent_complete(&steps),
        })
    }

    /// Re-derive every step's status from `target`: a step name, or one of
    /// the "not started" / "complete" sentinels.
    ///
    /// The result depends only on step membership, never on prior statuses,
    /// so repeating a request is harmless.
    pub async fn transition_steps(
        &self,
        project_id: DbId,
        caller_id: DbId,
        target: &str,
    ) -> EngineResult<ProjectProgress> {
        load_owned_project(self.store.as_ref(), project_id, caller_id).await?;

        let steps = self.store.list_steps(project_id).await?;
        let statuses = apply_target_step(&steps, &StepTarget::parse(target))?;
        let updates: Vec<(DbId, StatusId)> = steps
            .iter()
            .zip(&statuses)
            .map(|(step, status)| (step.id, status.id()))
            .collect();

        let steps = self
            .store
            .apply_step_statuses(project_id, &updates)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;

        let summary = summarize(&steps);
        tracing::info!(
            project_id,
            target,
            current_step = summary.current_step.label(),
            "Transitioned project steps"
        );

        Ok(ProjectProgress {
            project_id,
            percent_complete: summary.percent_complete,
            current_step: summary.current_step,
            steps: steps.iter().map(StepItem::from).collect(),
        })
    }
}
