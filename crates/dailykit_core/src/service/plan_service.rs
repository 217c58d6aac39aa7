//! Action plan use-case service.
//!
//! # Invariants
//! - Blank task titles are dropped before persistence; a plan keeps at least
//!   one task.
//! - Toggling flips exactly one task and leaves task order untouched.

use crate::clock::{Clock, SystemClock};
use crate::model::plan::{ActionPlan, NewPlan, PlanId, PlanTaskId};
use crate::model::OwnerId;
use crate::repo::plan_repo::PlanRepository;
use crate::service::{logged, ServiceError, ServiceResult};
use log::info;

const MODULE: &str = "plan_service";

/// Use-case facade for action plans.
pub struct PlanService<R: PlanRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: PlanRepository> PlanService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: PlanRepository, C: Clock> PlanService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates a plan from a title, optional description and task titles.
    ///
    /// # Errors
    /// - `Validation` for a blank title or when every task title is blank.
    pub fn create_plan(&self, owner: OwnerId, request: &NewPlan) -> ServiceResult<ActionPlan> {
        let request = request
            .normalized()
            .map_err(logged(MODULE, "plan_create"))?;
        let plan = self
            .repo
            .insert_plan(owner, &request, self.clock.now())
            .map_err(logged(MODULE, "plan_create"))?;
        info!(
            "event=plan_create module={MODULE} status=ok plan_id={} tasks={}",
            plan.id,
            plan.tasks.len()
        );
        Ok(plan)
    }

    /// Lists the owner's plans, newest first.
    pub fn list_plans(&self, owner: OwnerId) -> ServiceResult<Vec<ActionPlan>> {
        self.repo
            .list_plans(owner)
            .map_err(logged(MODULE, "plan_list"))
    }

    /// Flips one task between done and not done.
    ///
    /// # Errors
    /// - `NotFound(plan_id)` when the plan is missing for `owner`.
    /// - `NotFound(task_id)` when the plan has no such task.
    pub fn toggle_task(
        &self,
        owner: OwnerId,
        plan_id: PlanId,
        task_id: PlanTaskId,
    ) -> ServiceResult<ActionPlan> {
        let plan = self
            .flip_task(owner, plan_id, task_id)
            .map_err(logged(MODULE, "plan_toggle"))?;
        info!(
            "event=plan_toggle module={MODULE} status=ok plan_id={} progress={}",
            plan_id,
            plan.progress_percent()
        );
        Ok(plan)
    }

    /// Deletes a plan together with its tasks.
    pub fn delete_plan(&self, owner: OwnerId, plan_id: PlanId) -> ServiceResult<()> {
        self.repo
            .delete_plan(owner, plan_id)
            .map_err(logged(MODULE, "plan_delete"))?;
        info!("event=plan_delete module={MODULE} status=ok plan_id={plan_id}");
        Ok(())
    }

    fn flip_task(
        &self,
        owner: OwnerId,
        plan_id: PlanId,
        task_id: PlanTaskId,
    ) -> ServiceResult<ActionPlan> {
        let mut plan = self
            .repo
            .get_plan(owner, plan_id)?
            .ok_or(ServiceError::NotFound(plan_id))?;
        let task = plan
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or(ServiceError::NotFound(task_id))?;

        let completed = !task.completed;
        self.repo
            .set_task_completed(owner, plan_id, task_id, completed)?;
        task.completed = completed;
        Ok(plan)
    }
}
