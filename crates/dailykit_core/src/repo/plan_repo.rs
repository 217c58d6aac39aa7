//! Action plan repository contract and SQLite implementation.
//!
//! # Invariants
//! - A plan and its tasks are inserted in one transaction.
//! - Tasks are returned in creation order (`position ASC`).
//! - Deleting a plan cascades to its tasks.

use crate::db::ensure_tables;
use crate::model::plan::{ActionPlan, NewPlan, PlanId, PlanTask, PlanTaskId};
use crate::model::OwnerId;
use crate::repo::{from_millis, parse_uuid, stored_instant, to_millis, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Store contract for action plans.
pub trait PlanRepository {
    /// Inserts an already normalized plan with fresh plan and task ids.
    fn insert_plan(
        &self,
        owner: OwnerId,
        plan: &NewPlan,
        created_at: DateTime<Utc>,
    ) -> RepoResult<ActionPlan>;
    fn get_plan(&self, owner: OwnerId, id: PlanId) -> RepoResult<Option<ActionPlan>>;
    /// Lists the owner's plans, newest first.
    fn list_plans(&self, owner: OwnerId) -> RepoResult<Vec<ActionPlan>>;
    fn set_task_completed(
        &self,
        owner: OwnerId,
        plan_id: PlanId,
        task_id: PlanTaskId,
        completed: bool,
    ) -> RepoResult<()>;
    fn delete_plan(&self, owner: OwnerId, id: PlanId) -> RepoResult<()>;
}

/// SQLite-backed action plan repository.
pub struct SqlitePlanRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlanRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["action_plans", "plan_tasks"])?;
        Ok(Self { conn })
    }

    fn load_tasks(&self, plan_id: PlanId) -> RepoResult<Vec<PlanTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, title, completed
             FROM plan_tasks
             WHERE plan_uuid = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([plan_id.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl PlanRepository for SqlitePlanRepository<'_> {
    fn insert_plan(
        &self,
        owner: OwnerId,
        plan: &NewPlan,
        created_at: DateTime<Utc>,
    ) -> RepoResult<ActionPlan> {
        let plan = plan.normalized()?;
        let created = ActionPlan {
            id: Uuid::new_v4(),
            owner,
            title: plan.title,
            description: plan.description,
            tasks: plan
                .tasks
                .into_iter()
                .map(|title| PlanTask {
                    id: Uuid::new_v4(),
                    title,
                    completed: false,
                })
                .collect(),
            created_at: stored_instant(created_at),
        };

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO action_plans (uuid, owner_uuid, title, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                created.id.to_string(),
                owner.to_string(),
                created.title.as_str(),
                created.description.as_str(),
                to_millis(created_at),
            ],
        )?;
        {
            let mut insert_task = tx.prepare(
                "INSERT INTO plan_tasks (uuid, plan_uuid, position, title, completed)
                 VALUES (?1, ?2, ?3, ?4, 0);",
            )?;
            for (position, task) in created.tasks.iter().enumerate() {
                insert_task.execute(params![
                    task.id.to_string(),
                    created.id.to_string(),
                    position as i64,
                    task.title.as_str(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(created)
    }

    fn get_plan(&self, owner: OwnerId, id: PlanId) -> RepoResult<Option<ActionPlan>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, owner_uuid, title, description, created_at
             FROM action_plans
             WHERE uuid = ?1
               AND owner_uuid = ?2;",
        )?;
        let mut rows = stmt.query(params![id.to_string(), owner.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut plan = parse_plan_row(row)?;
        plan.tasks = self.load_tasks(plan.id)?;
        Ok(Some(plan))
    }

    fn list_plans(&self, owner: OwnerId) -> RepoResult<Vec<ActionPlan>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, owner_uuid, title, description, created_at
             FROM action_plans
             WHERE owner_uuid = ?1
             ORDER BY created_at DESC, uuid ASC;",
        )?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut plans = Vec::new();
        while let Some(row) = rows.next()? {
            plans.push(parse_plan_row(row)?);
        }

        for plan in &mut plans {
            plan.tasks = self.load_tasks(plan.id)?;
        }
        Ok(plans)
    }

    fn set_task_completed(
        &self,
        owner: OwnerId,
        plan_id: PlanId,
        task_id: PlanTaskId,
        completed: bool,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE plan_tasks
             SET completed = ?1
             WHERE uuid = ?2
               AND plan_uuid = (
                   SELECT uuid FROM action_plans WHERE uuid = ?3 AND owner_uuid = ?4
               );",
            params![
                i64::from(completed),
                task_id.to_string(),
                plan_id.to_string(),
                owner.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task_id));
        }
        Ok(())
    }

    fn delete_plan(&self, owner: OwnerId, id: PlanId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM action_plans WHERE uuid = ?1 AND owner_uuid = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_plan_row(row: &Row<'_>) -> RepoResult<ActionPlan> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    Ok(ActionPlan {
        id: parse_uuid(&uuid_text, "action_plans.uuid")?,
        owner: parse_uuid(&owner_text, "action_plans.owner_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        tasks: Vec::new(),
        created_at: from_millis(row.get("created_at")?, "action_plans.created_at")?,
    })
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<PlanTask> {
    let uuid_text: String = row.get("uuid")?;
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in plan_tasks.completed"
            )));
        }
    };
    Ok(PlanTask {
        id: parse_uuid(&uuid_text, "plan_tasks.uuid")?,
        title: row.get("title")?,
        completed,
    })
}
