//! Action plan commands.

use super::{CliResult, Context};
use clap::Subcommand;
use dailykit_core::{ActionPlan, NewPlan, PlanService, SqlitePlanRepository};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum PlanAction {
    /// List plans with progress
    List,
    /// Create a plan
    Add {
        /// Plan title
        title: String,
        /// Task title; repeat for each task
        #[arg(long = "task", required = true)]
        tasks: Vec<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Flip a task between done and not done
    Toggle {
        /// Plan id
        plan: Uuid,
        /// Task id
        task: Uuid,
    },
    /// Delete a plan and its tasks
    Rm {
        /// Plan id
        plan: Uuid,
    },
}

pub fn run(ctx: &Context, action: PlanAction) -> CliResult {
    let service = PlanService::new(SqlitePlanRepository::try_new(&ctx.conn)?);

    match action {
        PlanAction::List => {
            let plans = service.list_plans(ctx.owner)?;
            ctx.emit(&plans, || {
                if plans.is_empty() {
                    return "no plans yet".to_string();
                }
                plans.iter().map(render).collect::<Vec<_>>().join("\n\n")
            })?;
        }
        PlanAction::Add {
            title,
            tasks,
            description,
        } => {
            let plan = service.create_plan(
                ctx.owner,
                &NewPlan {
                    title,
                    description,
                    tasks,
                },
            )?;
            ctx.emit(&plan, || render(&plan))?;
        }
        PlanAction::Toggle { plan, task } => {
            let plan = service.toggle_task(ctx.owner, plan, task)?;
            ctx.emit(&plan, || render(&plan))?;
        }
        PlanAction::Rm { plan } => {
            service.delete_plan(ctx.owner, plan)?;
            ctx.emit(&plan, || format!("deleted {plan}"))?;
        }
    }
    Ok(())
}

fn render(plan: &ActionPlan) -> String {
    let mut lines = vec![format!(
        "{} {}/{} ({}%)  {}",
        plan.title,
        plan.completed_count(),
        plan.tasks.len(),
        plan.progress_percent(),
        plan.id
    )];
    if !plan.description.is_empty() {
        lines.push(format!("  {}", plan.description));
    }
    for task in &plan.tasks {
        let mark = if task.completed { "[x]" } else { "[ ]" };
        lines.push(format!("  {mark} {}  {}", task.title, task.id));
    }
    lines.join("\n")
}
