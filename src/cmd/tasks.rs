//! Task commands — `pms tasks`.

use anyhow::Result;

use pms::errors::MessageOverrides;
use pms::kanban::ColumnId;
use pms::models::{NewTask, ProjectRole, TaskStatus};

use super::projects::status_label;
use super::{Context, deadline_note, print_members, print_problems};
use crate::TasksCommands;

fn task_overrides() -> MessageOverrides {
    MessageOverrides::new()
        .bad_request("An unexpected error occurred.")
        .not_found("An unexpected error occurred.")
        .server_error("A server error occurred.")
}

pub async fn cmd_tasks(ctx: &mut Context, command: TasksCommands) -> Result<()> {
    ctx.require_login()?;

    match command {
        TasksCommands::Show { task_id } => {
            let result = ctx.api.task_detail(&mut ctx.session, &task_id).await;
            let detail = ctx.settle(result, &task_overrides())?;
            let task = &detail.task;

            println!("{}", console::style(&task.task_name).bold().cyan());
            println!("  status:   {}", status_label(task.status));
            if let Some(phase) = &task.project_phase {
                println!("  phase:    {}", phase.phase_name);
            }
            if let Some(start) = &task.start_date {
                println!("  started:  {}", start);
            }
            println!(
                "  deadline: {} {}",
                task.deadline,
                console::style(format!("({})", deadline_note(&task.deadline))).dim()
            );
            if detail.role == Some(ProjectRole::Manager) {
                println!("  role:     manager");
            }
            if !task.description.is_empty() {
                println!();
                println!("{}", task.description);
            }
            println!();
            println!("{}", console::style("Assignees").bold());
            print_members(&detail.assignees, "Nobody is assigned yet.");
        }
        TasksCommands::Create {
            phase,
            name,
            deadline,
            description,
        } => {
            let task = NewTask {
                project_phase: phase,
                task_name: name,
                deadline,
                description,
            };
            print_problems(&task.validate(chrono::Local::now().date_naive()))?;

            let result = ctx.api.create_task(&mut ctx.session, &task).await;
            ctx.settle(result, &MessageOverrides::new())?;
            println!(
                "{} Created task {}",
                console::style("✓").green(),
                console::style(task.task_name.trim()).bold()
            );
        }
        TasksCommands::Assign { task_id, usernames } => {
            let result = ctx
                .api
                .assign_task(&mut ctx.session, &task_id, &usernames)
                .await;
            ctx.settle(result, &task_overrides())?;
            println!(
                "{} Assigned {} member(s)",
                console::style("✓").green(),
                usernames.len()
            );
        }
        TasksCommands::NonAssignees { task_id } => {
            let result = ctx.api.task_non_assignees(&mut ctx.session, &task_id).await;
            let members = ctx.settle(result, &task_overrides())?;
            print_members(&members, "Every project member is already assigned.");
        }
        TasksCommands::Move { task_id, column } => {
            let column: ColumnId = column.parse()?;
            let result = ctx.api.task_detail(&mut ctx.session, &task_id).await;
            let detail = ctx.settle(result, &task_overrides())?;
            let current = ColumnId::for_status(detail.task.status);

            let Some(status) = move_status(current, column) else {
                println!(
                    "Task {} is already in {}",
                    task_id,
                    console::style(column.title()).bold()
                );
                return Ok(());
            };

            let result = ctx
                .api
                .update_task_status(&mut ctx.session, &task_id, status)
                .await;
            ctx.settle(result, &task_overrides())?;
            println!(
                "{} Moved task {} from {} to {}",
                console::style("✓").green(),
                task_id,
                current.title(),
                console::style(column.title()).bold()
            );
        }
    }

    Ok(())
}

/// Status to send for a move, or `None` when the task is already there.
fn move_status(current: ColumnId, target: ColumnId) -> Option<TaskStatus> {
    (current != target).then(|| target.status())
}
