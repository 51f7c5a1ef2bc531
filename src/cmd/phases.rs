//! Phase commands — `pms phases`.

use anyhow::Result;
use dialoguer::Confirm;

use pms::errors::MessageOverrides;
use pms::kanban::{Board, ColumnId, ColumnOrderStore};

use super::Context;
use super::projects::print_task_line;
use crate::PhasesCommands;

pub async fn cmd_phases(ctx: &mut Context, command: PhasesCommands) -> Result<()> {
    ctx.require_login()?;

    match command {
        PhasesCommands::Board {
            phase_id,
            task: wanted,
        } => {
            let overrides = MessageOverrides::new().not_found("Could not find that phase.");
            let result = ctx.api.phase_detail(&mut ctx.session, &phase_id).await;
            let detail = ctx.settle(result, &overrides)?;

            let order = ColumnOrderStore::new(ctx.config.kanban_file()).load(Some(&phase_id))?;
            let board = Board::from_detail(&detail, &order);

            println!(
                "{} {} {}",
                console::style(&detail.project.project_name).bold().cyan(),
                console::style("/").dim(),
                console::style(&detail.phase.phase_name).bold()
            );
            println!("{} task(s)", board.task_count());
            for column in &board.columns {
                println!();
                println!(
                    "{} {}",
                    console::style(column.id.title()).bold(),
                    console::style(format!("({})", column.tasks.len())).dim()
                );
                for task in &column.tasks {
                    print_task_line(task);
                }
            }

            if let Some(task_id) = wanted {
                let column = locate_task(&board, &task_id)?;
                let position = board.columns.iter().position(|c| c.id == column).unwrap_or(0);
                println!();
                println!(
                    "Task {} is in {} (column {})",
                    task_id,
                    console::style(column.title()).bold(),
                    position + 1
                );
            }
        }
        PhasesCommands::Create { project_id, name } => {
            if name.trim().is_empty() {
                anyhow::bail!("A phase name is required.");
            }
            let overrides =
                MessageOverrides::new().forbidden("Only the project manager can add phases.");
            let result = ctx
                .api
                .create_phase(&mut ctx.session, &project_id, &name)
                .await;
            let phase = ctx.settle(result, &overrides)?;
            println!(
                "{} Created phase {} (id {})",
                console::style("✓").green(),
                console::style(&phase.phase_name).bold(),
                phase.phase_id
            );
        }
        PhasesCommands::Rename { phase_id, name } => {
            if name.trim().is_empty() {
                anyhow::bail!("A phase name is required.");
            }
            let overrides = MessageOverrides::new().not_found("Could not find that phase.");
            let result = ctx.api.rename_phase(&mut ctx.session, &phase_id, &name).await;
            ctx.settle(result, &overrides)?;
            println!("{} Renamed phase to {}", console::style("✓").green(), name.trim());
        }
        PhasesCommands::Delete { phase_id, force } => {
            if !force {
                let confirm = Confirm::new()
                    .with_prompt("Delete this phase and all of its tasks?")
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !confirm {
                    println!("Cancelled");
                    return Ok(());
                }
            }
            let overrides = MessageOverrides::new().not_found("Could not find that phase.");
            let result = ctx.api.delete_phase(&mut ctx.session, &phase_id).await;
            ctx.settle(result, &overrides)?;
            ColumnOrderStore::new(ctx.config.kanban_file()).reset(&phase_id)?;
            println!("{} Deleted phase {}", console::style("✓").green(), phase_id);
        }
    }

    Ok(())
}

fn locate_task(board: &Board, task_id: &str) -> Result<ColumnId> {
    board
        .task_column(task_id)
        .ok_or_else(|| anyhow::anyhow!("Task {} is not on this board.", task_id))
}
