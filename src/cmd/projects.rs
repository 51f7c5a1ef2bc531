//! Project commands — `pms projects`.

use anyhow::Result;

use pms::errors::MessageOverrides;
use pms::models::{NewProject, Task, TaskStatus};

use super::{Context, deadline_note, print_members, print_problems};
use crate::ProjectsCommands;

pub(crate) fn status_label(status: TaskStatus) -> console::StyledObject<&'static str> {
    match status {
        TaskStatus::OnHold => console::style("on hold").yellow(),
        TaskStatus::InProgress => console::style("in progress").cyan(),
        TaskStatus::Done => console::style("done").green(),
    }
}

pub(crate) fn print_task_line(task: &Task) {
    let note = if task.status == TaskStatus::Done {
        String::new()
    } else {
        deadline_note(&task.deadline)
    };
    println!(
        "  {:<8} {:<40} {:<12} {}",
        task.task_id,
        task.task_name,
        status_label(task.status),
        console::style(note).dim()
    );
}

pub async fn cmd_projects(ctx: &mut Context, command: ProjectsCommands) -> Result<()> {
    ctx.require_login()?;

    match command {
        ProjectsCommands::List => {
            let overrides = MessageOverrides::new().server_error(
                "The server is temporarily unavailable. Please try again in a while.",
            );
            let result = ctx.api.projects(&mut ctx.session).await;
            let projects = ctx.settle(result, &overrides)?;

            println!("{}", console::style("Projects").bold().cyan());
            if projects.is_empty() {
                println!("{}", console::style("You are not on any projects yet.").dim());
            }
            for project in &projects {
                let organization = project
                    .organization
                    .as_ref()
                    .map(|org| org.organization_name.as_str())
                    .unwrap_or("");
                println!(
                    "  {:<8} {:<40} {:<20} {}",
                    project.project_id,
                    project.project_name,
                    organization,
                    console::style(deadline_note(&project.deadline)).dim()
                );
            }
        }
        ProjectsCommands::Create {
            organization,
            name,
            deadline,
            description,
            template,
        } => {
            let project = NewProject {
                organization,
                template,
                project_name: name,
                description,
                deadline,
            };
            print_problems(&project.validate())?;

            let result = ctx.api.create_project(&mut ctx.session, &project).await;
            ctx.settle(result, &MessageOverrides::new())?;
            println!(
                "{} Created project {}",
                console::style("✓").green(),
                console::style(project.project_name.trim()).bold()
            );
        }
        ProjectsCommands::Stats { project_id } => {
            let overrides = MessageOverrides::new().not_found("Could not find that project.");
            let result = ctx.api.project_stats(&mut ctx.session, &project_id).await;
            let stats = ctx.settle(result, &overrides)?;

            if !stats.description.is_empty() {
                println!("{}", stats.description);
                println!();
            }
            println!("  members:     {}", stats.members);
            println!("  tasks:       {}", stats.tasks);
            println!("  on hold:     {}", stats.tasks_on_hold);
            println!("  in progress: {}", stats.tasks_in_progress);
            println!("  completed:   {}", stats.tasks_completed);
            println!(
                "  progress:    {}",
                console::style(format!("{:.0}%", stats.percentage_completion)).bold()
            );
        }
        ProjectsCommands::Members { project_id } => {
            let overrides = MessageOverrides::new().not_found("Could not get project members.");
            let result = ctx.api.project_members(&mut ctx.session, &project_id).await;
            let members = ctx.settle(result, &overrides)?;
            print_members(&members, "No members.");
        }
        ProjectsCommands::NonMembers { project_id } => {
            let overrides = MessageOverrides::new().not_found("Could not get project members.");
            let result = ctx
                .api
                .project_non_members(&mut ctx.session, &project_id)
                .await;
            let members = ctx.settle(result, &overrides)?;
            print_members(&members, "Everyone in the organization is already a member.");
        }
        ProjectsCommands::AddMembers {
            project_id,
            usernames,
        } => {
            let overrides =
                MessageOverrides::new().forbidden("Only the project manager can add members.");
            let result = ctx
                .api
                .add_project_members(&mut ctx.session, &project_id, &usernames)
                .await;
            ctx.settle(result, &overrides)?;
            println!(
                "{} Added {} member(s)",
                console::style("✓").green(),
                usernames.len()
            );
        }
        ProjectsCommands::Tasks { project_id } => {
            let overrides = MessageOverrides::new().not_found("Could not find that project.");
            let result = ctx.api.project_tasks(&mut ctx.session, &project_id).await;
            let project = ctx.settle(result, &overrides)?;

            println!("{}", console::style(&project.project.project_name).bold().cyan());
            if project.tasks.is_empty() {
                println!("{}", console::style("No tasks yet.").dim());
            }
            for task in &project.tasks {
                print_task_line(task);
            }
        }
        ProjectsCommands::Phases { project_id } => {
            let overrides = MessageOverrides::new().not_found("Could not find that project.");
            let result = ctx.api.project_workflow(&mut ctx.session, &project_id).await;
            let workflow = ctx.settle(result, &overrides)?;

            println!("{}", console::style(&workflow.project.project_name).bold().cyan());
            if workflow.phases.is_empty() {
                println!("{}", console::style("No phases yet.").dim());
            }
            for (position, phase) in workflow.phases.iter().enumerate() {
                println!(
                    "  {}. {} {}",
                    position + 1,
                    phase.phase_name,
                    console::style(format!("(id {})", phase.phase_id)).dim()
                );
            }
        }
    }

    Ok(())
}
