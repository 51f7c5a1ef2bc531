//! Organization commands — `pms orgs`.

use anyhow::{Context as _, Result};
use dialoguer::{Confirm, Password};
use serde_json::Value;

use pms::errors::{ApiError, MessageOverrides};
use pms::models::{NewOrganization, Organization, OrganizationAuth, OrganizationRole};

use super::{Context, api_failure, deadline_note, print_members, print_problems};
use crate::OrgsCommands;

fn print_organizations(organizations: &[Organization]) {
    if organizations.is_empty() {
        println!("{}", console::style("No organizations found.").dim());
        return;
    }
    for org in organizations {
        println!(
            "  {:<8} {} {}",
            org.organization_id,
            console::style(&org.organization_name).bold(),
            console::style(format!("({})", org.organization_name_slug)).dim()
        );
    }
}

/// The join endpoint reports bad credentials as `{"error": "..."}`.
fn join_error_message(err: &ApiError) -> Option<String> {
    err.http()?
        .body
        .as_ref()?
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

pub async fn cmd_orgs(ctx: &mut Context, command: OrgsCommands) -> Result<()> {
    ctx.require_login()?;

    match command {
        OrgsCommands::List => {
            let result = ctx.api.organizations(&mut ctx.session).await;
            let organizations = ctx.settle(result, &MessageOverrides::new())?;
            println!("{}", console::style("Organizations").bold().cyan());
            print_organizations(&organizations);
        }
        OrgsCommands::Search { name } => {
            let result = ctx.api.search_organizations(&mut ctx.session, name.trim()).await;
            let organizations = ctx.settle(result, &MessageOverrides::new())?;
            print_organizations(&organizations);
        }
        OrgsCommands::Show { slug } => {
            let overrides = MessageOverrides::new().not_found("Could not find that organization.");
            let result = ctx.api.organization_detail(&mut ctx.session, &slug).await;
            let detail = ctx.settle(result, &overrides)?;

            let role = match detail.role {
                OrganizationRole::Admin => "admin",
                OrganizationRole::Member => "member",
            };
            println!(
                "{} {}",
                console::style(&detail.organization.organization_name).bold().cyan(),
                console::style(format!("[{}]", role)).dim()
            );
            println!("  id: {}", detail.organization.organization_id);
            println!();
            if detail.projects.is_empty() {
                println!("{}", console::style("No projects yet.").dim());
            }
            for project in &detail.projects {
                println!(
                    "  {:<8} {:<40} {}",
                    project.project_id,
                    project.project_name,
                    console::style(deadline_note(&project.deadline)).dim()
                );
            }
        }
        OrgsCommands::Create { name } => {
            let password = Password::new()
                .with_prompt("Organization password")
                .with_confirmation("Confirm password", "Passwords do not match.")
                .interact()
                .context("Failed to read password")?;
            let organization = NewOrganization {
                organization_name: name.trim().to_string(),
                organization_password: password.clone(),
                password2: password,
            };
            print_problems(&organization.validate())?;

            let result = ctx
                .api
                .create_organization(&mut ctx.session, &organization)
                .await;
            let created = ctx.settle(result, &MessageOverrides::new())?;
            println!(
                "{} Created organization {} (id {})",
                console::style("✓").green(),
                console::style(&created.organization_name).bold(),
                created.organization_id
            );
        }
        OrgsCommands::Join { name } => {
            let password = Password::new()
                .with_prompt("Organization password")
                .interact()
                .context("Failed to read password")?;
            let auth = OrganizationAuth {
                organization_name: name.trim().to_string(),
                password,
            };
            let result = ctx.api.join_organization(&mut ctx.session, &auth).await;
            ctx.save_session()?;
            if let Err(err) = result {
                if let Some(message) = join_error_message(&err) {
                    anyhow::bail!(message);
                }
                return Err(api_failure(err, &MessageOverrides::new()));
            }
            println!("{} Joined {}", console::style("✓").green(), auth.organization_name);
        }
        OrgsCommands::Admins { organization_id } => {
            let overrides =
                MessageOverrides::new().not_found("Could not get organization administrators");
            let result = ctx
                .api
                .organization_admins(&mut ctx.session, &organization_id)
                .await;
            let admins = ctx.settle(result, &overrides)?;
            print_members(&admins, "No administrators.");
        }
        OrgsCommands::NonAdmins { organization_id } => {
            let overrides =
                MessageOverrides::new().not_found("Could not get organization members");
            let result = ctx
                .api
                .organization_non_admins(&mut ctx.session, &organization_id)
                .await;
            let members = ctx.settle(result, &overrides)?;
            print_members(&members, "Every member is already an administrator.");
        }
        OrgsCommands::AddAdmins {
            organization_id,
            usernames,
        } => {
            let overrides = MessageOverrides::new()
                .forbidden("Only administrators can add administrators.");
            let result = ctx
                .api
                .add_organization_admins(&mut ctx.session, &organization_id, &usernames)
                .await;
            ctx.settle(result, &overrides)?;
            println!(
                "{} Added {} administrator(s)",
                console::style("✓").green(),
                usernames.len()
            );
        }
        OrgsCommands::Leave {
            organization_id,
            force,
        } => {
            if !force {
                let confirm = Confirm::new()
                    .with_prompt("Leave this organization?")
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !confirm {
                    println!("Cancelled");
                    return Ok(());
                }
            }
            let result = ctx
                .api
                .leave_organization(&mut ctx.session, &organization_id)
                .await;
            let detail = ctx.settle(result, &MessageOverrides::new())?;
            println!(
                "{} {}",
                console::style("✓").green(),
                detail.unwrap_or_else(|| "You have left the organization.".to_string())
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pms::errors::HttpFailure;
    use serde_json::json;

    #[test]
    fn test_join_error_message_reads_error_key() {
        let err = ApiError::Http(HttpFailure::new(
            Some(400),
            Some(json!({"error": "Invalid organization credentials"})),
        ));
        assert_eq!(
            join_error_message(&err).as_deref(),
            Some("Invalid organization credentials")
        );
    }

    #[test]
    fn test_join_error_message_absent() {
        let err = ApiError::Http(HttpFailure::new(Some(400), Some(json!({"detail": "x"}))));
        assert!(join_error_message(&err).is_none());
        assert!(join_error_message(&ApiError::Http(HttpFailure::no_response())).is_none());
    }
}
