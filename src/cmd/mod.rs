//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                                   |
//! |-----------------|----------------------------------------------------|
//! | `auth`          | `Login`, `Logout`, `Signup`, `Whoami`              |
//! | `user`          | `User`                                             |
//! | `organizations` | `Orgs`                                             |
//! | `projects`      | `Projects`                                         |
//! | `phases`        | `Phases`                                           |
//! | `tasks`         | `Tasks`                                            |
//! | `kanban`        | `Kanban`                                           |
//! | `catalog`       | `Catalog`                                          |
//! | `config`        | `Config`                                           |

pub mod auth;
pub mod catalog;
pub mod config;
pub mod kanban;
pub mod organizations;
pub mod phases;
pub mod projects;
pub mod tasks;
pub mod user;

pub use auth::{cmd_login, cmd_logout, cmd_signup, cmd_whoami};
pub use catalog::cmd_catalog;
pub use config::cmd_config;
pub use kanban::cmd_kanban;
pub use organizations::cmd_orgs;
pub use phases::cmd_phases;
pub use projects::cmd_projects;
pub use tasks::cmd_tasks;
pub use user::cmd_user;

use anyhow::Result;
use chrono::NaiveDate;

use pms::api::ApiClient;
use pms::config::{PmsConfig, resolve_state_dir};
use pms::deadline::time_remaining;
use pms::errors::{ApiError, MessageOverrides, error_message};
use pms::models::Member;
use pms::session::{Session, SessionStore};

use crate::Cli;

/// State shared by the commands that talk to the API.
pub struct Context {
    pub config: PmsConfig,
    pub api: ApiClient,
    pub session: Session,
    store: SessionStore,
}

impl Context {
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = load_config(cli)?;
        let api = ApiClient::from_config(&config)?;
        let store = SessionStore::new(config.session_file());
        let session = store.load()?;
        tracing::debug!(
            api_url = %api.base_url(),
            logged_in = session.is_logged_in(),
            "loaded command context"
        );
        Ok(Self {
            config,
            api,
            session,
            store,
        })
    }

    /// Persist the session, removing the file once nothing is left in it.
    pub fn save_session(&self) -> Result<()> {
        if self.session == Session::default() {
            self.store.clear()
        } else {
            self.store.save(&self.session)
        }
    }

    /// Save the session (tokens may have been refreshed or cleared by the
    /// call) and convert an API error into a user-facing one.
    pub fn settle<T>(
        &self,
        result: std::result::Result<T, ApiError>,
        overrides: &MessageOverrides,
    ) -> Result<T> {
        self.save_session()?;
        result.map_err(|e| api_failure(e, overrides))
    }

    pub fn require_login(&self) -> Result<()> {
        if !self.session.is_logged_in() {
            anyhow::bail!("Not logged in. Run 'pms login' first.");
        }
        Ok(())
    }
}

pub fn load_config(cli: &Cli) -> Result<PmsConfig> {
    let state_dir = resolve_state_dir(cli.state_dir.as_deref())?;
    PmsConfig::with_cli_args(state_dir, cli.api_url.clone())
}

/// Turn an API error into a user-facing error, listing any field errors
/// under the classified message.
pub fn api_failure(err: ApiError, overrides: &MessageOverrides) -> anyhow::Error {
    let mut message = error_message(&err, Some(overrides));
    if let Some(failure) = err.http() {
        for (field, problems) in failure.field_errors() {
            for problem in problems {
                message.push_str(&format!("\n  {}: {}", field, problem));
            }
        }
    }
    tracing::debug!(error = %err, "command failed");
    anyhow::anyhow!(message)
}

/// Message printed for an error that reached `main`.
pub fn describe_error(err: &anyhow::Error) -> String {
    let is_api_error = err.chain().any(|cause| cause.downcast_ref::<ApiError>().is_some());
    if is_api_error {
        error_message(err.as_ref(), None)
    } else {
        format!("{:#}", err)
    }
}

pub fn print_problems(problems: &[String]) -> Result<()> {
    if problems.is_empty() {
        return Ok(());
    }
    for problem in problems {
        eprintln!("  {} {}", console::style("-").red(), problem);
    }
    anyhow::bail!("Please fix the problems above and try again.")
}

pub fn print_members(members: &[Member], empty: &str) {
    if members.is_empty() {
        println!("{}", console::style(empty).dim());
        return;
    }
    for member in members {
        println!("  {}", member.username);
    }
}

/// Time left until a deadline given as `YYYY-MM-DD` or an ISO timestamp.
pub fn deadline_note(deadline: &str) -> String {
    let date_part = deadline.get(..10).unwrap_or(deadline);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => time_remaining(date, chrono::Local::now().date_naive()),
        Err(_) => deadline.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pms::errors::HttpFailure;
    use serde_json::json;

    #[test]
    fn test_api_failure_lists_field_errors() {
        let err = ApiError::Http(HttpFailure::new(
            Some(400),
            Some(json!({"taskName": ["This field is required."]})),
        ));
        let message = api_failure(err, &MessageOverrides::new()).to_string();
        assert!(message.starts_with("Bad request"));
        assert!(message.contains("taskName: This field is required."));
    }

    #[test]
    fn test_api_failure_uses_override() {
        let err = ApiError::Http(HttpFailure::new(Some(404), None));
        let overrides = MessageOverrides::new().not_found("Could not get project members.");
        assert_eq!(api_failure(err, &overrides).to_string(), "Could not get project members.");
    }

    #[test]
    fn test_describe_plain_error_keeps_context() {
        let err = anyhow::anyhow!("inner").context("Failed to read session file");
        assert_eq!(describe_error(&err), "Failed to read session file: inner");
    }

    #[test]
    fn test_describe_api_error_is_classified() {
        let err = anyhow::Error::new(ApiError::Http(HttpFailure::no_response()))
            .context("Failed to list organizations");
        assert_eq!(describe_error(&err), "The service is currently unavailable");
    }

    #[test]
    fn test_deadline_note_falls_back_to_raw_text() {
        assert_eq!(deadline_note("soon"), "soon");
        assert_eq!(deadline_note("2000-01-01"), "Time is overdue");
        assert_eq!(deadline_note("2000-01-01T10:00:00Z"), "Time is overdue");
    }
}
