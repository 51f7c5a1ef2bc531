//! View models deserialized from camelized API responses, plus the request
//! payloads the client sends.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Accept identifiers sent as either JSON strings or numbers.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

// ── Users and members ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub pk: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username_slug: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// A user as listed in organization, project, or task membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub username: String,
}

/// Body of a successful `dj-rest-auth` login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

// ── Organizations ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganizationRole {
    Member,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(deserialize_with = "id_string")]
    pub organization_id: String,
    pub organization_name: String,
    pub organization_name_slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDetail {
    #[serde(flatten)]
    pub organization: Organization,
    #[serde(default)]
    pub projects: Vec<Project>,
    pub role: OrganizationRole,
}

// ── Projects and phases ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectRole {
    Manager,
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub project_name: String,
    pub project_name_slug: String,
    #[serde(default)]
    pub description: String,
    pub deadline: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub organization: Option<Organization>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub tasks: u64,
    pub members: u64,
    #[serde(default)]
    pub description: String,
    pub tasks_in_progress: u64,
    pub tasks_on_hold: u64,
    pub tasks_completed: u64,
    pub percentage_completion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPhase {
    #[serde(deserialize_with = "id_string")]
    pub phase_id: String,
    pub phase_name: String,
}

/// A project together with its ordered phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWorkflow {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub phases: Vec<ProjectPhase>,
}

/// A phase with its tasks grouped by status, as shown on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDetail {
    pub project: Project,
    pub phase: ProjectPhase,
    #[serde(default)]
    pub role: Option<ProjectRole>,
    #[serde(default)]
    pub on_hold: Vec<Task>,
    #[serde(default)]
    pub in_progress: Vec<Task>,
    #[serde(default)]
    pub completed: Vec<Task>,
}

// ── Tasks ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    InProgress,
    OnHold,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::OnHold => "ON_HOLD",
            Self::Done => "DONE",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "IN_PROGRESS" => Ok(Self::InProgress),
            "ON_HOLD" => Ok(Self::OnHold),
            "DONE" | "COMPLETED" => Ok(Self::Done),
            _ => anyhow::bail!(
                "Invalid task status '{}'. Valid values: in_progress, on_hold, done",
                s
            ),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "id_string")]
    pub task_id: String,
    pub task_name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    pub deadline: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_phase: Option<ProjectPhase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    #[serde(default)]
    pub assignees: Vec<Member>,
    #[serde(default)]
    pub role: Option<ProjectRole>,
}

/// A project with every task across its phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTasks {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

// ── Catalog ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Industry {
    #[serde(deserialize_with = "id_string")]
    pub industry_id: String,
    pub industry_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    #[serde(deserialize_with = "id_string")]
    pub template_id: String,
    pub template_name: String,
    #[serde(default)]
    pub industry: Option<Industry>,
}

// ── Request payloads ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

impl Registration {
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.username.trim().is_empty() {
            problems.push("A username is required.".to_string());
        }
        if !self.email.contains('@') {
            problems.push("Enter a valid email address.".to_string());
        }
        if self.password1 != self.password2 {
            problems.push("Passwords do not match.".to_string());
        }
        problems
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    pub organization_name: String,
    pub organization_password: String,
    pub password2: String,
}

impl NewOrganization {
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.organization_name.trim().is_empty() {
            problems.push("Organization name is required.".to_string());
        }
        if self.organization_password.trim() != self.password2.trim() {
            problems.push("Passwords do not match.".to_string());
        }
        problems
    }
}

/// Credentials for joining an existing organization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationAuth {
    pub organization_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub project_name: String,
    pub description: String,
    pub deadline: NaiveDate,
}

impl NewProject {
    pub const MIN_NAME_LEN: usize = 5;
    pub const MAX_NAME_LEN: usize = 60;
    pub const MAX_DESCRIPTION_LEN: usize = 500;

    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let name_len = self.project_name.trim().chars().count();
        if name_len == 0 {
            problems.push("The project's name is required.".to_string());
        } else if !(Self::MIN_NAME_LEN..=Self::MAX_NAME_LEN).contains(&name_len) {
            problems.push(format!(
                "A project's name must be between {} and {} characters long.",
                Self::MIN_NAME_LEN,
                Self::MAX_NAME_LEN
            ));
        }
        if self.description.trim().chars().count() > Self::MAX_DESCRIPTION_LEN {
            problems.push(format!(
                "Description is too long. Maximum length is {} characters.",
                Self::MAX_DESCRIPTION_LEN
            ));
        }
        problems
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub project_phase: String,
    pub task_name: String,
    pub deadline: NaiveDate,
    pub description: String,
}

impl NewTask {
    /// Earliest deadline accepted for a task created on `today`.
    pub fn min_deadline(today: NaiveDate) -> NaiveDate {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }

    pub fn validate(&self, today: NaiveDate) -> Vec<String> {
        let mut problems = Vec::new();
        if self.task_name.trim().is_empty() {
            problems.push("A task name is required.".to_string());
        }
        let earliest = Self::min_deadline(today);
        if self.deadline < earliest {
            problems.push(format!("The deadline must be on or after {}.", earliest));
        }
        problems
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    pub industry: String,
    pub template_name: String,
    pub template_phases: Vec<String>,
}

impl NewTemplate {
    pub const MAX_NAME_LEN: usize = 50;

    /// Build a template, trimming phase names and dropping blanks and
    /// repeats while keeping the first occurrence order.
    pub fn new(industry: impl Into<String>, template_name: impl Into<String>, phases: &[String]) -> Self {
        let mut template_phases: Vec<String> = Vec::new();
        for phase in phases {
            let phase = phase.trim();
            if !phase.is_empty() && !template_phases.iter().any(|p| p == phase) {
                template_phases.push(phase.to_string());
            }
        }
        Self {
            industry: industry.into(),
            template_name: template_name.into().trim().to_string(),
            template_phases,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.template_name.is_empty() {
            problems.push("Template name cannot be empty.".to_string());
        } else if self.template_name.chars().count() > Self::MAX_NAME_LEN {
            problems.push(format!(
                "Template name must be {} characters or below.",
                Self::MAX_NAME_LEN
            ));
        }
        if self.template_phases.is_empty() {
            problems.push("A template must have a workflow.".to_string());
        }
        problems
    }
}
