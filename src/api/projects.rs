//! Project and phase endpoints.

use reqwest::Method;
use serde_json::json;

use super::{ApiClient, to_body};
use crate::errors::ApiError;
use crate::models::{
    Member, NewProject, PhaseDetail, Project, ProjectPhase, ProjectStats, ProjectTasks,
    ProjectWorkflow,
};
use crate::session::Session;

impl ApiClient {
    /// Projects the signed-in user is a member of.
    pub async fn projects(&self, session: &mut Session) -> Result<Vec<Project>, ApiError> {
        self.get(session, "user/projects/").await
    }

    pub async fn create_project(
        &self,
        session: &mut Session,
        project: &NewProject,
    ) -> Result<(), ApiError> {
        let path = "project/create/";
        let mut project = project.clone();
        project.project_name = project.project_name.trim().to_string();
        project.description = project.description.trim().to_string();
        let body = to_body(path, &project)?;
        self.send(session, Method::POST, path, &[], Some(&body)).await?;
        Ok(())
    }

    pub async fn project_stats(
        &self,
        session: &mut Session,
        project_id: &str,
    ) -> Result<ProjectStats, ApiError> {
        self.fetch(session, Method::GET, "project/stats/", &[("pk", project_id)], None)
            .await
    }

    pub async fn project_members(
        &self,
        session: &mut Session,
        project_id: &str,
    ) -> Result<Vec<Member>, ApiError> {
        self.get(session, &format!("project/{}/members/", project_id)).await
    }

    /// Organization members not yet on the project.
    pub async fn project_non_members(
        &self,
        session: &mut Session,
        project_id: &str,
    ) -> Result<Vec<Member>, ApiError> {
        self.get(session, &format!("project/{}/non-members/", project_id))
            .await
    }

    pub async fn add_project_members(
        &self,
        session: &mut Session,
        project_id: &str,
        usernames: &[String],
    ) -> Result<(), ApiError> {
        let path = format!("project/{}/members/add/", project_id);
        let body = json!({ "members": usernames });
        self.send(session, Method::POST, &path, &[], Some(&body)).await?;
        Ok(())
    }

    pub async fn project_tasks(
        &self,
        session: &mut Session,
        project_id: &str,
    ) -> Result<ProjectTasks, ApiError> {
        self.get(session, &format!("project/{}/tasks/", project_id)).await
    }

    // ── Phases ──────────────────────────────────────────────────────

    pub async fn project_workflow(
        &self,
        session: &mut Session,
        project_id: &str,
    ) -> Result<ProjectWorkflow, ApiError> {
        self.get(session, &format!("project/{}/workflow/", project_id)).await
    }

    pub async fn create_phase(
        &self,
        session: &mut Session,
        project_id: &str,
        name: &str,
    ) -> Result<ProjectPhase, ApiError> {
        let path = format!("project/{}/phase/create/", project_id);
        let body = json!({ "name": name.trim() });
        self.fetch(session, Method::POST, &path, &[], Some(&body)).await
    }

    pub async fn phase_detail(
        &self,
        session: &mut Session,
        phase_id: &str,
    ) -> Result<PhaseDetail, ApiError> {
        self.get(session, &format!("project/phase/{}/detail/", phase_id)).await
    }

    pub async fn rename_phase(
        &self,
        session: &mut Session,
        phase_id: &str,
        name: &str,
    ) -> Result<(), ApiError> {
        let path = format!("project/phase/{}/rename/", phase_id);
        let body = json!({ "name": name.trim() });
        self.send(session, Method::PUT, &path, &[], Some(&body)).await?;
        Ok(())
    }

    pub async fn delete_phase(&self, session: &mut Session, phase_id: &str) -> Result<(), ApiError> {
        let path = format!("project/phase/{}/delete/", phase_id);
        self.send(session, Method::DELETE, &path, &[], None).await?;
        Ok(())
    }
}
