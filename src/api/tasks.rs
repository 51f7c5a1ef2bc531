//! Task endpoints.

use reqwest::Method;
use serde_json::json;

use super::{ApiClient, to_body};
use crate::errors::ApiError;
use crate::models::{Member, NewTask, TaskDetail, TaskStatus};
use crate::session::Session;

impl ApiClient {
    pub async fn create_task(&self, session: &mut Session, task: &NewTask) -> Result<(), ApiError> {
        let path = "task/create/";
        let mut task = task.clone();
        task.task_name = task.task_name.trim().to_string();
        let body = to_body(path, &task)?;
        self.send(session, Method::POST, path, &[], Some(&body)).await?;
        Ok(())
    }

    pub async fn task_detail(
        &self,
        session: &mut Session,
        task_id: &str,
    ) -> Result<TaskDetail, ApiError> {
        self.get(session, &format!("task/detail/{}/", task_id)).await
    }

    /// Project members not yet assigned to the task.
    pub async fn task_non_assignees(
        &self,
        session: &mut Session,
        task_id: &str,
    ) -> Result<Vec<Member>, ApiError> {
        self.get(session, &format!("task/{}/non-assignees/", task_id)).await
    }

    pub async fn assign_task(
        &self,
        session: &mut Session,
        task_id: &str,
        usernames: &[String],
    ) -> Result<(), ApiError> {
        let path = format!("task/{}/assign/", task_id);
        let body = json!({ "assignees": usernames });
        self.send(session, Method::POST, &path, &[], Some(&body)).await?;
        Ok(())
    }

    /// Move a task to another status column.
    pub async fn update_task_status(
        &self,
        session: &mut Session,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<(), ApiError> {
        let path = format!("task/{}/status/update/", task_id);
        let body = json!({ "status": status.as_str() });
        tracing::debug!(task_id, %status, "updating task status");
        self.send(session, Method::PUT, &path, &[], Some(&body)).await?;
        Ok(())
    }
}
