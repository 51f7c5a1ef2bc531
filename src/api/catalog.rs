//! Industries and project templates.

use reqwest::Method;

use super::{ApiClient, to_body};
use crate::errors::ApiError;
use crate::models::{Industry, NewTemplate, ProjectTemplate};
use crate::session::Session;

impl ApiClient {
    pub async fn industries(&self, session: &mut Session) -> Result<Vec<Industry>, ApiError> {
        self.get(session, "industry/list/").await
    }

    /// Templates whose name contains `name`. An empty name lists all of them.
    pub async fn search_templates(
        &self,
        session: &mut Session,
        name: &str,
    ) -> Result<Vec<ProjectTemplate>, ApiError> {
        self.fetch(session, Method::GET, "template/search/", &[("name", name)], None)
            .await
    }

    pub async fn create_template(
        &self,
        session: &mut Session,
        template: &NewTemplate,
    ) -> Result<(), ApiError> {
        let path = "template/create/";
        let body = to_body(path, template)?;
        self.send(session, Method::POST, path, &[], Some(&body)).await?;
        Ok(())
    }
}
