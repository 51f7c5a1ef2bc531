//! Organization endpoints.

use reqwest::Method;
use serde_json::{Value, json};

use super::{ApiClient, to_body};
use crate::errors::ApiError;
use crate::models::{Member, NewOrganization, Organization, OrganizationAuth, OrganizationDetail};
use crate::session::Session;

impl ApiClient {
    /// Organizations the signed-in user belongs to.
    pub async fn organizations(&self, session: &mut Session) -> Result<Vec<Organization>, ApiError> {
        self.get(session, "organizations/").await
    }

    pub async fn search_organizations(
        &self,
        session: &mut Session,
        name: &str,
    ) -> Result<Vec<Organization>, ApiError> {
        self.fetch(
            session,
            Method::GET,
            "organizations/search/",
            &[("name", name)],
            None,
        )
        .await
    }

    pub async fn create_organization(
        &self,
        session: &mut Session,
        organization: &NewOrganization,
    ) -> Result<Organization, ApiError> {
        let path = "organizations/create/";
        let body = to_body(path, organization)?;
        self.fetch(session, Method::POST, path, &[], Some(&body)).await
    }

    pub async fn organization_detail(
        &self,
        session: &mut Session,
        slug: &str,
    ) -> Result<OrganizationDetail, ApiError> {
        self.get(session, &format!("organizations/{}/detail/", slug)).await
    }

    /// Join an existing organization with its name and password.
    pub async fn join_organization(
        &self,
        session: &mut Session,
        auth: &OrganizationAuth,
    ) -> Result<(), ApiError> {
        let path = "organizations/auth/";
        let body = to_body(path, auth)?;
        self.send(session, Method::POST, path, &[], Some(&body)).await?;
        Ok(())
    }

    pub async fn organization_admins(
        &self,
        session: &mut Session,
        organization_id: &str,
    ) -> Result<Vec<Member>, ApiError> {
        self.get(session, &format!("organizations/{}/admins/", organization_id))
            .await
    }

    pub async fn organization_non_admins(
        &self,
        session: &mut Session,
        organization_id: &str,
    ) -> Result<Vec<Member>, ApiError> {
        self.get(session, &format!("organizations/{}/non-admins/", organization_id))
            .await
    }

    pub async fn add_organization_admins(
        &self,
        session: &mut Session,
        organization_id: &str,
        usernames: &[String],
    ) -> Result<(), ApiError> {
        let path = format!("organizations/{}/admins/create/", organization_id);
        let body = json!({ "members": usernames });
        self.send(session, Method::POST, &path, &[], Some(&body)).await?;
        Ok(())
    }

    /// Leave an organization. Returns the server's confirmation message.
    pub async fn leave_organization(
        &self,
        session: &mut Session,
        organization_id: &str,
    ) -> Result<Option<String>, ApiError> {
        let path = format!("organizations/{}/exit/", organization_id);
        let body = self.send(session, Method::DELETE, &path, &[], None).await?;
        Ok(body
            .as_ref()
            .and_then(|value| value.get("detail"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}
