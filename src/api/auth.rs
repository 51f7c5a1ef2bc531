//! Account endpoints: login, logout, registration and profile.

use reqwest::Method;
use serde_json::json;

use super::{ApiClient, to_body};
use crate::errors::ApiError;
use crate::models::{AuthResponse, Credentials, Registration, User};
use crate::session::Session;

const LOGIN_PATH: &str = "dj-rest-auth/login/";
const LOGOUT_PATH: &str = "dj-rest-auth/logout/";
const REGISTRATION_PATH: &str = "dj-rest-auth/registration/";
const USERNAME_UPDATE_PATH: &str = "username/update/";

impl ApiClient {
    /// Log in and store the returned user and tokens in `session`.
    ///
    /// Any previous tokens are not sent with the login request.
    pub async fn login(
        &self,
        session: &mut Session,
        credentials: &Credentials,
    ) -> Result<User, ApiError> {
        let body = to_body(LOGIN_PATH, credentials)?;
        let mut anonymous = Session::new();
        let auth: AuthResponse = self
            .fetch(&mut anonymous, Method::POST, LOGIN_PATH, &[], Some(&body))
            .await?;

        tracing::info!(username = %auth.user.username, "logged in");
        session.sign_in(auth.user.clone(), auth.access, auth.refresh);
        Ok(auth.user)
    }

    /// Log out on the server and clear `session`.
    ///
    /// The local session is cleared even when the server call fails.
    pub async fn logout(&self, session: &mut Session) -> Result<(), ApiError> {
        let result = self
            .send(session, Method::POST, LOGOUT_PATH, &[], None)
            .await
            .map(|_| ());
        if let Err(err) = &result {
            tracing::warn!(error = %err, "server logout failed");
        }
        session.clear();
        result
    }

    /// Register a new account. On success the session is signed in when the
    /// server returns tokens.
    pub async fn register(
        &self,
        session: &mut Session,
        registration: &Registration,
    ) -> Result<User, ApiError> {
        let body = to_body(REGISTRATION_PATH, registration)?;
        let mut anonymous = Session::new();
        let auth: AuthResponse = self
            .fetch(&mut anonymous, Method::POST, REGISTRATION_PATH, &[], Some(&body))
            .await?;

        tracing::info!(username = %auth.user.username, "registered");
        if auth.access.is_some() {
            session.sign_in(auth.user.clone(), auth.access, auth.refresh);
        }
        Ok(auth.user)
    }

    /// Change the signed-in user's username.
    pub async fn update_username(
        &self,
        session: &mut Session,
        username: &str,
    ) -> Result<User, ApiError> {
        let body = json!({ "username": username.trim() });
        let user: User = self
            .fetch(session, Method::PUT, USERNAME_UPDATE_PATH, &[], Some(&body))
            .await?;
        session.set_user(user.clone());
        Ok(user)
    }

    pub async fn user_profile(
        &self,
        session: &mut Session,
        username_slug: &str,
    ) -> Result<User, ApiError> {
        self.get(session, &format!("user/{}/", username_slug)).await
    }
}
