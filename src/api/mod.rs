//! HTTP client for the project-management REST API.
//!
//! Responses arrive as snake_case JSON and leave this module camelized and
//! typed. Failures are [`ApiError`]s; use [`crate::errors::error_message`]
//! to turn one into display text.
//!
//! | Module          | Endpoints                                         |
//! |-----------------|---------------------------------------------------|
//! | `auth`          | login, logout, registration, username, profile    |
//! | `organizations` | listing, search, detail, creation, admins, exit   |
//! | `projects`      | projects, stats, members, workflow, phases        |
//! | `tasks`         | task creation, detail, assignment, status         |
//! | `catalog`       | industries and project templates                  |

pub mod auth;
pub mod catalog;
pub mod csrf;
pub mod organizations;
pub mod projects;
pub mod tasks;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::PmsConfig;
use crate::errors::{ApiError, HttpFailure};
use crate::normalize::camelize;
use crate::session::Session;

const TOKEN_REFRESH_PATH: &str = "dj-rest-auth/token/refresh/";

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;

        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            cookies,
        })
    }

    pub fn from_config(config: &PmsConfig) -> anyhow::Result<Self> {
        Self::new(&config.api_url(), config.timeout(), config.user_agent())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidPath {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    fn csrf_token(&self) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        csrf::csrf_token(header.to_str().ok()?)
    }

    /// The token to send: a cookie set in this process, else the one the
    /// session carried over from an earlier run.
    fn csrf_for(&self, session: &Session) -> Option<String> {
        self.csrf_token().or_else(|| session.csrf_token.clone())
    }

    /// Copy a `csrftoken` cookie from the jar onto the session so it
    /// outlives this process.
    fn remember_csrf(&self, session: &mut Session) {
        if let Some(token) = self.csrf_token() {
            if session.csrf_token.as_deref() != Some(token.as_str()) {
                tracing::debug!("storing new CSRF token on session");
                session.csrf_token = Some(token);
            }
        }
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &Url,
        query: &[(&str, &str)],
        body: Option<&Value>,
        bearer: Option<&str>,
        csrf: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.http.request(method.clone(), url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if !method.is_safe() {
            if let Some(token) = csrf {
                request = request.header(csrf::CSRF_HEADER, token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "sending request");
        request.send().await.map_err(|e| {
            tracing::debug!(%method, %url, error = %e, "request got no response");
            ApiError::Http(HttpFailure::new(e.status().map(|s| s.as_u16()), None))
        })
    }

    /// Read a response into a camelized JSON value, or an error carrying
    /// the camelized error body.
    async fn read(path: &str, response: reqwest::Response) -> Result<Option<Value>, ApiError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|_| ApiError::Http(HttpFailure::no_response()))?;

        tracing::debug!(path, status = status.as_u16(), bytes = bytes.len(), "received response");

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .map(|value| camelize(&value));
            return Err(ApiError::Http(HttpFailure::new(Some(status.as_u16()), body)));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })?;
        Ok(Some(camelize(&value)))
    }

    /// Exchange the session's refresh token for a new access token.
    async fn refresh_access_token(&self, session: &mut Session) -> Result<(), ApiError> {
        let Some(refresh) = session.refresh_token.clone() else {
            return Err(ApiError::Http(HttpFailure::new(Some(401), None)));
        };
        let url = self.url(TOKEN_REFRESH_PATH)?;
        let body = serde_json::json!({ "refresh": refresh });
        let csrf = self.csrf_for(session);
        let response = self
            .dispatch(&Method::POST, &url, &[], Some(&body), None, csrf.as_deref())
            .await?;
        self.remember_csrf(session);
        let value = Self::read(TOKEN_REFRESH_PATH, response)
            .await?
            .unwrap_or(Value::Null);

        let access = value
            .get("access")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Decode {
                path: TOKEN_REFRESH_PATH.to_string(),
                source: <serde_json::Error as serde::de::Error>::missing_field("access"),
            })?;
        session.access_token = Some(access.to_string());
        if let Some(rotated) = value.get("refresh").and_then(Value::as_str) {
            session.refresh_token = Some(rotated.to_string());
        }
        Ok(())
    }

    /// Send a request and return the camelized response body, if any.
    ///
    /// A 401 triggers one token refresh and retry per request.
    pub async fn send(
        &self,
        session: &mut Session,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, ApiError> {
        let url = self.url(path)?;
        let csrf = self.csrf_for(session);
        let mut response = self
            .dispatch(
                &method,
                &url,
                query,
                body,
                session.access_token.as_deref(),
                csrf.as_deref(),
            )
            .await?;
        self.remember_csrf(session);

        if response.status() == StatusCode::UNAUTHORIZED
            && session.refresh_token.is_some()
            && !session.refresh_attempted
        {
            session.refresh_attempted = true;
            tracing::info!(path, "access token rejected, attempting refresh");
            match self.refresh_access_token(session).await {
                Ok(()) => {
                    let csrf = self.csrf_for(session);
                    response = self
                        .dispatch(
                            &method,
                            &url,
                            query,
                            body,
                            session.access_token.as_deref(),
                            csrf.as_deref(),
                        )
                        .await?;
                    self.remember_csrf(session);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "token refresh failed, clearing tokens");
                    session.clear_tokens();
                }
            }
        }

        let result = Self::read(path, response).await;
        if result.is_ok() {
            session.refresh_attempted = false;
        }
        result
    }

    /// Send a request and deserialize the camelized body into `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        session: &mut Session,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let value = self
            .send(session, method, path, query, body)
            .await?
            .unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        session: &mut Session,
        path: &str,
    ) -> Result<T, ApiError> {
        self.fetch(session, Method::GET, path, &[], None).await
    }
}

/// Serialize a request payload into a JSON body.
pub(crate) fn to_body<T: serde::Serialize>(path: &str, payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5), "pms-test").unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let api = client("http://localhost:8000/api");
        assert_eq!(api.base_url().as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn test_paths_join_under_base() {
        let api = client("http://localhost:8000/api/");
        assert_eq!(
            api.url("organizations/").unwrap().as_str(),
            "http://localhost:8000/api/organizations/"
        );
        assert_eq!(
            api.url("/organizations/create/").unwrap().as_str(),
            "http://localhost:8000/api/organizations/create/"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = ApiClient::new("not a url", Duration::from_secs(1), "pms-test");
        assert!(result.is_err());
    }

    #[test]
    fn test_no_csrf_token_without_cookie() {
        let api = client("http://localhost:8000/");
        assert!(api.csrf_token().is_none());
    }

    #[test]
    fn test_csrf_token_read_from_jar() {
        let api = client("http://localhost:8000/");
        api.cookies.add_cookie_str(
            "csrftoken=abc123; Path=/",
            &Url::parse("http://localhost:8000/").unwrap(),
        );
        assert_eq!(api.csrf_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_jar_token_preferred_over_saved_one() {
        let api = client("http://localhost:8000/");
        let mut session = Session::new();
        session.csrf_token = Some("saved".to_string());
        assert_eq!(api.csrf_for(&session).as_deref(), Some("saved"));

        api.cookies.add_cookie_str(
            "csrftoken=fresh; Path=/",
            &Url::parse("http://localhost:8000/").unwrap(),
        );
        assert_eq!(api.csrf_for(&session).as_deref(), Some("fresh"));

        api.remember_csrf(&mut session);
        assert_eq!(session.csrf_token.as_deref(), Some("fresh"));
    }

    #[test]
    fn test_to_body_serializes_payload() {
        let body = to_body("x/", &serde_json::json!({"name": "Design"})).unwrap();
        assert_eq!(body["name"], "Design");
    }
}
