//! Typed API errors and the user-facing error classifier.
//!
//! Every call in [`crate::api`] fails with an [`ApiError`]. Front ends never
//! show those directly; they pass the caught error to [`error_message`],
//! which turns it into exactly one string fit for an end user.
//!
//! Precedence for HTTP failures is strict, per status class:
//! server-supplied `detail` > caller override > built-in default.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub const GENERIC_MESSAGE: &str = "An unexpected error occurred";
pub const BAD_REQUEST_MESSAGE: &str = "Bad request";
pub const FORBIDDEN_MESSAGE: &str = "You are not authorized to access this resource";
pub const NOT_FOUND_MESSAGE: &str = "Could not find the requested resource";
pub const SERVER_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const UNAVAILABLE_MESSAGE: &str = "The service is currently unavailable";

/// Status classes the classifier distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    BadRequest,
    Forbidden,
    NotFound,
    /// Any status >= 500.
    ServerError,
    /// No status at all: the request never got a response.
    Unavailable,
    Other,
}

impl StatusClass {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            None => Self::Unavailable,
            Some(400) => Self::BadRequest,
            Some(403) => Self::Forbidden,
            Some(404) => Self::NotFound,
            Some(code) if code >= 500 => Self::ServerError,
            Some(_) => Self::Other,
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => BAD_REQUEST_MESSAGE,
            Self::Forbidden => FORBIDDEN_MESSAGE,
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::ServerError => SERVER_ERROR_MESSAGE,
            Self::Unavailable => UNAVAILABLE_MESSAGE,
            Self::Other => GENERIC_MESSAGE,
        }
    }
}

/// Per-call replacement messages keyed by 400, 403, 404 and 500.
///
/// The 500 entry also covers requests that got no response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOverrides {
    pub bad_request: Option<String>,
    pub forbidden: Option<String>,
    pub not_found: Option<String>,
    pub server_error: Option<String>,
}

impl MessageOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bad_request(mut self, message: impl Into<String>) -> Self {
        self.bad_request = Some(message.into());
        self
    }

    pub fn forbidden(mut self, message: impl Into<String>) -> Self {
        self.forbidden = Some(message.into());
        self
    }

    pub fn not_found(mut self, message: impl Into<String>) -> Self {
        self.not_found = Some(message.into());
        self
    }

    pub fn server_error(mut self, message: impl Into<String>) -> Self {
        self.server_error = Some(message.into());
        self
    }

    /// The override for a status class, if one is set and non-empty.
    pub fn get(&self, class: StatusClass) -> Option<&str> {
        let slot = match class {
            StatusClass::BadRequest => &self.bad_request,
            StatusClass::Forbidden => &self.forbidden,
            StatusClass::NotFound => &self.not_found,
            StatusClass::ServerError | StatusClass::Unavailable => &self.server_error,
            StatusClass::Other => return None,
        };
        slot.as_deref().filter(|message| !message.is_empty())
    }
}

/// A failed HTTP exchange: the status (if a response arrived) and the
/// camelized JSON error body (if it had one).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpFailure {
    pub status: Option<u16>,
    pub body: Option<Value>,
}

impl HttpFailure {
    pub fn new(status: Option<u16>, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// The request never produced a response.
    pub fn no_response() -> Self {
        Self::new(None, None)
    }

    pub fn class(&self) -> StatusClass {
        StatusClass::from_status(self.status)
    }

    /// Server-supplied `detail` text, if present and non-empty.
    pub fn detail(&self) -> Option<&str> {
        self.body
            .as_ref()?
            .get("detail")?
            .as_str()
            .filter(|detail| !detail.is_empty())
    }

    /// Field-level validation messages from a form submission.
    ///
    /// Only list-valued entries are kept; `detail` is not a field.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let Some(Value::Object(map)) = &self.body else {
            return BTreeMap::new();
        };

        map.iter()
            .filter(|(field, _)| field.as_str() != "detail")
            .filter_map(|(field, value)| {
                let messages: Vec<String> = value
                    .as_array()?
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect();
                Some((field.clone(), messages))
            })
            .collect()
    }

    /// The user-facing message for this failure.
    pub fn message(&self, overrides: Option<&MessageOverrides>) -> String {
        let class = self.class();
        if class == StatusClass::Other {
            return GENERIC_MESSAGE.to_string();
        }

        self.detail()
            .or_else(|| overrides.and_then(|o| o.get(class)))
            .unwrap_or_else(|| class.default_message())
            .to_string()
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, self.detail()) {
            (Some(status), Some(detail)) => {
                write!(f, "Request failed with status {}: {}", status, detail)
            }
            (Some(status), None) => write!(f, "Request failed with status {}", status),
            (None, _) => write!(f, "Request failed without a response"),
        }
    }
}

impl std::error::Error for HttpFailure {}

/// Errors from the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpFailure),

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request path '{path}': {message}")]
    InvalidPath { path: String, message: String },
}

impl ApiError {
    /// The HTTP failure behind this error, if it was one.
    pub fn http(&self) -> Option<&HttpFailure> {
        match self {
            ApiError::Http(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.http().and_then(|failure| failure.status)
    }
}

/// Map any caught error to a single message for display.
///
/// The error and its `source()` chain are searched for an HTTP failure: an
/// [`ApiError::Http`], a bare [`HttpFailure`], or a `reqwest::Error`.
/// Anything else yields [`GENERIC_MESSAGE`].
pub fn error_message(
    error: &(dyn std::error::Error + 'static),
    overrides: Option<&MessageOverrides>,
) -> String {
    for cause in std::iter::successors(Some(error), |e| e.source()) {
        if let Some(api_error) = cause.downcast_ref::<ApiError>() {
            match api_error.http() {
                Some(failure) => return failure.message(overrides),
                None => break,
            }
        }
        if let Some(failure) = cause.downcast_ref::<HttpFailure>() {
            return failure.message(overrides);
        }
        if let Some(transport) = cause.downcast_ref::<reqwest::Error>() {
            let failure = HttpFailure::new(transport.status().map(|s| s.as_u16()), None);
            return failure.message(overrides);
        }
    }

    tracing::debug!(error = %error, "not an HTTP failure, using generic message");
    GENERIC_MESSAGE.to_string()
}
