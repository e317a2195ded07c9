//! HTTP mapping of business and request errors.
//!
//! This is the only place where outcomes become status codes. The message is
//! localized into the language of the request.

use crate::i18n::{fill, Language};
use crate::service::{SignupError, UnregisterError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Everything a handler can answer with besides success.
///
/// Business outcomes come from the service; the remaining variants are
/// request validation failures found before the service is called.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Signup(#[from] SignupError),

    #[error(transparent)]
    Unregister(#[from] UnregisterError),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// An [`ApiError`] together with the language its message is shown in.
#[derive(Debug)]
pub struct LocalizedError {
    pub error: ApiError,
    pub language: Language,
}

impl ApiError {
    /// Attach the language the message should be shown in.
    pub fn localized(self, language: Language) -> LocalizedError {
        LocalizedError {
            error: self,
            language,
        }
    }

    /// HTTP status for this error.
    ///
    /// # Returns
    /// * `404 Not Found` - the activity name does not resolve in the request language
    /// * `400 Bad Request` - duplicate signup, full activity, or unregistering
    ///   a student who is not signed up
    /// * `422 Unprocessable Entity` - invalid email, unsupported language, or a
    ///   malformed body, query string or path
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Signup(SignupError::ActivityNotFound { .. })
            | ApiError::Unregister(UnregisterError::ActivityNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Signup(_) | ApiError::Unregister(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidEmail(_)
            | ApiError::UnsupportedLanguage(_)
            | ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// The user-facing message in `language`.
    pub fn message(&self, language: Language) -> String {
        let strings = language.strings();
        match self {
            ApiError::Signup(SignupError::ActivityNotFound { .. })
            | ApiError::Unregister(UnregisterError::ActivityNotFound { .. }) => {
                strings.activity_not_found.to_string()
            }
            ApiError::Signup(SignupError::StudentAlreadyRegistered { .. }) => {
                strings.already_registered.to_string()
            }
            ApiError::Signup(SignupError::ActivityFull { .. }) => {
                strings.activity_full.to_string()
            }
            ApiError::Unregister(UnregisterError::StudentNotRegistered { .. }) => {
                strings.not_registered.to_string()
            }
            ApiError::InvalidEmail(_) => strings.invalid_email.to_string(),
            ApiError::UnsupportedLanguage(code) => {
                fill(strings.unsupported_language, &[("code", code)])
            }
            ApiError::InvalidRequest(_) => strings.invalid_request.to_string(),
        }
    }
}

impl IntoResponse for LocalizedError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let body = Json(json!({ "detail": self.error.message(self.language) }));
        (status, body).into_response()
    }
}
