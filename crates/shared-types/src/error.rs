use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Generic message shown when a failure carries no readable payload.
pub const GENERIC_ERROR_MESSAGE: &str = "Si è verificato un errore. Riprova.";

/// Categorization of application errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    ValidationError,
    Conflict,
    BackendError,
    Unauthorized,
    Forbidden,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppErrorKind::NotFound => write!(f, "NotFound"),
            AppErrorKind::BadRequest => write!(f, "BadRequest"),
            AppErrorKind::ValidationError => write!(f, "ValidationError"),
            AppErrorKind::Conflict => write!(f, "Conflict"),
            AppErrorKind::BackendError => write!(f, "BackendError"),
            AppErrorKind::Unauthorized => write!(f, "Unauthorized"),
            AppErrorKind::Forbidden => write!(f, "Forbidden"),
            AppErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// Structured application error used across server and client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
}

impl AppError {
    fn with_kind(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            message: message.into(),
            field_errors,
        }
    }

    /// Validation failure on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        Self::validation(message, field_errors)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::Conflict, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::BackendError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::InternalError, message)
    }

    /// Map an HTTP status from the hosted backend onto an error kind.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            400 => AppErrorKind::BadRequest,
            401 => AppErrorKind::Unauthorized,
            403 => AppErrorKind::Forbidden,
            404 | 406 => AppErrorKind::NotFound,
            409 => AppErrorKind::Conflict,
            422 => AppErrorKind::ValidationError,
            _ => AppErrorKind::BackendError,
        };
        Self::with_kind(kind, message)
    }

    /// Parse an AppError from a ServerFnError message string (client-side).
    ///
    /// `ServerFnError::to_string()` wraps the payload like:
    ///   `error running server function: {"kind":"Unauthorized",...} (details: None)`
    /// This method extracts the embedded JSON and parses it.
    pub fn from_server_error(error_message: &str) -> Option<Self> {
        if let Ok(err) = serde_json::from_str::<Self>(error_message) {
            return Some(err);
        }
        let start = error_message.find('{')?;
        let end = error_message.rfind('}')?;
        if end > start {
            serde_json::from_str(&error_message[start..=end]).ok()
        } else {
            None
        }
    }

    /// Extract per-field validation errors from a `ServerFnError.to_string()`.
    pub fn parse_field_errors(error_string: &str) -> HashMap<String, String> {
        Self::from_server_error(error_string)
            .map(|e| e.field_errors)
            .unwrap_or_default()
    }

    /// Extract a user-facing message from a `ServerFnError.to_string()`.
    /// Falls back to a generic message if parsing fails.
    pub fn friendly_message(error_string: &str) -> String {
        match Self::from_server_error(error_string) {
            Some(app_error) if !app_error.message.trim().is_empty() => app_error.message,
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// True when the failure means the session is gone and the user must log in again.
    pub fn is_unauthorized(error_string: &str) -> bool {
        Self::from_server_error(error_string)
            .map(|e| e.kind == AppErrorKind::Unauthorized)
            .unwrap_or(false)
    }

    #[cfg_attr(not(feature = "server"), allow(dead_code))]
    fn status_code_u16(&self) -> u16 {
        match self.kind {
            AppErrorKind::NotFound => 404,
            AppErrorKind::BadRequest => 400,
            AppErrorKind::ValidationError => 422,
            AppErrorKind::Conflict => 409,
            AppErrorKind::BackendError => 502,
            AppErrorKind::Unauthorized => 401,
            AppErrorKind::Forbidden => 403,
            AppErrorKind::InternalError => 500,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "validation")]
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Valore non valido per {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        let message = field_errors
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| "Dati non validi".to_string());
        AppError::validation(message, field_errors)
    }
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}
