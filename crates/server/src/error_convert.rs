use dioxus::prelude::ServerFnError;
use shared_types::AppError;

/// Pull the human message out of a PostgREST or GoTrue error body.
///
/// PostgREST answers `{"message": ...}`, GoTrue uses `msg` or
/// `error_description`, and some gateways only send `error`.
pub fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Convert a non-success backend response into an AppError.
pub fn backend_error(status: u16, body: &str) -> AppError {
    let message = backend_message(body).unwrap_or_else(|| match status {
        401 => "Sessione scaduta".to_string(),
        _ => format!("Errore del server ({status})"),
    });
    AppError::from_status(status, message)
}

/// Convert a transport failure (DNS, TLS, timeout) into an AppError.
pub fn transport_error(err: impl std::fmt::Display) -> AppError {
    AppError::backend(format!("Backend non raggiungibile: {err}"))
}

/// Convert an AppError into a ServerFnError by serializing as JSON.
pub fn app_error_to_server_fn_error(err: AppError) -> ServerFnError {
    let json = serde_json::to_string(&err).unwrap_or_else(|_| err.message.clone());
    ServerFnError::new(json)
}

/// Extension trait providing `.into_server_fn_error()` on AppError.
pub trait AppErrorExt {
    fn into_server_fn_error(self) -> ServerFnError;
}

impl AppErrorExt for AppError {
    fn into_server_fn_error(self) -> ServerFnError {
        app_error_to_server_fn_error(self)
    }
}

/// Trait for validating request DTOs before processing.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}
