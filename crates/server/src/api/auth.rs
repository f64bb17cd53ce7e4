// Server-only session helpers shared by the api/* modules.

use dioxus::prelude::*;
use shared_types::{AppError, AppErrorKind};

use crate::auth::{cookies, session::Session};
use crate::backend::{backend, Backend};
use crate::error_convert::AppErrorExt;

/// The caller's session: middleware-validated, or parsed from the cookie when
/// the middleware did not run.
pub(crate) fn require_session() -> Result<Session, ServerFnError> {
    let ctx = dioxus::fullstack::FullstackContext::current()
        .ok_or_else(|| AppError::unauthorized("Accesso richiesto").into_server_fn_error())?;

    let parts = ctx.parts_mut();

    if let Some(session) = parts.extensions.get::<Session>() {
        return Ok(session.clone());
    }

    let headers = parts.headers.clone();
    let token = cookies::extract_access_token(&headers)
        .ok_or_else(|| AppError::unauthorized("Accesso richiesto").into_server_fn_error())?;

    Session::from_token(&token).map_err(fail)
}

/// The configured backend, or a server function error.
pub(crate) fn store() -> Result<&'static Backend, ServerFnError> {
    backend().map_err(fail)
}

/// Turn a backend failure into a server function error. A rejected session
/// also schedules the session cookies for removal.
pub(crate) fn fail(err: AppError) -> ServerFnError {
    if err.kind == AppErrorKind::Unauthorized {
        tracing::info!(error = %err, "session rejected, clearing cookies");
        cookies::schedule_clear_cookies();
    } else {
        tracing::warn!(error = %err, "request failed");
    }
    err.into_server_fn_error()
}

/// Whether purely numeric search terms also match `nr_quota`.
pub(crate) fn numeric_search() -> bool {
    crate::config::feature_flags().numeric_search
}

/// Today in server local time, for export filenames.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
