use dioxus::prelude::*;
use shared_types::{AppConfig, AuthUser};

#[cfg(feature = "server")]
use crate::error_convert::ValidateRequest;

#[cfg(feature = "server")]
use super::auth::*;

/// Feature flags and page sizes. No auth required.
#[server]
pub async fn get_app_config() -> Result<AppConfig, ServerFnError> {
    Ok(crate::config::app_config().clone())
}

/// Sign in with email and password; the session lands in HttpOnly cookies.
#[cfg_attr(feature = "server", tracing::instrument(skip(password)))]
#[server]
pub async fn login(email: String, password: String) -> Result<AuthUser, ServerFnError> {
    use crate::auth::cookies;
    use crate::gateway::Identity;
    use shared_types::LoginRequest;

    let req = LoginRequest {
        email: email.trim().to_string(),
        password,
    };
    req.validate_request().map_err(fail)?;

    let tokens = store()?
        .sign_in(&req.email, &req.password)
        .await
        .map_err(fail)?;
    cookies::schedule_auth_cookies(&tokens);
    tracing::info!(user = %tokens.user.id, "signed in");
    Ok(tokens.user)
}

/// Sign out. Cookies are cleared even when the backend call fails; a session
/// the backend no longer knows is not an error.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn logout() -> Result<(), ServerFnError> {
    use crate::auth::cookies;
    use crate::gateway::{is_session_missing, Identity};
    use shared_types::AppErrorKind;

    cookies::schedule_clear_cookies();

    let Ok(session) = require_session() else {
        return Ok(());
    };
    match store()?.sign_out(&session.access_token).await {
        Ok(()) => Ok(()),
        Err(e) if is_session_missing(&e) || e.kind == AppErrorKind::Unauthorized => {
            tracing::debug!(error = %e, "sign-out of a dead session");
            Ok(())
        }
        Err(e) => Err(fail(e)),
    }
}

/// The signed-in user, or `None` without a live session.
#[server]
pub async fn get_current_user() -> Result<Option<AuthUser>, ServerFnError> {
    Ok(require_session().ok().map(|s| s.user))
}
