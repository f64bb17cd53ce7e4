use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use super::cookies::{self, CookieSlot, PendingCookieAction};
use super::session::Session;
use crate::backend::backend;
use crate::gateway::{Identity, SessionTokens};

/// Permissive session middleware.
///
/// On each request:
/// 1. Accepts the access token from cookies (or Bearer header) if not expired
/// 2. Otherwise trades the refresh cookie for a new session via the backend
/// 3. Inserts a `CookieSlot` so server functions can schedule cookie changes
/// 4. After the handler runs, writes refreshed or scheduled cookies
///
/// Does NOT reject unauthenticated requests; server functions decide.
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    let headers = req.headers().clone();
    let mut refreshed: Option<SessionTokens> = None;
    let mut drop_cookies = false;

    let session = cookies::extract_access_token(&headers)
        .and_then(|token| Session::from_token(&token).ok());

    match session {
        Some(session) => {
            req.extensions_mut().insert(session);
        }
        None => {
            if let Some(refresh_token) = cookies::extract_refresh_token(&headers) {
                match try_transparent_refresh(&refresh_token).await {
                    Some(tokens) => {
                        req.extensions_mut().insert(Session {
                            access_token: tokens.access_token.clone(),
                            user: tokens.user.clone(),
                        });
                        refreshed = Some(tokens);
                    }
                    None => drop_cookies = true,
                }
            }
        }
    }

    let cookie_slot = CookieSlot::default();
    req.extensions_mut().insert(cookie_slot.clone());

    let mut response = next.run(req).await;

    if let Some(tokens) = refreshed {
        cookies::set_auth_cookies(response.headers_mut(), &tokens);
    } else if drop_cookies {
        cookies::clear_auth_cookies(response.headers_mut());
    }

    match cookie_slot.take() {
        Some(PendingCookieAction::Set(tokens)) => {
            cookies::set_auth_cookies(response.headers_mut(), &tokens);
        }
        Some(PendingCookieAction::Clear) => {
            cookies::clear_auth_cookies(response.headers_mut());
        }
        None => {}
    }

    response
}

/// Trade a refresh token for a fresh session. `None` when the backend refuses.
async fn try_transparent_refresh(refresh_token: &str) -> Option<SessionTokens> {
    let backend = backend().ok()?;
    match backend.refresh(refresh_token).await {
        Ok(tokens) => {
            tracing::debug!(user = %tokens.user.id, "session refreshed");
            Some(tokens)
        }
        Err(e) => {
            tracing::info!(error = %e, "session refresh refused");
            None
        }
    }
}
