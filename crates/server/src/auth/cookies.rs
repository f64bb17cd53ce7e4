use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;
use std::sync::{Arc, Mutex};

use crate::gateway::SessionTokens;

pub const TDA_ACCESS: &str = "tda_access";
pub const TDA_REFRESH: &str = "tda_refresh";

/// Access cookie lifetime when the backend does not say.
const DEFAULT_ACCESS_SECS: i64 = 3600;

const REFRESH_COOKIE_DAYS: i64 = 30;

fn cookie_secure() -> bool {
    std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

fn cookie_domain() -> Option<String> {
    std::env::var("COOKIE_DOMAIN")
        .ok()
        .filter(|d| !d.is_empty())
}

fn session_cookie(name: &'static str, value: &str, max_age_secs: i64) -> Option<HeaderValue> {
    let mut cookie = Cookie::build((name, value))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::seconds(max_age_secs.max(0)))
        .secure(cookie_secure());

    if let Some(domain) = cookie_domain() {
        cookie = cookie.domain(domain);
    }

    HeaderValue::from_str(&cookie.build().to_string()).ok()
}

/// Set-Cookie value for the access token.
pub fn build_access_cookie(token: &str, max_age_secs: i64) -> Option<HeaderValue> {
    session_cookie(TDA_ACCESS, token, max_age_secs)
}

/// Set-Cookie value for the refresh token.
pub fn build_refresh_cookie(token: &str) -> Option<HeaderValue> {
    session_cookie(TDA_REFRESH, token, REFRESH_COOKIE_DAYS * 86400)
}

/// Set-Cookie values that clear both session cookies.
pub fn build_clear_cookies() -> [Option<HeaderValue>; 2] {
    [session_cookie(TDA_ACCESS, "", 0), session_cookie(TDA_REFRESH, "", 0)]
}

/// Access token from the cookie, or from a Bearer header for scripted clients.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, TDA_ACCESS) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, TDA_REFRESH)
}

/// Parse a specific cookie value from the Cookie header.
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|piece| Cookie::parse(piece.trim().to_string()).ok())
        .find(|c| c.name() == name && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

/// Append both session cookies to a response.
pub fn set_auth_cookies(headers: &mut HeaderMap, tokens: &SessionTokens) {
    let access_secs = if tokens.expires_in > 0 {
        tokens.expires_in
    } else {
        DEFAULT_ACCESS_SECS
    };
    let values = [
        build_access_cookie(&tokens.access_token, access_secs),
        build_refresh_cookie(&tokens.refresh_token),
    ];
    for value in values.into_iter().flatten() {
        headers.append(header::SET_COOKIE, value);
    }
}

pub fn clear_auth_cookies(headers: &mut HeaderMap) {
    for value in build_clear_cookies().into_iter().flatten() {
        headers.append(header::SET_COOKIE, value);
    }
}

/// Cookie change requested by a server function, applied by the middleware.
#[derive(Clone, Debug)]
pub enum PendingCookieAction {
    Set(SessionTokens),
    Clear,
}

/// Shared slot in the request extensions through which server functions
/// hand cookie changes to the middleware.
#[derive(Clone, Debug, Default)]
pub struct CookieSlot(pub Arc<Mutex<Option<PendingCookieAction>>>);

impl CookieSlot {
    pub fn put(&self, action: PendingCookieAction) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(action);
        }
    }

    pub fn take(&self) -> Option<PendingCookieAction> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

fn schedule(action: PendingCookieAction) {
    if let Some(ctx) = dioxus::fullstack::FullstackContext::current() {
        let parts = ctx.parts_mut();
        if let Some(slot) = parts.extensions.get::<CookieSlot>() {
            slot.put(action);
        }
    }
}

/// Ask the middleware to store a new session in cookies.
pub fn schedule_auth_cookies(tokens: &SessionTokens) {
    schedule(PendingCookieAction::Set(tokens.clone()));
}

/// Ask the middleware to drop the session cookies.
pub fn schedule_clear_cookies() {
    schedule(PendingCookieAction::Clear);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::AuthUser;

    fn tokens() -> SessionTokens {
        SessionTokens {
            access_token: "a.b.c".to_string(),
            refresh_token: "r-1".to_string(),
            expires_in: 0,
            user: AuthUser {
                id: "u1".to_string(),
                email: "x@y.it".to_string(),
            },
        }
    }

    #[test]
    fn access_cookie_is_http_only_lax() {
        let value = build_access_cookie("tok", 60).unwrap();
        let text = value.to_str().unwrap();
        assert!(text.starts_with("tda_access=tok"));
        assert!(text.contains("HttpOnly"));
        assert!(text.contains("SameSite=Lax"));
        assert!(text.contains("Max-Age=60"));
        assert!(text.contains("Path=/"));
    }

    #[test]
    fn set_cookies_defaults_access_lifetime() {
        let mut headers = HeaderMap::new();
        set_auth_cookies(&mut headers, &tokens());
        let values: Vec<_> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].contains("Max-Age=3600"));
        assert!(values[1].starts_with("tda_refresh=r-1"));
    }

    #[test]
    fn clear_cookies_expire_immediately() {
        let mut headers = HeaderMap::new();
        clear_auth_cookies(&mut headers);
        assert!(headers
            .get_all(header::SET_COOKIE)
            .iter()
            .all(|v| v.to_str().unwrap().contains("Max-Age=0")));
    }

    #[test]
    fn extracts_cookie_then_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; tda_access=abc; tda_refresh=def"),
        );
        assert_eq!(extract_access_token(&headers).as_deref(), Some("abc"));
        assert_eq!(extract_refresh_token(&headers).as_deref(), Some("def"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_access_token(&headers).as_deref(), Some("xyz"));
        assert_eq!(extract_refresh_token(&headers), None);
    }

    #[test]
    fn empty_cookie_value_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("tda_access="));
        assert_eq!(extract_access_token(&headers), None);
    }

    #[test]
    fn slot_hands_over_once() {
        let slot = CookieSlot::default();
        slot.put(PendingCookieAction::Clear);
        assert!(matches!(slot.take(), Some(PendingCookieAction::Clear)));
        assert!(slot.take().is_none());
    }
}
