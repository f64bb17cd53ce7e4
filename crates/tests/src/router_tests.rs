use axum::{http::StatusCode, middleware, routing::get as get_route, Extension, Router};
use server::auth::cookies::{TDA_ACCESS, TDA_REFRESH};
use server::auth::session::Session;

use crate::common::{get, get_headers, shared_backend, shared_session, EMAIL};

/// Echoes the email of the session the middleware attached, if any.
async fn whoami(session: Option<Extension<Session>>) -> String {
    session
        .map(|Extension(s)| s.user.email)
        .unwrap_or_else(|| "anonymous".to_string())
}

fn app() -> Router {
    Router::new()
        .route("/whoami", get_route(whoami))
        .merge(server::health::health_router())
        .layer(middleware::from_fn(server::auth::middleware::auth_middleware))
}

#[tokio::test]
async fn health_reports_ok() {
    shared_backend();
    server::health::record_start_time();

    let (status, body) = get(&app(), "/health", &[]).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["backend"], "configured");
}

#[tokio::test]
async fn anonymous_requests_pass_through() {
    let (status, body) = get(&app(), "/whoami", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "anonymous");
}

#[tokio::test]
async fn bearer_token_attaches_the_session() {
    let tokens = shared_session();
    let auth = format!("Bearer {}", tokens.access_token);

    let (status, body) = get(&app(), "/whoami", &[("authorization", &auth)]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, EMAIL);
}

#[tokio::test]
async fn access_cookie_attaches_the_session() {
    let tokens = shared_session();
    let cookie = format!("{TDA_ACCESS}={}", tokens.access_token);

    let (_, body) = get(&app(), "/whoami", &[("cookie", &cookie)]).await;
    assert_eq!(body, EMAIL);
}

#[tokio::test]
async fn expired_access_is_refreshed_transparently() {
    let store = shared_backend();
    let stale = store.issue_session(EMAIL, -30).unwrap();
    let cookie = format!(
        "{TDA_ACCESS}={}; {TDA_REFRESH}={}",
        stale.access_token, stale.refresh_token
    );

    let (status, set_cookies) = get_headers(&app(), "/whoami", &[("cookie", &cookie)]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(set_cookies.iter().any(|c| c.starts_with(&format!("{TDA_ACCESS}="))));
    assert!(set_cookies
        .iter()
        .any(|c| c.starts_with(&format!("{TDA_REFRESH}=")) && !c.contains(&stale.refresh_token)));
}

#[tokio::test]
async fn refused_refresh_clears_the_cookies() {
    shared_backend();
    let cookie = format!("{TDA_REFRESH}=not-a-real-token");

    let (status, body) = get(&app(), "/whoami", &[("cookie", &cookie)]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "anonymous");

    let (_, set_cookies) = get_headers(&app(), "/whoami", &[("cookie", &cookie)]).await;
    assert!(set_cookies.iter().any(|c| c.starts_with(&format!("{TDA_ACCESS}=;"))));
}
