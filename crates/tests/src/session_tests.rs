use pretty_assertions::assert_eq;
use server::auth::session::Session;
use server::gateway::{is_session_missing, Identity};
use shared_types::AppErrorKind;

use crate::common::{fixture, EMAIL, PASSWORD};

#[tokio::test]
async fn sign_in_checks_credentials() {
    let fx = fixture();

    let err = fx.store.sign_in(EMAIL, "sbagliata").await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::BadRequest);

    let tokens = fx.store.sign_in(&EMAIL.to_uppercase(), PASSWORD).await.unwrap();
    assert_eq!(tokens.user.email, EMAIL);
    let user = fx.store.user(&tokens.access_token).await.unwrap();
    assert_eq!(user, tokens.user);
}

#[tokio::test]
async fn refresh_tokens_are_single_use() {
    let fx = fixture();
    let tokens = fx.store.sign_in(EMAIL, PASSWORD).await.unwrap();

    let renewed = fx.store.refresh(&tokens.refresh_token).await.unwrap();
    assert_ne!(renewed.refresh_token, tokens.refresh_token);
    assert!(fx.store.refresh(&tokens.refresh_token).await.is_err());
}

#[tokio::test]
async fn sign_out_twice_reports_a_missing_session() {
    let fx = fixture();
    let tokens = fx.store.sign_in(EMAIL, PASSWORD).await.unwrap();

    fx.store.sign_out(&tokens.access_token).await.unwrap();
    let err = fx.store.sign_out(&tokens.access_token).await.unwrap_err();
    assert!(is_session_missing(&err));
    assert!(fx.store.refresh(&tokens.refresh_token).await.is_err());
}

#[tokio::test]
async fn session_reads_the_access_token_claims() {
    let fx = fixture();
    let tokens = fx.store.issue_session(EMAIL, 600).unwrap();

    let session = Session::from_token(&tokens.access_token).unwrap();
    assert_eq!(session.user.email, EMAIL);
    assert_eq!(session.user.id, tokens.user.id);

    let expired = fx.store.issue_session(EMAIL, -60).unwrap();
    let err = Session::from_token(&expired.access_token).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Unauthorized);
}
