//! Access to the hosted backend: PostgREST tables and views plus GoTrue auth.

pub mod memory;
pub mod query;
pub mod supabase;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{AppError, AuthUser};

pub use memory::MemoryBackend;
pub use query::{Count, Delete, Filter, Order, Resolution, Select, Upsert};
pub use supabase::SupabaseBackend;

/// Rows of a read plus the exact total when it was requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fetched {
    pub rows: Vec<Value>,
    pub total: Option<i64>,
}

impl Fetched {
    /// Decode every row into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Vec<T>, AppError> {
        decode_rows(self.rows)
    }
}

pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, AppError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row)
                .map_err(|e| AppError::internal(format!("Risposta del backend non valida: {e}")))
        })
        .collect()
}

/// Tokens of an authenticated backend session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
    pub user: AuthUser,
}

/// Data access against PostgREST, authorised by the caller's access token.
#[allow(async_fn_in_trait)]
pub trait Store: Send + Sync {
    async fn select(&self, token: &str, query: &Select) -> Result<Fetched, AppError>;

    /// Returns the written rows when `returning` was requested.
    async fn upsert(&self, token: &str, upsert: &Upsert) -> Result<Vec<Value>, AppError>;

    async fn delete(&self, token: &str, delete: &Delete) -> Result<(), AppError>;

    async fn rpc(&self, token: &str, function: &str, args: Value) -> Result<Value, AppError>;
}

/// GoTrue session management.
#[allow(async_fn_in_trait)]
pub trait Identity: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, AppError>;

    async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, AppError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError>;

    async fn user(&self, access_token: &str) -> Result<AuthUser, AppError>;
}

/// True for the error GoTrue answers when signing out an already dead session.
pub fn is_session_missing(err: &AppError) -> bool {
    let msg = err.message.to_lowercase();
    msg.contains("session missing")
        || msg.contains("session_not_found")
        || msg.contains("session not found")
        || msg.contains("session from session_id claim in jwt does not exist")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_missing_is_recognised() {
        assert!(is_session_missing(&AppError::unauthorized("Auth session missing!")));
        assert!(is_session_missing(&AppError::forbidden("session_not_found")));
        assert!(!is_session_missing(&AppError::unauthorized("Invalid JWT")));
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        let fetched = Fetched {
            rows: vec![json!({"id": 1, "nome_corso": "Salsa"}), json!({"id": "x"})],
            total: None,
        };
        let err = fetched.decode::<shared_types::Course>().unwrap_err();
        assert_eq!(err.kind, shared_types::AppErrorKind::InternalError);
    }
}
