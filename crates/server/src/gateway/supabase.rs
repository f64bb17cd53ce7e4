use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::{AppError, AuthUser};

use super::{Delete, Fetched, Identity, Select, SessionTokens, Store, Upsert};
use crate::config::SupabaseEnv;
use crate::error_convert::{backend_error, transport_error};

/// Hosted backend reached over HTTPS.
#[derive(Debug, Clone)]
pub struct SupabaseBackend {
    client: Client,
    url: String,
    anon_key: String,
}

impl SupabaseBackend {
    pub fn new(env: &SupabaseEnv) -> Self {
        Self {
            client: Client::new(),
            url: env.url.clone(),
            anon_key: env.anon_key.clone(),
        }
    }

    fn rest(&self, method: Method, path: &str, query: &str, token: &str) -> RequestBuilder {
        let url = if query.is_empty() {
            format!("{}/rest/v1/{}", self.url, path)
        } else {
            format!("{}/rest/v1/{}?{}", self.url, path, query)
        };
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/auth/v1/{}", self.url, path))
            .header("apikey", &self.anon_key)
    }

    async fn send(builder: RequestBuilder) -> Result<Response, AppError> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %body, "backend request failed");
        Err(backend_error(status.as_u16(), &body))
    }

    async fn json_body(response: Response) -> Result<Value, AppError> {
        let text = response.text().await.map_err(transport_error)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| AppError::internal(format!("Risposta del backend non valida: {e}")))
    }

    async fn session(response: Response) -> Result<SessionTokens, AppError> {
        let body: GoTrueSession = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Sessione non valida: {e}")))?;
        Ok(SessionTokens {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            expires_in: body.expires_in,
            user: body.user.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<GoTrueUser> for AuthUser {
    fn from(user: GoTrueUser) -> Self {
        AuthUser {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: i64,
    user: GoTrueUser,
}

/// Total from a `Content-Range` header such as `0-49/312` or `*/0`.
pub fn parse_content_range(value: &str) -> Option<i64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

impl Store for SupabaseBackend {
    #[tracing::instrument(skip(self, token), fields(table = %query.table))]
    async fn select(&self, token: &str, query: &Select) -> Result<Fetched, AppError> {
        let method = if query.head { Method::HEAD } else { Method::GET };
        let mut req = self.rest(method, &query.table, &query.to_query_string(), token);
        if query.count == super::Count::Exact {
            req = req.header("Prefer", "count=exact");
        }
        let response = Self::send(req).await?;
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);
        if query.head {
            return Ok(Fetched {
                rows: Vec::new(),
                total,
            });
        }
        let rows = match Self::json_body(response).await? {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        Ok(Fetched { rows, total })
    }

    #[tracing::instrument(skip(self, token, upsert), fields(table = %upsert.table, rows = upsert.rows.len()))]
    async fn upsert(&self, token: &str, upsert: &Upsert) -> Result<Vec<Value>, AppError> {
        if upsert.rows.is_empty() {
            return Ok(Vec::new());
        }
        let req = self
            .rest(Method::POST, &upsert.table, &upsert.to_query_string(), token)
            .header("Prefer", upsert.prefer())
            .json(&upsert.rows);
        let response = Self::send(req).await?;
        if !upsert.returning {
            return Ok(Vec::new());
        }
        match Self::json_body(response).await? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Ok(vec![other]),
        }
    }

    #[tracing::instrument(skip(self, token), fields(table = %delete.table))]
    async fn delete(&self, token: &str, delete: &Delete) -> Result<(), AppError> {
        if delete.filters.is_empty() {
            return Err(AppError::bad_request("Eliminazione senza filtro non consentita"));
        }
        let req = self.rest(Method::DELETE, &delete.table, &delete.to_query_string(), token);
        Self::send(req).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, token, args))]
    async fn rpc(&self, token: &str, function: &str, args: Value) -> Result<Value, AppError> {
        let req = self
            .rest(Method::POST, &format!("rpc/{function}"), "", token)
            .json(&args);
        let response = Self::send(req).await?;
        Self::json_body(response).await
    }
}

impl Identity for SupabaseBackend {
    #[tracing::instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, AppError> {
        let req = self
            .auth(Method::POST, "token?grant_type=password")
            .json(&json!({ "email": email, "password": password }));
        Self::session(Self::send(req).await?).await
    }

    #[tracing::instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, AppError> {
        let req = self
            .auth(Method::POST, "token?grant_type=refresh_token")
            .json(&json!({ "refresh_token": refresh_token }));
        Self::session(Self::send(req).await?).await
    }

    #[tracing::instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let req = self.auth(Method::POST, "logout").bearer_auth(access_token);
        Self::send(req).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn user(&self, access_token: &str) -> Result<AuthUser, AppError> {
        let req = self.auth(Method::GET, "user").bearer_auth(access_token);
        let user: GoTrueUser = Self::send(req)
            .await?
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Utente non valido: {e}")))?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_range_total() {
        assert_eq!(parse_content_range("0-49/312"), Some(312));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn gotrue_session_decodes() {
        let body = r#"{
            "access_token": "a.b.c",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": {"id": "6a1c", "email": "segreteria@topdance.it", "aud": "authenticated"}
        }"#;
        let session: GoTrueSession = serde_json::from_str(body).unwrap();
        let user: AuthUser = session.user.into();
        assert_eq!(user.email, "segreteria@topdance.it");
        assert_eq!(session.expires_in, 3600);
    }
}
