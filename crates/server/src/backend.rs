use std::sync::OnceLock;

use serde_json::Value;
use shared_types::{AppError, AuthUser};

use crate::config;
use crate::gateway::{
    Delete, Fetched, Identity, MemoryBackend, Select, SessionTokens, Store, SupabaseBackend, Upsert,
};

/// The backend the server talks to.
#[derive(Debug)]
pub enum Backend {
    Supabase(SupabaseBackend),
    Memory(MemoryBackend),
}

static BACKEND: OnceLock<Backend> = OnceLock::new();

/// Build the hosted backend from the environment. Safe to call more than once.
pub fn init_backend() -> bool {
    if BACKEND.get().is_some() {
        return true;
    }
    match config::supabase_env() {
        Some(env) => {
            tracing::info!(url = %env.url, "using hosted backend");
            BACKEND.get_or_init(|| Backend::Supabase(SupabaseBackend::new(&env)));
            true
        }
        None => false,
    }
}

/// Install a specific backend (tests). Returns the backend actually in use.
pub fn install_backend(backend: Backend) -> &'static Backend {
    BACKEND.get_or_init(|| backend)
}

pub fn is_configured() -> bool {
    BACKEND.get().is_some()
}

/// The process-wide backend, initialised from the environment on first use.
pub fn backend() -> Result<&'static Backend, AppError> {
    if let Some(b) = BACKEND.get() {
        return Ok(b);
    }
    if init_backend() {
        if let Some(b) = BACKEND.get() {
            return Ok(b);
        }
    }
    Err(AppError::internal(
        "Backend non configurato: impostare SUPABASE_URL e SUPABASE_ANON_KEY",
    ))
}

impl Store for Backend {
    async fn select(&self, token: &str, query: &Select) -> Result<Fetched, AppError> {
        match self {
            Self::Supabase(b) => b.select(token, query).await,
            Self::Memory(b) => b.select(token, query).await,
        }
    }

    async fn upsert(&self, token: &str, upsert: &Upsert) -> Result<Vec<Value>, AppError> {
        match self {
            Self::Supabase(b) => b.upsert(token, upsert).await,
            Self::Memory(b) => b.upsert(token, upsert).await,
        }
    }

    async fn delete(&self, token: &str, delete: &Delete) -> Result<(), AppError> {
        match self {
            Self::Supabase(b) => b.delete(token, delete).await,
            Self::Memory(b) => b.delete(token, delete).await,
        }
    }

    async fn rpc(&self, token: &str, function: &str, args: Value) -> Result<Value, AppError> {
        match self {
            Self::Supabase(b) => b.rpc(token, function, args).await,
            Self::Memory(b) => b.rpc(token, function, args).await,
        }
    }
}

impl Identity for Backend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, AppError> {
        match self {
            Self::Supabase(b) => b.sign_in(email, password).await,
            Self::Memory(b) => b.sign_in(email, password).await,
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, AppError> {
        match self {
            Self::Supabase(b) => b.refresh(refresh_token).await,
            Self::Memory(b) => b.refresh(refresh_token).await,
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        match self {
            Self::Supabase(b) => b.sign_out(access_token).await,
            Self::Memory(b) => b.sign_out(access_token).await,
        }
    }

    async fn user(&self, access_token: &str) -> Result<AuthUser, AppError> {
        match self {
            Self::Supabase(b) => b.user(access_token).await,
            Self::Memory(b) => b.user(access_token).await,
        }
    }
}
