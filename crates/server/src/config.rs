use shared_types::{AppConfig, FeatureFlags, PagingConfig};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml` into the global `OnceLock`. Only the first call has effect.
///
/// A missing or unparseable file leaves every flag off and the default page sizes.
pub fn load_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => parse_config(&contents),
        Err(e) => {
            tracing::warn!(path = CONFIG_PATH, error = %e, "config file not found, using defaults");
            AppConfig::default()
        }
    })
}

/// Install an explicit config (tests, embedding). Ignored once a config is loaded.
pub fn install_config(config: AppConfig) -> &'static AppConfig {
    CONFIG.get_or_init(|| config)
}

fn parse_config(contents: &str) -> AppConfig {
    let mut config: AppConfig = toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(path = CONFIG_PATH, error = %e, "config file unparseable, using defaults");
        AppConfig::default()
    });
    config.paging = config.paging.sanitized();
    tracing::info!(features = ?config.features, paging = ?config.paging, "config loaded");
    config
}

pub fn app_config() -> &'static AppConfig {
    load_config()
}

pub fn feature_flags() -> &'static FeatureFlags {
    &app_config().features
}

pub fn paging() -> &'static PagingConfig {
    &app_config().paging
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Connection settings of the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseEnv {
    pub url: String,
    pub anon_key: String,
    /// HS256 secret used to verify access tokens locally, when known.
    pub jwt_secret: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read the backend settings from the environment (and `.env` when present).
pub fn supabase_env() -> Option<SupabaseEnv> {
    let _ = dotenvy::dotenv();

    let url = non_empty_var("SUPABASE_URL");
    let anon_key = non_empty_var("SUPABASE_ANON_KEY");
    match (url, anon_key) {
        (Some(url), Some(anon_key)) => Some(SupabaseEnv {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            jwt_secret: non_empty_var("SUPABASE_JWT_SECRET"),
        }),
        (url, key) => {
            tracing::warn!(
                has_url = url.is_some(),
                has_anon_key = key.is_some(),
                "SUPABASE_URL / SUPABASE_ANON_KEY not set, backend calls will fail"
            );
            None
        }
    }
}

/// Secret for local access-token verification, if configured.
pub fn jwt_secret() -> Option<String> {
    non_empty_var("SUPABASE_JWT_SECRET")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config_sanitizes_paging() {
        let config = parse_config(
            r#"
            [features]
            numeric_search = true

            [paging]
            people_page = 0
            "#,
        );
        assert!(config.features.numeric_search);
        assert_eq!(config.paging.people_page, 1);
        assert_eq!(config.paging.tessere_page, 70);
    }

    #[test]
    fn parse_config_falls_back_on_garbage() {
        let config = parse_config("features = [");
        assert_eq!(config, AppConfig::default());
    }
}
