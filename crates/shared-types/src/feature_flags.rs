use serde::{Deserialize, Serialize};

/// Feature flags controlling optional behaviours of the dashboard.
///
/// Loaded from `config.toml` at server startup and exposed to clients
/// via a server function. Every field defaults to `false` so that a
/// missing or incomplete config file disables all optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Purely numeric search terms also match `nr_quota` by equality.
    #[serde(default)]
    pub numeric_search: bool,
    /// Full JSON backup download on the people page.
    #[serde(default)]
    pub backup_export: bool,
    /// Annual quota reset in settings.
    #[serde(default)]
    pub quota_reset: bool,
}

/// Page sizes and fetch limits used by the list views and exports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PagingConfig {
    #[serde(default = "default_people_page")]
    pub people_page: i64,
    #[serde(default = "default_tessere_page")]
    pub tessere_page: i64,
    #[serde(default = "default_certificates_page")]
    pub certificates_page: i64,
    #[serde(default = "default_dashboard_rows")]
    pub dashboard_rows: i64,
    #[serde(default = "default_export_page")]
    pub export_page: i64,
    #[serde(default = "default_picker_limit")]
    pub picker_limit: i64,
}

fn default_people_page() -> i64 {
    60
}

fn default_tessere_page() -> i64 {
    70
}

fn default_certificates_page() -> i64 {
    70
}

fn default_dashboard_rows() -> i64 {
    600
}

fn default_export_page() -> i64 {
    500
}

fn default_picker_limit() -> i64 {
    80
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            people_page: default_people_page(),
            tessere_page: default_tessere_page(),
            certificates_page: default_certificates_page(),
            dashboard_rows: default_dashboard_rows(),
            export_page: default_export_page(),
            picker_limit: default_picker_limit(),
        }
    }
}

impl PagingConfig {
    /// Clamp every size into a range the backend accepts.
    pub fn sanitized(mut self) -> Self {
        self.people_page = self.people_page.clamp(1, 1000);
        self.tessere_page = self.tessere_page.clamp(1, 1000);
        self.certificates_page = self.certificates_page.clamp(1, 1000);
        self.dashboard_rows = self.dashboard_rows.clamp(1, 10_000);
        self.export_page = self.export_page.clamp(1, 1000);
        self.picker_limit = self.picker_limit.clamp(1, 500);
        self
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub paging: PagingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_all_false() {
        let flags = FeatureFlags::default();
        assert!(!flags.numeric_search);
        assert!(!flags.backup_export);
        assert!(!flags.quota_reset);
    }

    #[test]
    fn deserialize_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.paging.people_page, 60);
        assert_eq!(config.paging.tessere_page, 70);
        assert_eq!(config.paging.dashboard_rows, 600);
    }

    #[test]
    fn deserialize_partial_toml_defaults_missing_fields() {
        let config: AppConfig = toml::from_str(
            r#"
            [features]
            numeric_search = true

            [paging]
            people_page = 25
            "#,
        )
        .unwrap();
        assert!(config.features.numeric_search);
        assert!(!config.features.backup_export);
        assert_eq!(config.paging.people_page, 25);
        assert_eq!(config.paging.certificates_page, 70);
        assert_eq!(config.paging.export_page, 500);
    }

    #[test]
    fn sanitized_clamps_out_of_range_sizes() {
        let paging = PagingConfig {
            people_page: 0,
            export_page: 50_000,
            ..PagingConfig::default()
        }
        .sanitized();
        assert_eq!(paging.people_page, 1);
        assert_eq!(paging.export_page, 1000);
        assert_eq!(paging.tessere_page, 70);
    }
}
