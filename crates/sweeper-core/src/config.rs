use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Nothing younger than this many days is ever deleted
pub const MIN_RETENTION_DAYS: u32 = 7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the HTTP trigger (the PORT env var takes precedence)
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Base URL of the v1.1 REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Posts requested per page (the API caps this at 200)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            request_timeout_secs: default_timeout(),
        }
    }
}

/// Where API credentials are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    Env,
    File,
    Gcp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_credential_source")]
    pub source: CredentialSource,
    /// Env var holding the JSON credential payload (source = "env")
    #[serde(default = "default_credentials_env_var")]
    pub env_var: String,
    /// JSON credential file (source = "file")
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// GCP project holding the secret (source = "gcp")
    #[serde(default)]
    pub gcp_project: Option<String>,
    #[serde(default = "default_gcp_secret")]
    pub gcp_secret: String,
    #[serde(default = "default_gcp_version")]
    pub gcp_version: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            source: default_credential_source(),
            env_var: default_credentials_env_var(),
            file: None,
            gcp_project: None,
            gcp_secret: default_gcp_secret(),
            gcp_version: default_gcp_version(),
        }
    }
}

/// One row of the age/engagement table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Applies to original posts at least this many days old
    pub min_age_days: u32,
    /// Posts with fewer total engagements than this are deleted
    pub min_engagement: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Reshares older than this are deleted
    #[serde(default = "default_reshare_max_age")]
    pub reshare_max_age_days: u32,
    /// Engagement tiers, evaluated from the oldest bound down
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierConfig>,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            reshare_max_age_days: default_reshare_max_age(),
            tiers: default_tiers(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_base_url() -> String {
    "https://api.twitter.com/1.1".to_string()
}

fn default_page_size() -> u32 {
    200
}

fn default_timeout() -> u64 {
    30
}

fn default_credential_source() -> CredentialSource {
    CredentialSource::Env
}

fn default_credentials_env_var() -> String {
    "SWEEPER_CREDENTIALS".to_string()
}

fn default_gcp_secret() -> String {
    "twitter-api".to_string()
}

fn default_gcp_version() -> String {
    "latest".to_string()
}

fn default_reshare_max_age() -> u32 {
    30
}

fn default_tiers() -> Vec<TierConfig> {
    vec![
        TierConfig { min_age_days: 180, min_engagement: 25 },
        TierConfig { min_age_days: 30, min_engagement: 10 },
        TierConfig { min_age_days: 7, min_engagement: 1 },
    ]
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the given file, or the default location.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let config_path = Self::resolve_path(path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// The file `load` and `save` use: `path` with `~` expanded, or the default location
    pub fn resolve_path(path: Option<&Path>) -> PathBuf {
        path.map(expand_tilde).unwrap_or_else(Self::config_path)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the given file, or the default location
    pub fn save(&self, path: Option<&Path>) -> crate::Result<PathBuf> {
        let config_path = Self::resolve_path(path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(&config_path, content)?;

        Ok(config_path)
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Always ~/.config/sweeper/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("sweeper")
            .join("config.toml")
    }

    /// Port for the HTTP trigger; PORT from the environment wins
    pub fn listen_port(&self) -> u16 {
        match std::env::var("PORT") {
            Ok(port) => port.parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid PORT={:?}", port);
                self.server.port
            }),
            Err(_) => {
                tracing::info!("PORT not set, defaulting to {}", self.server.port);
                self.server.port
            }
        }
    }

    pub fn credentials_file(&self) -> Option<PathBuf> {
        self.credentials.file.as_deref().map(expand_tilde)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.twitter.page_size == 0 || self.twitter.page_size > 200 {
            return Err(crate::Error::Config(format!(
                "twitter.page_size must be between 1 and 200 (got {})",
                self.twitter.page_size
            )));
        }
        if self.retention.tiers.is_empty() {
            return Err(crate::Error::Config(
                "retention.tiers must contain at least one tier".to_string(),
            ));
        }
        if self.retention.reshare_max_age_days < MIN_RETENTION_DAYS {
            return Err(crate::Error::Config(format!(
                "retention.reshare_max_age_days must be at least {} (got {})",
                MIN_RETENTION_DAYS, self.retention.reshare_max_age_days
            )));
        }
        if let Some(tier) = self
            .retention
            .tiers
            .iter()
            .find(|t| t.min_age_days < MIN_RETENTION_DAYS)
        {
            return Err(crate::Error::Config(format!(
                "retention.tiers min_age_days must be at least {} (got {})",
                MIN_RETENTION_DAYS, tier.min_age_days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_retention_table() {
        let config = AppConfig::default();
        assert_eq!(config.retention.reshare_max_age_days, 30);
        assert_eq!(config.retention.tiers.len(), 3);
        assert_eq!(config.retention.tiers[0], TierConfig { min_age_days: 180, min_engagement: 25 });
        assert_eq!(config.twitter.page_size, 200);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.credentials.source, CredentialSource::Env);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [credentials]
            source = "gcp"
            gcp_project = "1086379384073"

            [retention]
            reshare_max_age_days = 14
            "#,
        )
        .unwrap();

        assert_eq!(config.credentials.source, CredentialSource::Gcp);
        assert_eq!(config.credentials.gcp_project.as_deref(), Some("1086379384073"));
        assert_eq!(config.credentials.gcp_secret, "twitter-api");
        assert_eq!(config.retention.reshare_max_age_days, 14);
        assert_eq!(config.retention.tiers, default_tiers());
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_rejects_oversized_page() {
        let err = AppConfig::from_toml("[twitter]\npage_size = 500\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_rejects_empty_tiers() {
        let err = AppConfig::from_toml("[retention]\ntiers = []\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_rejects_short_reshare_age() {
        let err = AppConfig::from_toml("[retention]\nreshare_max_age_days = 2\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(ref m) if m.contains("reshare_max_age_days")));
    }

    #[test]
    fn test_rejects_tier_below_a_week() {
        let err = AppConfig::from_toml(
            "[retention]\ntiers = [{ min_age_days = 0, min_engagement = 1 }]\n",
        )
        .unwrap_err();
        assert!(matches!(err, crate::Error::Config(ref m) if m.contains("min_age_days")));

        let err = AppConfig::from_toml(
            "[retention]\ntiers = [\n  { min_age_days = 30, min_engagement = 10 },\n  { min_age_days = 6, min_engagement = 1 },\n]\n",
        )
        .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_accepts_week_floor() {
        let config = AppConfig::from_toml(
            "[retention]\nreshare_max_age_days = 7\ntiers = [{ min_age_days = 7, min_engagement = 3 }]\n",
        )
        .unwrap();
        assert_eq!(config.retention.tiers[0].min_engagement, 3);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("sweeper-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(!AppConfig::resolve_path(Some(&path)).exists());

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            AppConfig::resolve_path(Some(Path::new("/etc/sweeper.toml"))),
            PathBuf::from("/etc/sweeper.toml")
        );
        assert_eq!(AppConfig::resolve_path(None), AppConfig::config_path());
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                AppConfig::resolve_path(Some(Path::new("~/s.toml"))),
                home.join("s.toml")
            );
        }
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("sweeper-config-{}.toml", uuid::Uuid::new_v4()));
        let mut config = AppConfig::default();
        config.server.port = 9090;

        let written = config.save(Some(&path)).unwrap();
        assert_eq!(written, path);
        assert_eq!(AppConfig::load(Some(&path)).unwrap().server.port, 9090);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_toml_round_trip_keeps_tiers() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.retention.tiers, config.retention.tiers);
    }
}
