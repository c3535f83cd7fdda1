//! API credential retrieval
//!
//! Supports multiple backends:
//! - Environment variable holding the JSON payload (default for local runs)
//! - JSON file on disk
//! - Static value (for testing)
//! - GCP Secret Manager - requires `secrets-gcp` feature

#[cfg(feature = "secrets-gcp")]
mod gcp;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
#[cfg(feature = "secrets-gcp")]
pub use gcp::{GcpSecretManagerConfig, GcpSecretManagerProvider};
use serde::Deserialize;

use crate::config::{AppConfig, CredentialSource};
use crate::{Error, Result};

/// The four OAuth 1.0a secrets for the account being swept
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub token_secret: String,
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl Credentials {
    /// Decode the JSON secret payload
    pub fn from_json(payload: &[u8]) -> Result<Self> {
        let credentials: Self = serde_json::from_slice(payload)
            .map_err(|e| Error::Credentials(format!("Malformed credential payload: {}", e)))?;
        credentials.validate()?;
        Ok(credentials)
    }

    fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("token", &self.token),
            ("token_secret", &self.token_secret),
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
        ]
        .iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| *k)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Credentials(format!(
                "Empty credential fields: {}",
                missing.join(", ")
            )))
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("token_secret", &"<redacted>")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

/// Source of credentials, consulted once per run
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credentials(&self) -> Result<Credentials>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Reads the JSON payload from an environment variable
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn credentials(&self) -> Result<Credentials> {
        let payload = std::env::var(&self.var)
            .map_err(|_| Error::Credentials(format!("Environment variable {} is not set", self.var)))?;
        Credentials::from_json(payload.as_bytes())
    }

    fn name(&self) -> &str {
        "env"
    }
}

/// Reads the JSON payload from a file
pub struct FileCredentialProvider {
    path: PathBuf,
}

impl FileCredentialProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn credentials(&self) -> Result<Credentials> {
        let payload = tokio::fs::read(&self.path).await.map_err(|e| {
            Error::Credentials(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        Credentials::from_json(&payload)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Fixed credentials, or a fixed failure (for testing)
pub struct StaticCredentialProvider {
    credentials: std::result::Result<Credentials, String>,
}

impl StaticCredentialProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Ok(credentials),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            credentials: Err(message.into()),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credentials(&self) -> Result<Credentials> {
        self.credentials
            .clone()
            .map_err(Error::Credentials)
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Build the provider selected in `[credentials]`
pub async fn from_config(config: &AppConfig) -> Result<Arc<dyn CredentialProvider>> {
    let settings = &config.credentials;
    match settings.source {
        CredentialSource::Env => Ok(Arc::new(EnvCredentialProvider::new(&settings.env_var))),
        CredentialSource::File => {
            let path = config.credentials_file().ok_or_else(|| {
                Error::Config("credentials.file is required when source = \"file\"".to_string())
            })?;
            Ok(Arc::new(FileCredentialProvider::new(path)))
        }
        #[cfg(feature = "secrets-gcp")]
        CredentialSource::Gcp => {
            let project = settings.gcp_project.clone().ok_or_else(|| {
                Error::Config("credentials.gcp_project is required when source = \"gcp\"".to_string())
            })?;
            let gcp_config = GcpSecretManagerConfig::new(project, &settings.gcp_secret)
                .with_version(&settings.gcp_version);
            Ok(Arc::new(GcpSecretManagerProvider::new(gcp_config).await?))
        }
        #[cfg(not(feature = "secrets-gcp"))]
        CredentialSource::Gcp => Err(Error::Config(
            "credentials.source = \"gcp\" requires the secrets-gcp feature".to_string(),
        )),
    }
}

#[cfg(test)]
pub(crate) fn test_credentials() -> Credentials {
    Credentials {
        token: "token".to_string(),
        token_secret: "token-secret".to_string(),
        consumer_key: "consumer-key".to_string(),
        consumer_secret: "consumer-secret".to_string(),
    }
}
