//! GCP Secret Manager credential provider.
//!
//! Uses google-cloud-secretmanager-v1 with Application Default Credentials.

use async_trait::async_trait;
use google_cloud_secretmanager_v1::client::SecretManagerService;

use super::{CredentialProvider, Credentials};
use crate::{Error, Result};

/// Location of the credential secret.
#[derive(Debug, Clone)]
pub struct GcpSecretManagerConfig {
    /// GCP project ID or number
    pub project_id: String,
    /// Secret name within the project
    pub secret_id: String,
    /// Version to access ("latest" or a number)
    pub version: String,
}

impl GcpSecretManagerConfig {
    pub fn new(project_id: impl Into<String>, secret_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            secret_id: secret_id.into(),
            version: "latest".to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Full secret version resource name.
    pub fn version_name(&self) -> String {
        format!(
            "projects/{}/secrets/{}/versions/{}",
            self.project_id, self.secret_id, self.version
        )
    }
}

pub struct GcpSecretManagerProvider {
    client: SecretManagerService,
    version_name: String,
}

impl GcpSecretManagerProvider {
    /// Create a client using Application Default Credentials, which tries:
    /// - GOOGLE_APPLICATION_CREDENTIALS environment variable
    /// - gcloud CLI credentials
    /// - Metadata server (when running in GCP)
    pub async fn new(config: GcpSecretManagerConfig) -> Result<Self> {
        let client = SecretManagerService::builder()
            .build()
            .await
            .map_err(|e| Error::Credentials(format!("Failed to create GCP client: {}", e)))?;

        Ok(Self {
            client,
            version_name: config.version_name(),
        })
    }
}

#[async_trait]
impl CredentialProvider for GcpSecretManagerProvider {
    async fn credentials(&self) -> Result<Credentials> {
        tracing::debug!("Accessing secret {}", self.version_name);

        let response = self
            .client
            .access_secret_version()
            .set_name(&self.version_name)
            .send()
            .await
            .map_err(|e| {
                Error::Credentials(format!("Failed to access {}: {}", self.version_name, e))
            })?;

        let payload = response.payload.ok_or_else(|| {
            Error::Credentials(format!("Secret {} has no payload", self.version_name))
        })?;

        Credentials::from_json(&payload.data)
    }

    fn name(&self) -> &str {
        "gcp"
    }
}
