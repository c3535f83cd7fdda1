use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use url::Url;

use super::oauth::{Nonce, Signer};
use super::wire::{parse_timeline, ApiErrorBody, ERR_STATUS_NOT_FOUND};
use super::{DeleteOutcome, PageCursor, Post, PostDeleter, PostId, Timeline, TimelineConnector, TimelineSource};
use crate::config::TwitterConfig;
use crate::credentials::Credentials;
use crate::{Error, Result};

const MAX_PAGE_SIZE: u32 = 200;

/// REST client for the authenticated user's timeline
pub struct TwitterClient {
    client: Client,
    base_url: String,
    signer: Signer,
}

impl TwitterClient {
    pub fn new(config: &TwitterConfig, credentials: Credentials) -> Result<Self> {
        let client = Self::build_client(config.request_timeout_secs)?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            signer: Signer::new(credentials),
        })
    }

    fn build_client(timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("sweeper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Http)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }

    /// Send a signed request; returns status and body text
    async fn send(&self, method: Method, url: Url) -> Result<(StatusCode, String)> {
        let authorization = self
            .signer
            .authorization(method.as_str(), &url, &[], &Nonce::generate())?;

        let response = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    fn api_error(action: &str, status: StatusCode, body: String) -> Error {
        tracing::error!("Failed to call {} (status={}): {}", action, status.as_u16(), body);
        Error::Api {
            action: action.to_string(),
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait::async_trait]
impl TimelineSource for TwitterClient {
    async fn fetch_page(&self, count: u32, cursor: PageCursor) -> Result<Vec<Post>> {
        let mut url = self.endpoint("statuses/user_timeline.json")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("count", &count.min(MAX_PAGE_SIZE).to_string());
            if let Some(max_id) = cursor.max_id() {
                query.append_pair("max_id", &max_id.to_string());
            }
            query.append_pair("include_rts", "true");
            query.append_pair("tweet_mode", "extended");
        }

        tracing::info!("Retrieving posts (max_id {})", cursor);

        let (status, body) = self.send(Method::GET, url).await?;
        if !status.is_success() {
            return Err(Self::api_error("UserTimeline", status, body));
        }

        parse_timeline(body.as_bytes())
    }
}

#[async_trait::async_trait]
impl PostDeleter for TwitterClient {
    async fn delete(&self, id: PostId) -> Result<DeleteOutcome> {
        let url = self.endpoint(&format!("statuses/destroy/{}.json", id))?;

        let (status, body) = self.send(Method::POST, url).await?;
        if status.is_success() {
            return Ok(DeleteOutcome::Deleted);
        }

        if status == StatusCode::NOT_FOUND || ApiErrorBody::parse(&body).has_code(ERR_STATUS_NOT_FOUND) {
            tracing::warn!("Already destroyed: id={}", id);
            return Ok(DeleteOutcome::AlreadyGone);
        }

        Err(Self::api_error("Destroy", status, body))
    }
}

/// Builds a `TwitterClient` from per-run credentials
pub struct TwitterConnector {
    config: TwitterConfig,
}

impl TwitterConnector {
    pub fn new(config: TwitterConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl TimelineConnector for TwitterConnector {
    async fn connect(&self, credentials: Credentials) -> Result<Arc<dyn Timeline>> {
        Ok(Arc::new(TwitterClient::new(&self.config, credentials)?))
    }
}
