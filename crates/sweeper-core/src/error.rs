use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The remote API answered outside the 2xx range.
    #[error("{action} failed (status={status}): {body}")]
    Api {
        action: String,
        status: u16,
        body: String,
    },

    #[error("Invalid created_at for post {id}: {value:?}")]
    Timestamp { id: u64, value: String },

    #[error("Invalid post id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
