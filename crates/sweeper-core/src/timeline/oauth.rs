//! OAuth 1.0a request signing (HMAC-SHA1)

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use url::Url;

use crate::credentials::Credentials;
use crate::{Error, Result};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as-is, everything else is encoded
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE).to_string()
}

/// Per-request values that must differ on every call
#[derive(Debug, Clone)]
pub struct Nonce {
    pub nonce: String,
    pub timestamp: i64,
}

impl Nonce {
    pub fn generate() -> Self {
        Self {
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Signs requests on behalf of one user
#[derive(Clone)]
pub struct Signer {
    credentials: Credentials,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Build the `Authorization` header value for a request.
    ///
    /// Query parameters are read from `url`; `form` carries
    /// `application/x-www-form-urlencoded` body parameters, if any.
    pub fn authorization(
        &self,
        method: &str,
        url: &Url,
        form: &[(&str, &str)],
        nonce: &Nonce,
    ) -> Result<String> {
        let timestamp = nonce.timestamp.to_string();
        let oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.credentials.consumer_key.as_str()),
            ("oauth_nonce", nonce.nonce.as_str()),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let mut all: Vec<(String, String)> = oauth_params
            .iter()
            .map(|(k, v)| (encode(k), encode(v)))
            .chain(url.query_pairs().map(|(k, v)| (encode(&k), encode(&v))))
            .chain(form.iter().map(|(k, v)| (encode(k), encode(v))))
            .collect();
        all.sort();

        let param_string = all
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(&base_url(url)?),
            encode(&param_string)
        );

        let signature = self.sign(&base_string)?;

        let header = oauth_params
            .iter()
            .map(|(k, v)| (*k, *v))
            .chain(std::iter::once(("oauth_signature", signature.as_str())))
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header))
    }

    fn sign(&self, base_string: &str) -> Result<String> {
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| Error::Other(format!("Invalid signing key: {}", e)))?;
        mac.update(base_string.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

/// Scheme, host, non-default port and path; no query or fragment
fn base_url(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::Other(format!("URL has no host: {}", url)))?;
    let mut base = format!("{}://{}", url.scheme(), host.to_lowercase());
    if let Some(port) = url.port() {
        base.push_str(&format!(":{}", port));
    }
    base.push_str(url.path());
    Ok(base)
}
