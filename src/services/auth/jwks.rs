//! Identity provider key set (JWKS) retrieval.
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use serde::Deserialize;

use crate::services::auth::error::AuthError;

/// Source of the provider's published signing keys.
///
/// Called once per protected request; implementations must not cache, so a
/// rotated key is picked up on the very next request.
#[async_trait]
pub trait KeySetFetcher: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches `/.well-known/jwks.json` over HTTPS with a bounded timeout.
#[derive(Clone, Debug)]
pub struct HttpKeySetFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpKeySetFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySetFetcher for HttpKeySetFetcher {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                tracing::warn!(error = ?e, url = %self.url, "jwks request failed");
                AuthError::KeySetUnavailable(e)
            })?;

        let raw = resp.json::<RawKeySet>().await.map_err(|e| {
            tracing::warn!(error = ?e, url = %self.url, "jwks body is not a key set");
            AuthError::KeySetUnavailable(e)
        })?;

        Ok(raw.into_key_set())
    }
}

/// Key set as published. Entries are parsed one by one so an unsupported key
/// type does not hide the usable keys next to it.
#[derive(Debug, Deserialize)]
struct RawKeySet {
    keys: Vec<serde_json::Value>,
}

impl RawKeySet {
    fn into_key_set(self) -> JwkSet {
        let keys = self
            .keys
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Jwk>(entry) {
                Ok(jwk) => Some(jwk),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unsupported jwks entry");
                    None
                }
            })
            .collect();

        JwkSet { keys }
    }
}
