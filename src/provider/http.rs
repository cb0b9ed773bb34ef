//! HTTP profile provider.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::ProfileProvider;
use crate::error::WalletSessionError;
use crate::session::{Address, Profile};
use crate::Result;

/// Profile provider that fetches `GET {base_url}/{address}`.
///
/// A `404` means the address has no profile. Any other non-success status,
/// transport failure, or a body that is not a JSON object is reported as a
/// network error.
#[derive(Debug, Clone)]
pub struct HttpProfiles {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProfiles {
    /// Create a provider rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a provider that reuses an existing HTTP client.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build the lookup URL for `address`.
    pub fn profile_url(&self, address: &Address) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), address)
    }
}

#[async_trait]
impl ProfileProvider for HttpProfiles {
    async fn get_profile(&self, address: &Address) -> Result<Profile> {
        let url = self.profile_url(address);
        debug!(%url, "fetching profile");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletSessionError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(WalletSessionError::NotFound(address.to_string())),
            status if !status.is_success() => {
                return Err(WalletSessionError::Network(format!("HTTP {status}")))
            }
            _ => {}
        }

        match response.json::<Value>().await {
            Ok(Value::Object(profile)) => Ok(profile),
            Ok(_) => Err(WalletSessionError::Network(
                "unexpected profile payload".into(),
            )),
            Err(e) => Err(WalletSessionError::Network(e.to_string())),
        }
    }
}
