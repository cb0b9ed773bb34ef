//! JSON-RPC wallet provider.
//!
//! Talks to a wallet node over HTTP using JSON-RPC 2.0:
//! `eth_requestAccounts` asks for account access, and the first entry of
//! `eth_accounts` is the active signer.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::WalletProvider;
use crate::error::WalletSessionError;
use crate::session::Address;
use crate::Result;

/// Error code a wallet returns when the user declines a request.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a [Value],
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn into_error(self) -> WalletSessionError {
        if self.code == USER_REJECTED_CODE {
            WalletSessionError::UserRejected
        } else {
            WalletSessionError::Provider(format!("{} (code {})", self.message, self.code))
        }
    }
}

/// Wallet provider backed by a JSON-RPC endpoint.
#[derive(Debug)]
pub struct RpcWallet {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcWallet {
    /// Create a provider for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    /// Create a provider that reuses an existing HTTP client.
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Get the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str) -> Result<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params: &[],
        };
        debug!(method, id = request.id, "wallet rpc call");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WalletSessionError::Provider(format!("{method}: {e}")))?;

        let status = response.status();
        let reply: RpcResponse = response.json().await.map_err(|e| {
            WalletSessionError::Provider(format!("{method}: HTTP {status}: {e}"))
        })?;

        if let Some(err) = reply.error {
            return Err(err.into_error());
        }

        reply
            .result
            .ok_or_else(|| WalletSessionError::Provider(format!("{method}: missing result")))
    }

    async fn accounts(&self, method: &str) -> Result<Vec<Address>> {
        let result = self.call(method).await?;
        serde_json::from_value(result)
            .map_err(|e| WalletSessionError::Provider(format!("{method}: {e}")))
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<()> {
        let granted = self.accounts("eth_requestAccounts").await?;
        debug!(count = granted.len(), "account access granted");
        Ok(())
    }

    async fn signer_address(&self) -> Result<Address> {
        self.accounts("eth_accounts")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WalletSessionError::Provider("no accounts available".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_accounts",
            params: &[],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "jsonrpc": "2.0", "id": 7, "method": "eth_accounts", "params": [] })
        );
    }

    #[test]
    fn test_user_rejected_code() {
        let err = RpcError {
            code: USER_REJECTED_CODE,
            message: "User rejected the request.".into(),
        }
        .into_error();
        assert_eq!(err, WalletSessionError::UserRejected);
    }

    #[test]
    fn test_other_rpc_error() {
        let err = RpcError {
            code: -32603,
            message: "Internal error".into(),
        }
        .into_error();
        assert_eq!(
            err,
            WalletSessionError::Provider("Internal error (code -32603)".into())
        );
    }

    #[test]
    fn test_response_parsing() {
        let reply: RpcResponse =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1, "result": ["0x1"] }))
                .unwrap();
        assert!(reply.error.is_none());
        assert_eq!(reply.result, Some(json!(["0x1"])));
    }

    #[test]
    fn test_url() {
        let wallet = RpcWallet::new("http://127.0.0.1:8545");
        assert_eq!(wallet.url(), "http://127.0.0.1:8545");
    }
}
