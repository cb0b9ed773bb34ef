//! Wallet and profile provider boundaries.
//!
//! A session never talks to a wallet or a profile backend directly. It goes
//! through three seams:
//!
//! - [`WalletDetector`]: is a wallet present in the host environment?
//! - [`WalletProvider`]: account access and the active signer address.
//! - [`ProfileProvider`]: the profile record stored for an address.
//!
//! In-memory implementations live in [`memory`], network-backed ones in
//! [`rpc`] and [`http`].

pub mod http;
pub mod memory;
pub mod rpc;

use std::sync::Arc;

use async_trait::async_trait;

use crate::session::{Address, Profile};
use crate::Result;

pub use http::HttpProfiles;
pub use memory::{MemoryProfiles, MemoryWallet};
pub use rpc::RpcWallet;

/// Access to a connected wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for permission to access its accounts.
    ///
    /// Fails with `UserRejected` when the user declines, or `Provider` when
    /// the wallet itself fails.
    async fn request_accounts(&self) -> Result<()>;

    /// Get the address of the active signer.
    async fn signer_address(&self) -> Result<Address>;
}

/// Detects whether a wallet is available.
pub trait WalletDetector: Send + Sync {
    /// Return the wallet provider if one is installed.
    fn detect(&self) -> Option<Arc<dyn WalletProvider>>;
}

/// Lookup of profile records keyed by address.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Fetch the profile for `address`.
    ///
    /// Fails with `NotFound` when no record exists, or `Network` when the
    /// lookup cannot be completed.
    async fn get_profile(&self, address: &Address) -> Result<Profile>;
}

/// A wallet slot in the host environment: either installed or missing.
#[derive(Clone, Default)]
pub struct InjectedWallet {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl InjectedWallet {
    /// A detector that reports the given provider as installed.
    pub fn installed(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A detector that reports no wallet.
    pub fn missing() -> Self {
        Self { provider: None }
    }

    /// Check if a wallet is installed.
    pub fn is_installed(&self) -> bool {
        self.provider.is_some()
    }
}

impl WalletDetector for InjectedWallet {
    fn detect(&self) -> Option<Arc<dyn WalletProvider>> {
        self.provider.clone()
    }
}

impl std::fmt::Debug for InjectedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectedWallet")
            .field("installed", &self.is_installed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_wallet() {
        let detector = InjectedWallet::missing();
        assert!(!detector.is_installed());
        assert!(detector.detect().is_none());
    }

    #[test]
    fn test_installed_wallet() {
        let wallet = Arc::new(MemoryWallet::approving(Address::parse("0x1").unwrap()));
        let detector = InjectedWallet::installed(wallet);
        assert!(detector.is_installed());

        let provider = detector.detect().unwrap();
        let address = tokio_test::block_on(provider.signer_address()).unwrap();
        assert_eq!(address.as_str(), "0x1");
    }
}
