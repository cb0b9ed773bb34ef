//! In-memory providers.
//!
//! Useful for embedding a session where the wallet and profile data are
//! already known, and for exercising every branch of the connect sequence
//! in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::{ProfileProvider, WalletProvider};
use crate::error::WalletSessionError;
use crate::session::{Address, Profile};
use crate::Result;

#[derive(Debug, Clone)]
enum AccessOutcome {
    Approve,
    Reject,
    Fail(String),
}

/// A wallet with a fixed account list and a scripted access decision.
#[derive(Debug)]
pub struct MemoryWallet {
    outcome: AccessOutcome,
    accounts: Vec<Address>,
    requests: AtomicUsize,
}

impl MemoryWallet {
    /// A wallet that grants access and signs as `address`.
    pub fn approving(address: Address) -> Self {
        Self::with_outcome(AccessOutcome::Approve, vec![address])
    }

    /// A wallet whose user declines every access request.
    pub fn rejecting() -> Self {
        Self::with_outcome(AccessOutcome::Reject, Vec::new())
    }

    /// A wallet that fails every access request with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(AccessOutcome::Fail(message.into()), Vec::new())
    }

    /// A wallet that grants access but exposes no accounts.
    pub fn empty() -> Self {
        Self::with_outcome(AccessOutcome::Approve, Vec::new())
    }

    fn with_outcome(outcome: AccessOutcome, accounts: Vec<Address>) -> Self {
        Self {
            outcome,
            accounts,
            requests: AtomicUsize::new(0),
        }
    }

    /// Number of access requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MemoryWallet {
    async fn request_accounts(&self) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            AccessOutcome::Approve => Ok(()),
            AccessOutcome::Reject => Err(WalletSessionError::UserRejected),
            AccessOutcome::Fail(message) => Err(WalletSessionError::Provider(message.clone())),
        }
    }

    async fn signer_address(&self) -> Result<Address> {
        self.accounts
            .first()
            .cloned()
            .ok_or_else(|| WalletSessionError::Provider("no accounts available".into()))
    }
}

/// A profile table held in memory.
#[derive(Debug, Default)]
pub struct MemoryProfiles {
    profiles: RwLock<HashMap<Address, Profile>>,
    outage: Option<String>,
}

impl MemoryProfiles {
    /// Create an empty profile table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every lookup fails with a network error.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            outage: Some(message.into()),
        }
    }

    /// Builder-style insert.
    pub fn with_profile(self, address: Address, profile: Profile) -> Self {
        self.insert(address, profile);
        self
    }

    /// Store the profile for `address`, replacing any previous record.
    pub fn insert(&self, address: Address, profile: Profile) {
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, profile);
    }

    /// Remove the profile for `address`.
    pub fn remove(&self, address: &Address) -> Option<Profile> {
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(address)
    }

    /// Get the number of stored profiles.
    pub fn count(&self) -> usize {
        self.profiles.read().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ProfileProvider for MemoryProfiles {
    async fn get_profile(&self, address: &Address) -> Result<Profile> {
        if let Some(ref message) = self.outage {
            return Err(WalletSessionError::Network(message.clone()));
        }

        let profiles = self
            .profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        profiles
            .get(address)
            .cloned()
            .ok_or_else(|| WalletSessionError::NotFound(address.to_string()))
    }
}
