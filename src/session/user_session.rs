//! The user session: connect, disconnect and subscribe.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::{Observable, Subscription, User, UserState};
use crate::error::WalletSessionError;
use crate::provider::{ProfileProvider, WalletDetector, WalletProvider};
use crate::Result;

/// What a failed connect does to the published state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Leave the state exactly as it was before the call.
    #[default]
    Keep,
    /// Publish `Absent`.
    Reset,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "keep" => Ok(FailurePolicy::Keep),
            "reset" => Ok(FailurePolicy::Reset),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Keep => f.write_str("keep"),
            FailurePolicy::Reset => f.write_str("reset"),
        }
    }
}

/// Clears the in-flight flag when the connect call finishes or is dropped.
struct ConnectGuard<'a>(&'a AtomicBool);

impl<'a> ConnectGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ConnectGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Holds the connected user (or nothing) and publishes every change.
///
/// A session is constructed with its wallet detector and profile provider
/// and is usually shared behind an `Arc`. Only one `connect` runs at a time;
/// an overlapping call fails with [`WalletSessionError::ConnectInProgress`].
pub struct UserSession {
    state: Observable<UserState>,
    wallet: Arc<dyn WalletDetector>,
    profiles: Arc<dyn ProfileProvider>,
    on_failure: FailurePolicy,
    connecting: AtomicBool,
}

impl UserSession {
    /// Create a session in the `Absent` state.
    pub fn new(wallet: Arc<dyn WalletDetector>, profiles: Arc<dyn ProfileProvider>) -> Self {
        Self {
            state: Observable::new(UserState::Absent),
            wallet,
            profiles,
            on_failure: FailurePolicy::default(),
            connecting: AtomicBool::new(false),
        }
    }

    /// Set what a failed connect does to the state.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    /// Get the failure policy.
    pub fn failure_policy(&self) -> FailurePolicy {
        self.on_failure
    }

    /// Connect the wallet and load the signer's profile.
    ///
    /// On success the state becomes `Present` and the user is returned.
    /// If no wallet is installed the state is never touched. Any other
    /// failure is returned as-is and handled according to the
    /// [`FailurePolicy`]; a partially loaded user is never published.
    pub async fn connect(&self) -> Result<User> {
        let _guard = ConnectGuard::acquire(&self.connecting).ok_or_else(|| {
            warn!("connect ignored: another connect is in progress");
            WalletSessionError::ConnectInProgress
        })?;

        let Some(wallet) = self.wallet.detect() else {
            error!("wallet not installed");
            return Err(WalletSessionError::WalletUnavailable);
        };

        match self.load_user(wallet.as_ref()).await {
            Ok(user) => {
                info!(address = %user.address, "user connected");
                self.state.set(UserState::Present(user.clone()));
                Ok(user)
            }
            Err(err) => {
                error!(error = %err, policy = %self.on_failure, "connect failed");
                if self.on_failure == FailurePolicy::Reset {
                    self.state.set(UserState::Absent);
                }
                Err(err)
            }
        }
    }

    async fn load_user(&self, wallet: &dyn WalletProvider) -> Result<User> {
        debug!("requesting account access");
        wallet.request_accounts().await?;

        let address = wallet.signer_address().await?;
        debug!(%address, "loading profile");

        let profile = self.profiles.get_profile(&address).await?;
        Ok(User::new(address, profile))
    }

    /// Publish `Absent`.
    pub fn disconnect(&self) {
        if self.state.get().is_present() {
            info!("user disconnected");
        }
        self.state.set(UserState::Absent);
    }

    /// Register an observer; it is called right away with the current state.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&UserState) + Send + Sync + 'static,
    {
        self.state.subscribe(callback)
    }

    /// Get a snapshot of the current state.
    pub fn current(&self) -> UserState {
        self.state.get()
    }

    /// Get a watch receiver for async observers.
    pub fn watch(&self) -> watch::Receiver<UserState> {
        self.state.watch()
    }

    /// Check if a connect is in flight.
    pub fn is_connecting(&self) -> bool {
        self.connecting.load(Ordering::Acquire)
    }
}

impl fmt::Debug for UserSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSession")
            .field("state", &self.state)
            .field("on_failure", &self.on_failure)
            .field("connecting", &self.is_connecting())
            .finish_non_exhaustive()
    }
}
