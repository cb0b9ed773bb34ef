//! Error types for wallet-session.

use thiserror::Error;

/// Main error type for wallet-session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletSessionError {
    /// No wallet capability is present in the host environment.
    #[error("wallet not installed")]
    WalletUnavailable,

    /// The user declined the account access request.
    #[error("account access rejected by user")]
    UserRejected,

    /// The wallet provider failed while serving a request.
    #[error("wallet provider error: {0}")]
    Provider(String),

    /// The profile lookup could not be completed.
    #[error("network error: {0}")]
    Network(String),

    /// No profile record exists for the given address.
    #[error("profile not found: {0}")]
    NotFound(String),

    /// A string was not a well-formed chain address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Another connect attempt is still in flight.
    #[error("connect already in progress")]
    ConnectInProgress,
}

impl WalletSessionError {
    /// Whether the error originated from the wallet side of the connect
    /// sequence (availability or account access).
    pub fn is_wallet_error(&self) -> bool {
        matches!(
            self,
            Self::WalletUnavailable | Self::UserRejected | Self::Provider(_)
        )
    }

    /// Whether the error originated from the profile lookup.
    pub fn is_profile_error(&self) -> bool {
        matches!(self, Self::Network(_) | Self::NotFound(_))
    }
}

/// Convenience Result type for wallet-session operations.
pub type Result<T> = std::result::Result<T, WalletSessionError>;
