//! # wallet-session
//!
//! Reactive user session backed by a wallet and a profile provider.
//!
//! A [`UserSession`] holds either nothing or the connected [`User`]: the
//! signer address reported by the wallet merged with the profile stored for
//! it. Observers subscribe to the session and are notified on every change.
//!
//! ## Features
//!
//! - **Pluggable boundaries**: wallet detection, wallet access and profile
//!   lookup are traits, so the session runs against real endpoints or
//!   in-memory fakes
//! - **Single-flight connect**: overlapping `connect()` calls are rejected
//! - **Explicit failure policy**: a failed connect either keeps or clears
//!   the previous user, never publishes a partial one
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wallet_session::provider::{HttpProfiles, InjectedWallet, RpcWallet};
//! use wallet_session::UserSession;
//!
//! #[tokio::main]
//! async fn main() -> wallet_session::Result<()> {
//!     wallet_session::logging::try_init().ok();
//!
//!     let wallet = InjectedWallet::installed(Arc::new(RpcWallet::new("http://127.0.0.1:8545")));
//!     let profiles = HttpProfiles::new("http://127.0.0.1:8080/profiles");
//!     let session = UserSession::new(Arc::new(wallet), Arc::new(profiles));
//!
//!     let _sub = session.subscribe(|state| println!("{:?}", state));
//!     let user = session.connect().await?;
//!     println!("connected as {}", user.address);
//!
//!     session.disconnect();
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod session;

// Re-export commonly used types
pub use error::{Result, WalletSessionError};
pub use provider::{InjectedWallet, ProfileProvider, WalletDetector, WalletProvider};
pub use session::{
    Address, FailurePolicy, Observable, Profile, Subscription, User, UserSession, UserState,
};
