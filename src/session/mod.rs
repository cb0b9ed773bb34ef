//! User session module.
//!
//! This module provides the session that connects a wallet, loads the
//! profile for its signer address, and publishes the result to observers.

mod address;
mod observable;
mod state;
mod user_session;

pub use address::Address;
pub use observable::{Observable, Subscription};
pub use state::{Profile, User, UserState};
pub use user_session::{FailurePolicy, UserSession};
