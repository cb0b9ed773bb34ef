//! Configuration management for wallet-session.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::provider::{HttpProfiles, InjectedWallet, RpcWallet};
use crate::session::{FailurePolicy, UserSession};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wallet endpoint configuration.
    pub wallet: WalletSection,
    /// Profile service configuration.
    pub profiles: ProfilesSection,
    /// Session behaviour.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Wallet configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletSection {
    /// JSON-RPC endpoint. Unset means no wallet is installed.
    pub rpc_url: Option<String>,
}

/// Profile service configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilesSection {
    /// Base URL; profiles are fetched from `{base_url}/{address}`.
    pub base_url: Option<String>,
}

/// Session configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// What a failed connect does to the current user.
    pub on_failure: FailurePolicy,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WALLET_SESSION_RPC_URL").filter(|u| !u.is_empty()) {
            self.wallet.rpc_url = Some(url);
        }

        if let Some(url) = lookup("WALLET_SESSION_PROFILE_URL").filter(|u| !u.is_empty()) {
            self.profiles.base_url = Some(url);
        }

        if let Some(policy) = lookup("WALLET_SESSION_ON_FAILURE") {
            if let Ok(policy) = policy.parse() {
                self.session.on_failure = policy;
            }
        }

        if let Some(level) = lookup("WALLET_SESSION_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref url) = args.rpc_url {
            self.wallet.rpc_url = Some(url.clone());
        }

        if let Some(ref url) = args.profile_url {
            self.profiles.base_url = Some(url.clone());
        }

        if args.reset_on_failure {
            self.session.on_failure = FailurePolicy::Reset;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Build a session wired to the configured endpoints.
    ///
    /// The wallet is reported as not installed when no RPC URL is set; a
    /// profile service URL is required.
    pub fn build_session(&self) -> Result<UserSession, ConfigError> {
        let base_url = self
            .profiles
            .base_url
            .as_deref()
            .ok_or(ConfigError::MissingProfileUrl)?;

        let client = reqwest::Client::new();
        let wallet = match self.wallet.rpc_url {
            Some(ref url) => {
                InjectedWallet::installed(Arc::new(RpcWallet::with_client(url, client.clone())))
            }
            None => InjectedWallet::missing(),
        };
        let profiles = HttpProfiles::with_client(base_url, client);

        Ok(UserSession::new(Arc::new(wallet), Arc::new(profiles))
            .with_failure_policy(self.session.on_failure))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// No profile service URL was configured.
    MissingProfileUrl,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::MissingProfileUrl => write!(f, "no profile service URL configured"),
        }
    }
}

impl std::error::Error for ConfigError {}
