//! Command-line interface for wallet-session.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Wallet JSON-RPC endpoint (overrides config file).
    pub rpc_url: Option<String>,
    /// Profile service base URL (overrides config file).
    pub profile_url: Option<String>,
    /// Clear the user when a connect fails.
    pub reset_on_failure: bool,
    /// Disconnect again after a successful connect.
    pub disconnect: bool,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('r') | Long("rpc-url") => {
                let value: String = parser.value()?.parse()?;
                result.rpc_url = Some(validate_url("rpc-url", value)?);
            }
            Short('P') | Long("profile-url") => {
                let value: String = parser.value()?.parse()?;
                result.profile_url = Some(validate_url("profile-url", value)?);
            }
            Long("reset-on-failure") => {
                result.reset_on_failure = true;
            }
            Short('d') | Long("disconnect") => {
                result.disconnect = true;
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

fn validate_url(name: &'static str, value: String) -> Result<String, ArgsError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ArgsError::InvalidValue(name, value))
    }
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"wallet-session {version}
Connect a wallet, load its profile and print the session state

USAGE:
    wallet-session [OPTIONS]

OPTIONS:
    -c, --config <FILE>       Path to configuration file (JSON)
    -r, --rpc-url <URL>       Wallet JSON-RPC endpoint
    -P, --profile-url <URL>   Profile service base URL
        --reset-on-failure    Clear the user when a connect fails
    -d, --disconnect          Disconnect after a successful connect
    -l, --log-level <LVL>     Log level (error, warn, info, debug, trace)
    -h, --help                Print help
    -V, --version             Print version

ENVIRONMENT VARIABLES:
    WALLET_SESSION_RPC_URL      Wallet endpoint (overrides config)
    WALLET_SESSION_PROFILE_URL  Profile service (overrides config)
    WALLET_SESSION_ON_FAILURE   keep | reset (overrides config)
    WALLET_SESSION_LOG_LEVEL    Log level (overrides config)
    RUST_LOG                    Alternative log level setting

Without a wallet endpoint the wallet is treated as not installed.

EXAMPLES:
    # Connect against a local node and profile service
    wallet-session -r http://127.0.0.1:8545 -P http://127.0.0.1:8080/profiles

    # Start with config file
    wallet-session -c ~/.config/wallet-session.json
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("wallet-session {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
