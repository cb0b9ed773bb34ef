//! Logging initialization and configuration.

use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "wallet_session=info";

/// Initialize the logging system.
///
/// Uses the `RUST_LOG` environment variable for filtering. If not set,
/// defaults to `wallet_session=info`.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber
/// has already been set.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer())
        .init();
}

/// Try to initialize the logging system.
///
/// Returns `Ok(())` if successful, or `Err` if logging has already been
/// initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer())
        .try_init()
}

/// Try to initialize logging with an explicit level or filter directive.
///
/// A bare level such as `debug` is scoped to this crate; anything else is
/// treated as a full `EnvFilter` directive. Falls back to the default
/// filter when the directive does not parse.
pub fn try_init_with(level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(stderr_layer())
        .try_init()
}

/// Log records go to stderr so stdout stays free for the session output.
fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
}

fn filter_for(level: &str) -> EnvFilter {
    let directive = match level {
        "error" | "warn" | "info" | "debug" | "trace" => format!("wallet_session={level}"),
        other => other.to_string(),
    };
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_idempotent() {
        let _ = try_init();
        // Already initialized by now, must not panic
        let _ = try_init_with("debug");
    }

    #[test]
    fn test_filter_for_bare_level() {
        let filter = filter_for("debug");
        assert_eq!(filter.to_string(), "wallet_session=debug");
    }

    #[test]
    fn test_filter_for_invalid_directive() {
        let filter = filter_for("wallet_session=loud");
        assert_eq!(filter.to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn test_logging_works() {
        let _ = try_init();

        tracing::info!("test info message");
        tracing::warn!("test warn message");
        tracing::error!("test error message");
    }
}
