//! wallet-session binary entry point.

use std::process::ExitCode;

use tracing::{error, info};
use wallet_session::cli::{self, Args};
use wallet_session::config::Config;
use wallet_session::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args)?;
    logging::try_init_with(config.log_filter()).ok();

    info!("wallet-session v{}", env!("CARGO_PKG_VERSION"));

    let session = config.build_session()?;

    // One JSON line per published state
    let _printer = session.subscribe(|state| match serde_json::to_string(state) {
        Ok(line) => println!("{}", line),
        Err(e) => error!("failed to encode state: {}", e),
    });

    session.connect().await?;

    if args.disconnect {
        session.disconnect();
    }

    Ok(())
}
