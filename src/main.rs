//! exam-relay entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env > config)
//!   4. Init logger once
//!   5. Build the relay (memory system + provider slots + marking template)
//!   6. Spawn Ctrl-C → shutdown signal watcher
//!   7. Run the comms subsystem until shutdown

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use exam_relay::error::AppError;
use exam_relay::subsystems::comms;
use exam_relay::subsystems::relay::Relay;
use exam_relay::{config, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    let force_cli_level = args.log_level.is_some();

    logger::init(effective_log_level, force_cli_level)?;

    info!(
        bind = %config.server.bind,
        gemini_model = %config.gemini.model,
        openai_model = %config.openai.model,
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        secrets = ?config.secrets,
        "config loaded"
    );

    if config.secrets.api_secret.is_none() {
        warn!("API_SECRET is not set, every relay request will be rejected with 403");
    }
    if config.gemini.backend == "gemini" && config.secrets.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set, Gemini calls will fail upstream");
    }
    if config.openai.backend == "openai" && config.secrets.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set, OpenAI calls will fail upstream");
    }

    let relay = Arc::new(Relay::from_config(&config)?);

    // Shared shutdown token: Ctrl-C cancels it, all tasks watch it.
    let shutdown = CancellationToken::new();

    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    let comms = comms::start(&config, relay, shutdown.clone());
    let result = comms.join().await;

    shutdown.cancel();
    info!("shutdown complete");
    result
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: exam-relay [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    //   -v      → warn
    //   -vv     → info
    //   -vvv    → debug  (request flow, provider selection)
    //   -vvvv+  → trace  (full upstream payload dumps)
    let log_level = match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    };

    CliArgs { log_level, config_path }
}
