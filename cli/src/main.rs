use anyhow::{Context, Result};
use clap::Parser;
use healthcard_cli::{Args, Session, TerminalPrompt, execute};
use healthcard_sync::{AutoConfirm, HttpTransport, Prompt};
use std::io;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; flags and the environment still apply.
    let env_file = dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    if let Some(path) = env_file {
        debug!("loaded environment from {}", path.display());
    }

    let config = args.client_config();
    debug!("server: {} (timeout {}s)", config.base_url, config.timeout_secs);
    let transport = HttpTransport::new(config).context("failed to create HTTP client")?;
    let prompt: Arc<dyn Prompt> = if args.yes {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(TerminalPrompt)
    };
    let session = Session::new(Arc::new(transport), prompt);

    let mut stdout = io::stdout().lock();
    execute(&session, args.command, &mut stdout).await
}
