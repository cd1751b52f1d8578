use clap::Parser;
use log::LevelFilter;
use shared::utils::signal::cancel_on_shutdown_signal;
use tokio_util::sync::CancellationToken;

use orchestrator::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_level = match cli.log_level.as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => anyhow::bail!("invalid log level: {}", cli.log_level),
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let cancellation_token = CancellationToken::new();
    let _signal_handle = cancel_on_shutdown_signal(cancellation_token.clone())?;

    cli.run(cancellation_token).await
}
