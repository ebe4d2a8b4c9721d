//! # Drawpad
//!
//! Command-line drawing host.

use clap::Parser;
use drawpad_cli::{CliArgs, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing.
///
/// Logs go to stderr so command output on stdout stays scriptable.
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,drawpad=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let command = args.command.clone();
    let config = Config::from(args);

    tracing::debug!(
        "Data dir {}, canvas {}px, background {}",
        config.data_dir.display(),
        config.canvas_size,
        config.background
    );

    let mut stdout = std::io::stdout().lock();
    drawpad_cli::run(&config, command, &mut stdout).await
}
