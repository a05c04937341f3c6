//! # Roster Report
//!
//! Command-line export of the roster report.

use clap::Parser;
use report_cli::{run, CliConfig, RosterReportArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,report_cli=debug,report_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // JSON lines when RUST_LOG_FORMAT=json
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

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = RosterReportArgs::parse();
    let config = CliConfig::from(args);

    tracing::info!(
        "Exporting {:?} ({:?}, {:?})",
        config.format,
        config.orientation,
        config.delivery
    );

    let outcome = run(&config)?;
    if let Some(message) = &outcome.confirmation {
        tracing::info!("{message}");
    }
    tracing::info!("{} rows exported", outcome.rows);

    println!("{}", outcome.file.display());
    Ok(())
}
