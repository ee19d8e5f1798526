mod args;
mod demo;
mod logging;

use clap::Parser;
use tracing::Level;

use crate::args::{Args, DemoConfig};
use crate::logging::LogWriter;

fn main() {
    let args = Args::parse();
    let config = DemoConfig::from_args(args);
    let writer = LogWriter::new(config.log.clone()).unwrap_or_else(|err| {
        eprintln!("failed to open log file: {err}");
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_max_level(Level::INFO)
        .init();

    let config_json = serde_json::to_string(&config).unwrap_or_else(|_| "{}".to_string());
    tracing::info!("config: {}", config_json);

    if let Err(err) = demo::run(&config) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
