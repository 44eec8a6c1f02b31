mod color;
mod config;
mod error;
mod legend;
mod probe;
mod series;
mod state;
mod tui;
mod types;

use std::fs::File;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config};
use crate::error::Result;
use crate::probe::IcmpProber;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_cli(Cli::parse()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&cfg) {
        eprintln!("Cannot open log file: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// The UI owns the terminal, so diagnostics only go to `--log-file`.
fn init_logging(cfg: &Config) -> Result<()> {
    let Some(path) = &cfg.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(cfg: Config) -> Result<()> {
    info!(
        "pingback starting: target={} interval={}ms group={} levels={}",
        cfg.address,
        cfg.interval.as_millis(),
        cfg.group_size,
        cfg.levels,
    );

    let prober = IcmpProber::connect(&cfg.address, cfg.interval).await?;
    info!("resolved {} to {}", cfg.address, prober.target());

    tui::run(&cfg, prober).await?;

    info!("pingback exiting");
    Ok(())
}
