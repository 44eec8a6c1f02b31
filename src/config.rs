use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{AppError, Result};

/// Default delay between probes (milliseconds).
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Default number of raw samples folded into one level-0 summary.
pub const DEFAULT_GROUP_SIZE: usize = 32;

/// Default number of aggregation levels.
pub const DEFAULT_LEVELS: usize = 2;

/// Upper bound on aggregation levels. Chunk sizes grow as group^levels.
pub const MAX_LEVELS: usize = 8;

/// The raw window keeps at most `view width * WINDOW_LENGTH_FACTOR` samples.
pub const WINDOW_LENGTH_FACTOR: usize = 65536;

/// View width assumed until the terminal reports its size.
pub const INITIAL_VIEW_WIDTH: usize = 80;

/// Number of entries in the latency legend.
pub const LEGEND_STEPS: usize = 90;

/// ICMP echo payload length in bytes.
pub const PING_PAYLOAD_LEN: usize = 56;

#[derive(Parser, Debug)]
#[command(
    name = "pingback",
    version,
    about = "Live multi-resolution latency heatmap in the terminal"
)]
pub struct Cli {
    /// Host name or IP address to ping
    #[arg(short = 'a', long = "address", value_name = "HOST")]
    pub address: String,

    /// Delay between pings; also the reply timeout
    #[arg(
        short = 'd',
        long = "delay",
        default_value_t = DEFAULT_INTERVAL_MS,
        value_name = "MS"
    )]
    pub delay_ms: u64,

    /// Number of samples aggregated together by the first level
    #[arg(
        short = 'g',
        long = "group",
        default_value_t = DEFAULT_GROUP_SIZE,
        value_name = "N"
    )]
    pub group: usize,

    /// Number of aggregate streams
    #[arg(
        short = 'n',
        long = "aggregates",
        default_value_t = DEFAULT_LEVELS,
        value_name = "N"
    )]
    pub aggregates: usize,

    /// Write diagnostics to this file (the terminal is taken by the UI)
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub address: String,
    /// Tick interval, doubles as the probe timeout.
    pub interval: Duration,
    pub group_size: usize,
    pub levels: usize,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let address = cli.address.trim().to_string();
        if address.is_empty() {
            return Err(AppError::Config("address must not be empty".to_string()));
        }
        if cli.delay_ms == 0 {
            return Err(AppError::Config("delay must be at least 1 ms".to_string()));
        }
        if cli.group < 2 {
            return Err(AppError::Config("group must be at least 2".to_string()));
        }
        if cli.aggregates == 0 || cli.aggregates > MAX_LEVELS {
            return Err(AppError::Config(format!(
                "aggregates must be between 1 and {MAX_LEVELS}"
            )));
        }
        if cli.group.checked_pow(cli.aggregates as u32).is_none() {
            return Err(AppError::Config(format!(
                "group {} with {} aggregates overflows the chunk size",
                cli.group, cli.aggregates
            )));
        }

        Ok(Self {
            address,
            interval: Duration::from_millis(cli.delay_ms),
            group_size: cli.group,
            levels: cli.aggregates,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_file: cli.log_file,
        })
    }
}
