//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Clone, Parser)]
#[command(name = "tapwatch")]
#[command(about = "A suspension-resilient stopwatch with interval alerts")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Tick cadence in milliseconds while the stopwatch runs
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Initial alert interval in seconds (disabled when omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub interval: Option<u32>,

    /// Wall-clock jump beyond monotonic time that counts as a suspension
    #[arg(long, default_value = "2000")]
    pub gap_threshold_ms: u64,

    /// How often to check for a suspension gap, in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub wake_check_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn gap_threshold(&self) -> Duration {
        Duration::from_millis(self.gap_threshold_ms)
    }

    pub fn wake_check_interval(&self) -> Duration {
        Duration::from_millis(self.wake_check_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Parser::parse_from(["tapwatch"])
    }
}
