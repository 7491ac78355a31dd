//! Configuration and CLI argument handling

use clap::Parser;

use crate::tasks::TickPolicy;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-board")]
#[command(about = "A headless multi-timer countdown service")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// How tickers catch up after the process stalls
    #[arg(long, value_enum, default_value_t = TickPolicy::Deadline)]
    pub tick_policy: TickPolicy,

    /// Notifications buffered per subscriber before it starts lagging
    #[arg(long, default_value = "256")]
    pub event_buffer: usize,

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
}
