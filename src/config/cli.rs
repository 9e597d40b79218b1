use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the eventgate binary.
#[derive(Debug, Parser)]
#[command(
    name = "eventgate",
    version,
    about = "Replay configuration change feeds into the gateway target cache"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "EVENTGATE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Apply a JSON-lines change feed and print the resulting routing state.
    Replay(ReplayArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub overrides: ReplayOverrides,

    /// Resolve an HTTP request against the replayed endpoints.
    #[arg(long, num_args = 2, value_names = ["METHOD", "PATH"])]
    pub resolve: Option<Vec<String>>,

    /// Report the subscribing functions of a topic. May be repeated.
    #[arg(long = "topic", value_name = "TOPIC")]
    pub topics: Vec<String>,

    /// Feed file to replay, or `-` for stdin.
    #[arg(value_name = "FEED", value_hint = ValueHint::FilePath)]
    pub feed: PathBuf,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ReplayOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the notification channel capacity.
    #[arg(long = "feed-channel-capacity", value_name = "COUNT")]
    pub feed_channel_capacity: Option<usize>,
}
