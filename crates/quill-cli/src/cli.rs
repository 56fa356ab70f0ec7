//! CLI argument definitions for Quill.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "quill",
    version,
    about = "Quill - replay document editing sessions",
    long_about = "Replay scripted editing sessions against in-memory stores.\n\n\
                  Shows when debounced autosaves are issued and how cover image\n\
                  removal reaches file storage and the document store."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a scripted editing session.
    Replay(ReplayArgs),

    /// Print the effective settings as TOML.
    Config,
}

#[derive(Parser)]
pub struct ReplayArgs {
    /// Path to the JSON replay script.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Override the autosave quiet period.
    #[arg(long = "quiet-period-ms", value_name = "MS")]
    pub quiet_period_ms: Option<u64>,

    /// Override the maximum wait before a forced save.
    #[arg(long = "max-wait-ms", value_name = "MS")]
    pub max_wait_ms: Option<u64>,

    /// Re-arm failed saves instead of waiting for the next edit.
    #[arg(long = "rearm-on-failure")]
    pub rearm_on_failure: bool,

    /// Print the final document as JSON after the summary.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
