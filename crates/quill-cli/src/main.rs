//! Quill CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use quill_cli::logging::{LogConfig, LogFormat, init_logging};
use quill_cli::replay::{load_script, run_replay};
use quill_cli::settings::Settings;
use quill_persistence::FailurePolicy;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, ReplayArgs};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let settings = Settings::load(cli.config.as_deref());
    let result = match &cli.command {
        Command::Replay(args) => run_replay_command(args, settings),
        Command::Config => settings.to_toml().map(|toml| print!("{toml}")),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run_replay_command(args: &ReplayArgs, settings: Settings) -> Result<()> {
    let script = load_script(&args.script)?;
    let mut config = settings.autosave;
    if let Some(ms) = args.quiet_period_ms {
        config.quiet_period_ms = ms;
    }
    if let Some(ms) = args.max_wait_ms {
        config.max_wait_ms = Some(ms);
    }
    if args.rearm_on_failure {
        config.on_failure = FailurePolicy::Rearm;
    }

    // One cooperative event loop, like the page the session models.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    let report = runtime.block_on(run_replay(script, config))?;

    print_summary(&report);
    if args.json {
        let document = serde_json::to_string_pretty(&report.final_document)
            .context("failed to serialize document")?;
        println!("{document}");
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
