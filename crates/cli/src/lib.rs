pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quoteboard_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "quoteboard",
    about = "Quoteboard quote browser",
    long_about = "Browse, like, filter, and add quotes from the terminal, and inspect the loaded catalog and configuration.",
    after_help = "Examples:\n  quoteboard browse\n  quoteboard browse --seed 7 --script demo.txt\n  quoteboard list --json\n  quoteboard doctor"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a quoteboard.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive browsing session reading commands from stdin")]
    Browse {
        #[arg(long, help = "Seed the random picker for reproducible sessions")]
        seed: Option<u64>,
        #[arg(long, help = "Read session commands from a file instead of stdin")]
        script: Option<PathBuf>,
    },
    #[command(about = "Print the loaded quote catalog")]
    List {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate configuration and catalog loading")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let seed = match &cli.command {
        Command::Browse { seed, .. } => *seed,
        _ => None,
    };
    let options = load_options(cli.config.clone(), seed);
    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Browse { script, .. } => commands::browse::run(options, script.as_deref()),
        Command::List { json } => commands::list::run(options, json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(options) }
        }
        Command::Doctor { json } => commands::doctor::run(options, json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

pub fn load_options(config_path: Option<PathBuf>, rng_seed: Option<u64>) -> LoadOptions {
    LoadOptions {
        config_path,
        require_file: false,
        overrides: ConfigOverrides { rng_seed, ..ConfigOverrides::default() },
    }
}

/// Logs go to stderr; stdout carries rendered frames and command output.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
