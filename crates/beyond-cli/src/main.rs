mod apps;
mod commands;
mod config;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use apps::AppKind;
use config::{Config, FileConfig, Overrides};

#[derive(Parser)]
#[command(name = "beyond")]
#[command(about = "Server-driven UI runtime: render demo apps and dispatch events over JSON lines")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (defaults to ./beyond.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Demo application to run
    #[arg(long, global = true, value_enum)]
    app: Option<AppKind>,

    /// Pretty-print JSON responses (`--pretty=false` overrides the config file)
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pretty: Option<bool>,

    /// Key candidates drawn per callback before a render fails
    #[arg(long, global = true)]
    key_attempts: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the initial tree
    Render,

    /// Read events from stdin, answer each with a fresh tree on stdout
    Serve,

    /// Feed a JSON-lines event file through a session
    Replay {
        /// Event script; keys may use `$<event>:<n>` placeholders
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let (file, source) = FileConfig::discover(cli.config.as_deref())?;
    if let Some(path) = &source {
        log::debug!("loaded config from {}", path.display());
    }
    let config = Config::resolve(
        file,
        &Overrides {
            app: cli.app,
            pretty: cli.pretty,
            key_attempts: cli.key_attempts,
        },
    );

    match cli.command {
        Commands::Render => commands::render::run(&config)?,
        Commands::Serve => commands::serve::run(&config)?,
        Commands::Replay { file } => commands::replay::run(&config, &file)?,
    }

    Ok(())
}
