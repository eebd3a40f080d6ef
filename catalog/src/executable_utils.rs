use clap::Parser;
use common::config::Config;
use std::error::Error;

use crate::commands::Command;

#[derive(Parser, Debug)]
#[command(author, version, about = "Administer the product catalog", long_about = None)]
pub struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "catalog/config/dev.yaml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Parses the command line and loads the configuration it points at,
/// with `DATABASE_URL` / `LOG_LEVEL` from the environment taking precedence.
pub fn initialize_executable() -> Result<(Args, Config), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();
    let config = Config::load(&args.config)
        .map_err(|e| format!("Failed to load config from {}: {}", args.config, e))?
        .with_env_overrides();
    Ok((args, config))
}

pub fn initialize_tracing(log_level: &str) {
    let directive: tracing_subscriber::filter::Directive = log_level
        .parse()
        .unwrap_or_else(|_| tracing::Level::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive),
        )
        .with_writer(std::io::stderr)
        .init();
}
