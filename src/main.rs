//! Crossmodel - unified CLI entrypoint.
//!
//! Usage:
//!   crossmodel resolve --model <uuid> --token <token>... [--fixture state.toml]
//!   crossmodel subnets [--format json]
//!   crossmodel watch [--follow]
//!   crossmodel config validate [config/crossmodel.toml]

use anyhow::Result;
use clap::Parser;
use crossmodel::cli::commands::{load_config, run_config, run_resolve, run_subnets, run_watch};
use crossmodel::cli::{Cli, Commands};
use crossmodel::config::{Config, ConfigOverrides};
use crossmodel::core::telemetry::init_tracing;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        log_level: cli.log_level,
        fixture: cli.fixture,
    };
    let config_path = cli.config.map(PathBuf::from);
    let load = || -> Result<Config> {
        let config = load_config(config_path.as_deref(), &overrides)?;
        init_tracing(&config.telemetry.log_level);
        Ok(config)
    };

    match cli.command {
        Commands::Resolve(args) => run_resolve(&load()?, args),
        Commands::Subnets(args) => run_subnets(&load()?, args),
        Commands::Watch(args) => run_watch(&load()?, args).await,
        Commands::Config(args) => run_config(args),
    }
}
