//! Command-line interface.
//!
//! Unified CLI for inspecting cross-model ingress against a state fixture.

pub mod commands;

use clap::{Parser, Subcommand};

/// Crossmodel - cross-model relation ingress resolution.
#[derive(Parser, Debug)]
#[command(name = "crossmodel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// State fixture path (overrides `state.fixture`).
    #[arg(long, global = true)]
    pub fixture: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve ingress subnets for remote entity tokens.
    Resolve(commands::ResolveArgs),
    /// List known subnets and their ingress eligibility.
    Subnets(commands::SubnetsArgs),
    /// Subscribe to subnet changes.
    Watch(commands::WatchArgs),
    /// Configuration operations.
    Config(commands::ConfigArgs),
}
