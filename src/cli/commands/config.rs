//! Config command implementation.

use crate::core::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// Configuration operations.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate configuration file.
    Validate {
        /// Config file path.
        #[arg(default_value = super::DEFAULT_CONFIG_PATH)]
        path: PathBuf,
    },
    /// Print configuration with defaults.
    Show {
        /// Config file path.
        #[arg(default_value = super::DEFAULT_CONFIG_PATH)]
        path: PathBuf,
        /// Output format (toml, json).
        #[arg(long, default_value = "toml")]
        format: String,
    },
    /// Generate a configuration template.
    Generate {
        /// Output file path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the config command.
pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Validate { path } => validate_config(&path),
        ConfigCommand::Show { path, format } => show_config(&path, &format),
        ConfigCommand::Generate { output } => generate_config(output.as_deref()),
    }
}

fn validate_config(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {:?}", path);
    }
    let config = Config::from_file(path)?;

    println!("✓ Configuration is valid");
    if config.state.fixture.is_none() {
        println!("  ⚠ Warning: state.fixture not set; resolve/subnets/watch need --fixture");
    }
    if !config.ingress.exclude_catch_all {
        println!("  ⚠ Warning: ingress.exclude_catch_all is off; 0.0.0.0/0 may be opened");
    }
    if !config.auth.controller {
        println!("  ⚠ Warning: auth.controller is off; facade calls will be denied");
    }
    Ok(())
}

fn show_config(path: &Path, format: &str) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {:?}", path);
    }
    let config = Config::from_file(path)?;
    println!("{}", render_config(&config, format)?);
    Ok(())
}

fn render_config(config: &Config, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(config)?),
        "toml" => Ok(toml::to_string_pretty(config)?),
        other => anyhow::bail!("unknown format {other:?} (expected toml or json)"),
    }
}

fn generate_config(output: Option<&Path>) -> Result<()> {
    let template = generate_template();
    match output {
        Some(path) => {
            std::fs::write(path, &template)?;
            println!("Generated config template: {:?}", path);
        }
        None => println!("{}", template),
    }
    Ok(())
}

fn generate_template() -> String {
    r#"# Crossmodel Configuration

[ingress]
exclude_catch_all = true
exclude_loopback = true
exclude_multicast = false

[telemetry]
log_level = "info"

[state]
fixture = "config/state.toml"

[auth]
controller = true
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses() {
        let config = Config::from_toml(&generate_template()).unwrap();
        assert_eq!(config.state.fixture.as_deref(), Some("config/state.toml"));
        assert!(config.ingress.exclude_loopback);
    }

    #[test]
    fn test_render_config_formats() {
        let config = Config::default();
        assert!(render_config(&config, "toml")
            .unwrap()
            .contains("[ingress]"));
        assert!(render_config(&config, "json")
            .unwrap()
            .contains("\"exclude_catch_all\": true"));
        assert!(render_config(&config, "yaml").is_err());
    }
}
