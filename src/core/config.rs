//! Configuration parsing and validation.
//!
//! Configuration is loaded from TOML files with CLI overrides. Every
//! section has defaults, so an empty file is a valid configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ingress filtering policy.
    #[serde(default)]
    pub ingress: IngressConfig,

    /// Telemetry configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// State backend configuration.
    #[serde(default)]
    pub state: StateConfig,

    /// Identity used when serving requests from the CLI.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Ingress filtering policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressConfig {
    /// Drop CIDRs with a zero-length prefix (`0.0.0.0/0`, `::/0` and
    /// anything equivalent to them).
    #[serde(default = "default_true")]
    pub exclude_catch_all: bool,

    /// Drop CIDRs whose network address is a loopback address.
    #[serde(default = "default_true")]
    pub exclude_loopback: bool,

    /// Drop CIDRs whose network address is a multicast address.
    #[serde(default)]
    pub exclude_multicast: bool,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            exclude_catch_all: true,
            exclude_loopback: true,
            exclude_multicast: false,
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// State backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateConfig {
    /// Path to a TOML state fixture loaded into the in-memory backend.
    #[serde(default)]
    pub fixture: Option<String>,
}

/// Identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether the CLI acts with controller access.
    #[serde(default = "default_true")]
    pub controller: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { controller: true }
    }
}

// Default value functions

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).with_context(|| "failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides to the configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref log_level) = overrides.log_level {
            self.telemetry.log_level = log_level.clone();
        }
        if let Some(ref fixture) = overrides.fixture {
            self.state.fixture = Some(fixture.clone());
        }
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_telemetry()?;
        self.validate_state()?;
        Ok(())
    }

    fn validate_telemetry(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "telemetry.log_level must be one of {:?}, got: {}",
                valid_levels,
                self.telemetry.log_level
            );
        }
        Ok(())
    }

    fn validate_state(&self) -> Result<()> {
        if let Some(ref fixture) = self.state.fixture {
            if fixture.trim().is_empty() {
                anyhow::bail!("state.fixture must not be empty when set");
            }
        }
        Ok(())
    }
}

/// CLI override options that can be applied to configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override log level.
    pub log_level: Option<String>,
    /// Override state fixture path.
    pub fixture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert!(config.ingress.exclude_catch_all);
        assert!(config.ingress.exclude_loopback);
        assert!(!config.ingress.exclude_multicast);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.state.fixture.is_none());
        assert!(config.auth.controller);
    }

    #[test]
    fn test_partial_ingress_section() {
        let config = Config::from_toml(
            r#"
[ingress]
exclude_multicast = true
"#,
        )
        .unwrap();
        assert!(config.ingress.exclude_catch_all);
        assert!(config.ingress.exclude_multicast);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let err = Config::from_toml(
            r#"
[telemetry]
log_level = "loud"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn test_empty_fixture_rejected() {
        assert!(Config::from_toml("[state]\nfixture = \" \"\n").is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        config.apply_overrides(&ConfigOverrides {
            log_level: Some("debug".to_string()),
            fixture: Some("state.toml".to_string()),
        });
        assert_eq!(config.telemetry.log_level, "debug");
        assert_eq!(config.state.fixture.as_deref(), Some("state.toml"));
    }
}
