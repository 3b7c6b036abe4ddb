//! CLI command implementations.

mod config;
mod resolve;
mod subnets;
mod watch;

pub use config::{run_config, ConfigArgs};
pub use resolve::{run_resolve, ResolveArgs};
pub use subnets::{run_subnets, SubnetsArgs};
pub use watch::{run_watch, WatchArgs};

use crate::core::config::{Config, ConfigOverrides};
use crate::firewaller::{RemoteFirewallerApi, Resources, StaticAuthorizer};
use crate::ingress::IngressPolicy;
use crate::state::MemoryState;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "config/crossmodel.toml";

/// Load configuration and apply CLI overrides.
///
/// A missing file is an error only when the path was given explicitly.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::from_file(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => Config::default(),
    };
    config.apply_overrides(overrides);
    config.validate()?;
    Ok(config)
}

/// Load the configured state fixture.
pub fn load_state(config: &Config) -> Result<MemoryState> {
    let fixture = config
        .state
        .fixture
        .as_deref()
        .context("no state fixture configured (set state.fixture or pass --fixture)")?;
    MemoryState::from_fixture_file(Path::new(fixture))
}

/// Build the facade over the configured state fixture.
pub fn open_api(config: &Config) -> Result<RemoteFirewallerApi<MemoryState>> {
    let state = Arc::new(load_state(config)?);
    let authorizer = if config.auth.controller {
        StaticAuthorizer::controller("machine-0")
    } else {
        StaticAuthorizer::agent("machine-0")
    };
    let api = RemoteFirewallerApi::new(
        state,
        Arc::new(Resources::new()),
        &authorizer,
        IngressPolicy::from(&config.ingress),
    )?;
    Ok(api)
}
