//! Watch command implementation.

use super::open_api;
use crate::core::config::Config;
use anyhow::Result;
use clap::Args;

/// Subscribe to subnet changes.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Keep printing changes until interrupted.
    #[arg(long)]
    pub follow: bool,
}

/// Run the watch command.
pub async fn run_watch(config: &Config, args: WatchArgs) -> Result<()> {
    let api = open_api(config)?;
    let result = api.watch_subnets().await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(ref error) = result.error {
        anyhow::bail!("cannot watch subnets: {}", error.message);
    }
    if !args.follow {
        api.stop_watcher(&result.watcher_id)?;
        return Ok(());
    }

    loop {
        tokio::select! {
            changes = api.next_subnet_changes(&result.watcher_id) => {
                println!("{}", serde_json::to_string(&changes?)?);
            }
            _ = tokio::signal::ctrl_c() => {
                api.stop_watcher(&result.watcher_id)?;
                return Ok(());
            }
        }
    }
}
