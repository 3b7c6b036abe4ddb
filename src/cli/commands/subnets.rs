//! Subnets command implementation.

use super::load_state;
use crate::core::config::Config;
use crate::ingress::IngressPolicy;
use crate::state::SubnetProvider;
use anyhow::Result;
use clap::Args;
use serde::Serialize;

/// List known subnets and their ingress eligibility.
#[derive(Args, Debug)]
pub struct SubnetsArgs {
    /// Output format (table, json).
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// One row of the subnets listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetRow {
    pub id: String,
    pub cidr: String,
    /// "ingress", an exclusion reason, or "invalid".
    pub status: String,
}

/// Run the subnets command.
pub fn run_subnets(config: &Config, args: SubnetsArgs) -> Result<()> {
    let state = load_state(config)?;
    let rows = subnet_rows(&state, &IngressPolicy::from(&config.ingress))?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        _ => {
            println!("{:<8} {:<43} STATUS", "ID", "CIDR");
            for row in &rows {
                println!("{:<8} {:<43} {}", row.id, row.cidr, row.status);
            }
        }
    }
    Ok(())
}

/// Classify every subnet of `provider` against `policy`.
pub fn subnet_rows<P: SubnetProvider + ?Sized>(
    provider: &P,
    policy: &IngressPolicy,
) -> Result<Vec<SubnetRow>> {
    let rows = provider
        .list_all()?
        .into_iter()
        .map(|subnet| {
            let status = match policy.classify(&subnet) {
                Ok(None) => "ingress".to_string(),
                Ok(Some(reason)) => reason.to_string(),
                Err(_) => "invalid".to_string(),
            };
            SubnetRow {
                id: subnet.id,
                cidr: subnet.cidr,
                status,
            }
        })
        .collect();
    Ok(rows)
}
