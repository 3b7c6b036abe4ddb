//! Resolve command implementation.

use super::open_api;
use crate::core::config::Config;
use crate::firewaller::{RemoteEntities, RemoteEntityId};
use anyhow::Result;
use clap::Args;

/// Resolve ingress subnets for remote entity tokens.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// UUID of the model the tokens were issued to.
    #[arg(short, long)]
    pub model: String,

    /// Remote entity token (repeatable).
    #[arg(short, long = "token", required = true)]
    pub tokens: Vec<String>,

    /// Print request metrics after the results.
    #[arg(long)]
    pub metrics: bool,
}

/// Run the resolve command.
pub fn run_resolve(config: &Config, args: ResolveArgs) -> Result<()> {
    let api = open_api(config)?;
    let request = build_request(&args);
    let results = api.ingress_subnets_for_relations(&request);

    println!("{}", serde_json::to_string_pretty(&results)?);
    if args.metrics {
        print!("{}", api.metrics().export_prometheus());
    }
    Ok(())
}

fn build_request(args: &ResolveArgs) -> RemoteEntities {
    RemoteEntities {
        entities: args
            .tokens
            .iter()
            .map(|token| RemoteEntityId::new(args.model.clone(), token.clone()))
            .collect(),
    }
}
