//! Crossmodel - cross-model relation ingress resolution.
//!
//! When an application in one model consumes an offer from another model,
//! the offering side must open its firewall to the consumer's networks.
//! This crate answers, for a relation identified by an opaque cross-model
//! token, which of the local model's subnets should be granted ingress.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Remote Firewaller Facade                       │
//! │   batch ingress queries │ subnet watches │ controller-only auth │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Ingress Resolver                          │
//! │       role matching │ local endpoint discovery │ CIDR policy    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    State Collaborators                          │
//! │  remote entities │ relations │ applications │ subnets │ watches │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! ## Core
//! - [`core::config`] - Configuration parsing and validation
//! - [`core::error`] - Error types and wire mapping
//! - [`core::telemetry`] - Tracing setup
//!
//! ## Model
//! - [`model::relation`] - Relations, endpoints and roles
//! - [`model::entity`] - Model tags and remote entity tokens
//! - [`model::subnet`] - Subnets
//!
//! ## State
//! - [`state`] - Collaborator traits
//! - [`state::memory`] - In-memory backend
//! - [`state::watcher`] - Strings watcher channel
//!
//! ## Ingress
//! - [`ingress::role`] - Relation role matcher
//! - [`ingress::policy`] - CIDR filtering
//! - [`ingress::resolver`] - Token to CIDR resolution
//!
//! ## Facade
//! - [`firewaller::api`] - Remote firewaller API
//!
//! ## Operations
//! - [`ops::metrics`] - Request metrics
//!
//! # Key Invariants
//!
//! - Ingress is only resolved when the local side of a relation is the requirer
//! - "No ingress" is a distinct result, never an error and never an empty list
//! - Zero-length prefixes never become ingress rules
//! - A failure for one token never affects other tokens in the same batch

// Core infrastructure
pub mod core;

// Domain model
pub mod model;

// State collaborators
pub mod state;

// Ingress resolution
pub mod ingress;

// Remote firewaller facade
pub mod firewaller;

// Operations
pub mod ops;

// CLI
pub mod cli;

// Re-exports for convenience
pub use self::core::{config, error};
pub use firewaller::RemoteFirewallerApi;
pub use ingress::{IngressPolicy, IngressResolver, IngressSubnetInfo};
pub use state::MemoryState;
