//! # underdog-sdk
//!
//! A Rust SDK for the [Underdog Protocol](https://underdogprotocol.com) NFT API.
//!
//! Underdog mints and manages Solana NFTs behind a versioned REST API. This crate
//! has three parts:
//! - **Client**: one typed async method per REST endpoint
//! - **Queries**: cached, keyed, re-fetchable reads with status polling
//! - **Proxy**: an `axum` route that forwards browser-safe requests and injects
//!   the secret API key server-side
//!
//! ## Quick Navigation
//!
//! | Module | Description | Common Use Cases |
//! |--------|-------------|------------------|
//! | [`client`] | Configuration, base URL and auth | Build a client for mainnet, devnet or a proxy |
//! | [`client::http`] | Endpoint methods | Create projects, mint NFTs, manage webhooks |
//! | [`client::paths`] | Path grammar | Inspect the exact path of a request |
//! | [`client::types`] | Request and response types | Params, queries, bodies, responses |
//! | [`query`] | Cached queries | Deduplicated reads, wait for a project to finish |
//! | [`proxy`] | Forwarding route | Keep the API key off the browser |
//!
//! ## Getting Started
//!
//! ### Installation
//!
//! ```toml
//! [dependencies]
//! underdog-sdk = "0.2"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ### Your First Query
//!
//! ```no_run
//! use underdog_sdk::client::types::PageQuery;
//!
//! #[tokio::main]
//! async fn main() -> underdog_sdk::Result<()> {
//!     let client = underdog_sdk::devnet("my-api-key")?;
//!     let projects = client.get_all_projects(&PageQuery::default()).await?;
//!
//!     for project in projects.results {
//!         println!("{:?}: {:?}", project.id(), project.name());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Waiting for a Project
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use underdog_sdk::{
//!     client::types::{PageQuery, ProjectParams},
//!     query::Queries,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let queries = Queries::new(Arc::new(underdog_sdk::devnet("my-api-key")?));
//! let mut updates = queries
//!     .project(ProjectParams::new(1), PageQuery::default())
//!     .watch();
//!
//! while updates.changed().await.is_ok() {
//!     let state = updates.borrow_and_update().clone();
//!     if let Some(project) = state.data {
//!         println!("status: {:?}", project.status());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture Overview
//!
//! ```text
//! caller ──► Queries ──► Client ──► Transport ──► Underdog API
//!              │            │
//!              │            └─ proxy mode ──► /api/underdog ──► proxy ──► Underdog API
//!              └─ moka cache keyed by [resource, request, network]
//! ```
//!
//! ## Design Choices
//!
//! - Response bodies are passed through unmodified. Typed structs name the
//!   fields callers usually need and keep everything else in `rest`.
//! - The [`client::Transport`] trait is the only HTTP seam, so tests and
//!   embedders can swap the network layer without global state.
//! - There is no process-wide client: [`query::Queries`] is constructed
//!   explicitly around the client it should use.

pub mod client;
pub mod error;
pub mod proxy;
pub mod query;

pub use client::{Client, ClientConfig, Network};
pub use error::{Error, Result};

/// Creates a mainnet client authenticated with `api_key`.
///
/// # Example
///
/// ```
/// let client = underdog_sdk::mainnet("my-api-key").unwrap();
/// assert_eq!(client.base_url(), underdog_sdk::client::MAINNET_API_URL);
/// ```
pub fn mainnet(api_key: impl Into<String>) -> Result<Client> {
    Client::new(
        ClientConfig::default()
            .with_network(Network::Mainnet)
            .with_api_key(api_key),
    )
}

/// Creates a devnet client authenticated with `api_key`.
pub fn devnet(api_key: impl Into<String>) -> Result<Client> {
    Client::new(
        ClientConfig::default()
            .with_network(Network::Devnet)
            .with_api_key(api_key),
    )
}
