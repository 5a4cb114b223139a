//! # ArchivesSpace Client
//!
//! Async client for the ArchivesSpace REST API.
//!
//! This crate contains:
//! - The [`AspaceClient`] and its endpoint methods
//! - HTTP transport with bounded retry
//! - Configuration loading (environment, then config files)
//! - Session login/logout against the backend
//!
//! ## Architecture
//! - Domain types and errors come from `aspace-domain`
//! - Contains all "impure" code (HTTP, filesystem, environment)
//!
//! ## Example
//! ```no_run
//! use aspace_client::{config, AspaceClient};
//!
//! # async fn example() -> aspace_domain::Result<()> {
//! let config = config::load(None)?;
//! let client = AspaceClient::connect(config).await?;
//! let record = client.get_archival_object(1234).await?;
//! println!("{}", record["display_string"]);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod session;

// Re-export commonly used items
pub use client::{AspaceClient, EadExportOptions};
pub use http::{HttpClient, HttpClientBuilder};
