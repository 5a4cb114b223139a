//! # ArchivesSpace Domain
//!
//! Domain types and models for the ArchivesSpace API client.
//!
//! This crate contains:
//! - The error taxonomy and `Result` alias
//! - Configuration structures
//! - Typed fragments of ArchivesSpace records (refs, tree nodes,
//!   digital-object payloads)
//! - Pure record-formatting helpers (display strings, dates, notes)
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O; everything here operates on values already in memory

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
