//! Source-of-truth side of readthru.
//!
//! This crate provides the SQLite document store, the synthetic season
//! generator, and the wiring shared by the server and the CLI.

pub mod docstore;
pub mod generate;
pub mod services;

pub use docstore::DocumentDb;
pub use generate::{Regeneration, SeasonGenerator, replace_collection};
pub use services::Services;
