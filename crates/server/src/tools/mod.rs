//! MCP tool implementations.
//!
//! This module contains all tools exposed by the readthru server.

pub mod cache;
pub mod fixtures_generate;
pub mod fixtures_query;

pub use fixtures_generate::{FixturesGenerateParams, generate_impl};
pub use fixtures_query::{FixturesQueryParams, query_impl};
