//! Cache-related MCP tools.

pub mod invalidate;

pub use invalidate::{CacheInvalidateParams, invalidate_impl};
