//! Core types and cache-aside logic for readthru.
//!
//! This crate provides:
//! - Filters, documents and the deterministic query serializer
//! - Cache stores (SQLite and in-memory) and the document store trait
//! - The cache-aside retriever and the whole-cache invalidator
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod db;
pub mod document;
pub mod error;
pub mod filter;
pub mod invalidate;
pub mod retriever;
pub mod store;

pub use cache::{CacheDb, CacheStore, MemoryCache, cache_key};
pub use config::{AppConfig, ConfigError};
pub use document::{Document, ResultDocument};
pub use error::Error;
pub use filter::Filter;
pub use invalidate::Invalidator;
pub use retriever::{CacheAside, Lookup};
pub use store::DocumentStore;
