//! Documents and the result payload shared by the cache and the store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Error;

/// A stored record: field name to JSON value.
pub type Document = Map<String, Value>;

/// The answer to a filter query: `{ "results": [ ... ] }`.
///
/// Produced either freshly from the document store or decoded verbatim from
/// the cache. Results keep store order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    pub results: Vec<Document>,
}

impl ResultDocument {
    pub fn new(results: Vec<Document>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Encode as the compact JSON string stored in the cache.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error::Encode(e.to_string()))
    }

    /// Encode as indented JSON for display.
    pub fn to_json_pretty(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Encode(e.to_string()))
    }

    /// Decode a cached payload.
    pub fn from_json(payload: &str) -> Result<Self, Error> {
        serde_json::from_str(payload).map_err(|e| Error::Decode(e.to_string()))
    }
}
