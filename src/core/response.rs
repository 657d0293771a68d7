//! Typed response bodies returned by the search backend.
//!
//! Only the envelope is typed; hit documents and field mappings stay as
//! raw JSON values because their shape is index-specific.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A search response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Time the backend spent on the query, in milliseconds.
    #[serde(default)]
    pub took: u64,

    /// Whether the query timed out on the backend side.
    #[serde(default)]
    pub timed_out: bool,

    /// The matched documents.
    pub hits: SearchHits,
}

impl SearchResponse {
    /// Returns the number of hits carried in this response page.
    pub fn len(&self) -> usize {
        self.hits.hits.len()
    }

    /// Returns `true` if this response page carries no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }

    /// Returns the total number of matching documents, when reported.
    pub fn total(&self) -> Option<u64> {
        self.hits.total.as_ref().map(|t| t.value)
    }
}

/// The hits section of a search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHits {
    /// Total match count, when the backend reports one.
    #[serde(default)]
    pub total: Option<TotalHits>,

    /// Highest relevance score across the matched documents.
    #[serde(default)]
    pub max_score: Option<f64>,

    /// The matched documents for this page.
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// Total match count with its accuracy relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalHits {
    /// Number of matching documents.
    pub value: u64,

    /// `"eq"` for an exact count, `"gte"` for a lower bound.
    #[serde(default = "default_relation")]
    pub relation: String,
}

fn default_relation() -> String {
    "eq".to_string()
}

/// A single matched document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Index the document lives in.
    #[serde(rename = "_index")]
    pub index: String,

    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Relevance score; absent when sorting suppresses scoring.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    /// The document body.
    #[serde(rename = "_source", default)]
    pub source: serde_json::Value,
}

/// A field-mapping response, keyed by concrete index name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingResponse {
    /// Mapping definition per index, as returned by the backend.
    #[serde(flatten)]
    pub indices: HashMap<String, serde_json::Value>,
}

impl MappingResponse {
    /// Returns the concrete index names covered by this response.
    pub fn index_names(&self) -> Vec<&str> {
        self.indices.keys().map(String::as_str).collect()
    }

    /// Returns the `properties` object for one index, if present.
    pub fn properties(&self, index: &str) -> Option<&serde_json::Value> {
        self.indices
            .get(index)
            .and_then(|m| m.pointer("/mappings/properties"))
    }
}
