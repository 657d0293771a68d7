//! Core types shared across the library.
//!
//! This module contains the error classification and the typed response
//! envelopes. Everything else builds on these.

mod error;
mod response;

pub use error::{SearchError, SearchResult};
pub use response::{MappingResponse, SearchHit, SearchHits, SearchResponse, TotalHits};
