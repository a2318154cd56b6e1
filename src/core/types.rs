use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::codec::{self, DecodeError};

/// Opaque structured data attached to an embedding.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One stored row of the `embeddings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub collection_id: i64,
    pub id: String,
    /// Encoded vector as written by [`codec::encode`].
    pub embedding: Vec<u8>,
    pub content: Option<String>,
    pub metadata: Option<Metadata>,
}

impl EmbeddingRecord {
    pub fn vector(&self) -> Result<Vec<f32>, DecodeError> {
        codec::decode(&self.embedding)
    }
}

/// A collection row as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: i64,
    pub name: String,
    pub model_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f32,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        SearchResult {
            id: id.into(),
            score,
        }
    }

    /// Orders by descending score; NaN scores sink to the bottom.
    pub fn rank(a: &SearchResult, b: &SearchResult) -> Ordering {
        match (a.score.is_nan(), b.score.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b.score.total_cmp(&a.score),
        }
    }
}

impl From<SearchResult> for (String, f32) {
    fn from(result: SearchResult) -> Self {
        (result.id, result.score)
    }
}
