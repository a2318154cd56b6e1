// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Exhaustive nearest-neighbor search
//!
//! Every query decodes and scores every stored vector in the collection, then keeps
//! the best `limit`. No index is built or cached between calls.

use tracing::debug;

use crate::core::codec;
use crate::core::types::SearchResult;
use crate::core::vector_ops::{top_k, CosineSimilarity, Scorer};
use crate::error::Result;
use crate::store::EmbeddingStore;

pub struct SimilarityEngine<'a> {
    store: &'a EmbeddingStore,
    scorer: Box<dyn Scorer + 'a>,
}

impl<'a> SimilarityEngine<'a> {
    /// Engine scoring with cosine similarity.
    pub fn new(store: &'a EmbeddingStore) -> Self {
        Self::with_scorer(store, CosineSimilarity)
    }

    pub fn with_scorer(store: &'a EmbeddingStore, scorer: impl Scorer + 'a) -> Self {
        Self {
            store,
            scorer: Box::new(scorer),
        }
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Rank the collection's vectors against `query`, best first.
    ///
    /// An empty collection yields an empty result.
    pub fn search(
        &self,
        collection_id: i64,
        query: &[f32],
        limit: usize,
        exclude_id: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        let mut scored = Vec::new();
        let scanned = self
            .store
            .for_each_embedding(collection_id, exclude_id, |id, blob| {
                let vector = codec::decode(blob)?;
                let score = self.scorer.score(query, &vector)?;
                scored.push(SearchResult::new(id, score));
                Ok(())
            })?;

        debug!(
            "Scored {} vectors in collection {} with {}",
            scanned,
            collection_id,
            self.scorer.name()
        );

        Ok(top_k(scored, limit))
    }

    /// Neighbors of a stored vector, never including the vector itself.
    pub fn search_by_id(
        &self,
        collection_id: i64,
        id: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let encoded = self.store.fetch_embedding(collection_id, id)?;
        let query = codec::decode(&encoded)?;
        self.search(collection_id, &query, limit, Some(id))
    }

    /// Embed `text` with `embed` and search with the result.
    pub fn search_by_text<F>(
        &self,
        collection_id: i64,
        text: &str,
        limit: usize,
        embed: F,
    ) -> Result<Vec<SearchResult>>
    where
        F: FnOnce(&str) -> Result<Vec<f32>>,
    {
        let query = embed(text)?;
        self.search(collection_id, &query, limit, None)
    }
}
