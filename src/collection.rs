// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Named collections of embeddings
//!
//! A [`Collection`] is a handle onto one row of the `collections` table. Opening a
//! handle resolves (or creates) that row, so `id` and `model_id` are always known
//! once construction succeeds.

use std::cell::OnceCell;
use std::sync::Arc;

use tracing::debug;

use crate::core::codec;
use crate::core::types::{EmbeddingRecord, Metadata, SearchResult};
use crate::error::{CollectionError, Result};
use crate::model::{EmbeddingModel, ModelRegistry};
use crate::search::SimilarityEngine;
use crate::store::EmbeddingStore;

/// How a collection picks the model that computes its vectors.
#[derive(Default, Clone)]
pub struct CollectionOptions {
    pub model: Option<Arc<dyn EmbeddingModel>>,
    pub model_id: Option<String>,
}

impl CollectionOptions {
    pub fn with_model(model: Arc<dyn EmbeddingModel>) -> Self {
        Self {
            model: Some(model),
            model_id: None,
        }
    }

    pub fn with_model_id(model_id: impl Into<String>) -> Self {
        Self {
            model: None,
            model_id: Some(model_id.into()),
        }
    }
}

pub struct Collection<'a> {
    store: &'a EmbeddingStore,
    registry: &'a dyn ModelRegistry,
    name: String,
    id: i64,
    /// Model recorded on the collection row.
    model_id: String,
    /// Identifier the caller asked for, used to look up a model when none is bound.
    requested_model_id: Option<String>,
    model: OnceCell<Arc<dyn EmbeddingModel>>,
}

impl<'a> Collection<'a> {
    /// Open `name`, creating its row if this is the first use.
    ///
    /// Fails immediately when both a model and a model id are given and disagree.
    pub fn open(
        store: &'a EmbeddingStore,
        registry: &'a dyn ModelRegistry,
        name: impl Into<String>,
        options: CollectionOptions,
    ) -> Result<Self> {
        let name = name.into();

        if let (Some(model), Some(model_id)) = (&options.model, &options.model_id) {
            if model.model_id() != model_id {
                return Err(CollectionError::ModelMismatch {
                    bound: model.model_id().to_string(),
                    requested: model_id.clone(),
                });
            }
        }

        let mut loaded = options.model;
        let info = store.resolve_or_create(&name, || {
            let created_with = match loaded.clone() {
                Some(bound) => bound,
                None => {
                    let model = load_model(registry, options.model_id.as_deref())?;
                    loaded = Some(model.clone());
                    model
                }
            };
            Ok(created_with.model_id().to_string())
        })?;

        let model = match loaded {
            Some(model) => OnceCell::from(model),
            None => OnceCell::new(),
        };

        debug!(
            "Opened collection {} (id {}, model {})",
            info.name, info.id, info.model_id
        );

        Ok(Self {
            store,
            registry,
            name,
            id: info.id,
            model_id: info.model_id,
            requested_model_id: options.model_id,
            model,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Model identity stored on the collection row.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// The model used to compute new vectors.
    ///
    /// A bound model wins, then the caller's requested id, then the stored id.
    pub fn model(&self) -> Result<Arc<dyn EmbeddingModel>> {
        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }
        let wanted = self
            .requested_model_id
            .as_deref()
            .unwrap_or(self.model_id.as_str());
        let model = load_model(self.registry, Some(wanted))?;
        Ok(self.model.get_or_init(|| model).clone())
    }

    pub fn exists(&self) -> Result<bool> {
        self.store.exists(&self.name)
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count(&self.name)
    }

    /// Embed `text` and store it under `id`.
    ///
    /// The text itself is kept only when `store` is set. Empty metadata is not written.
    pub fn embed(
        &self,
        id: &str,
        text: &str,
        metadata: Option<&Metadata>,
        store: bool,
    ) -> Result<()> {
        let vector = self.model()?.embed(text)?;
        self.store.insert_embedding(
            self.id,
            id,
            &codec::encode(&vector),
            if store { Some(text) } else { None },
            metadata,
        )
    }

    /// Batched embedding is not supported.
    pub fn embed_multi(&self, _items: &[(&str, &str)], _store: bool) -> Result<()> {
        Err(CollectionError::Unsupported("embed_multi"))
    }

    /// Batched embedding is not supported.
    pub fn embed_multi_with_metadata(&self, _items: &[(&str, &str, Metadata)]) -> Result<()> {
        Err(CollectionError::Unsupported("embed_multi_with_metadata"))
    }

    pub fn fetch(&self, id: &str) -> Result<EmbeddingRecord> {
        self.store.fetch_record(self.id, id)
    }

    pub fn similar_by_vector(
        &self,
        vector: &[f32],
        limit: usize,
        skip_id: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        SimilarityEngine::new(self.store).search(self.id, vector, limit, skip_id)
    }

    pub fn similar_by_id(&self, id: &str, limit: usize) -> Result<Vec<SearchResult>> {
        SimilarityEngine::new(self.store).search_by_id(self.id, id, limit)
    }

    pub fn similar(&self, text: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let model = self.model()?;
        SimilarityEngine::new(self.store).search_by_text(self.id, text, limit, |t| model.embed(t))
    }
}

fn load_model(
    registry: &dyn ModelRegistry,
    model_id: Option<&str>,
) -> Result<Arc<dyn EmbeddingModel>> {
    match model_id {
        Some(id) => registry.get(id),
        None => Err(CollectionError::Configuration(
            "No model specified and none found".to_string(),
        )),
    }
}
