// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model capability
//!
//! The crate never computes embeddings itself. A model turns text into a vector
//! and a registry resolves a model from its identifier. Both are injected by the
//! caller, so any local or remote embedding backend can be plugged in.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CollectionError, Result};

/// Turns text into a vector.
pub trait EmbeddingModel: Send + Sync {
    /// Stable identifier recorded against every collection this model fills.
    fn model_id(&self) -> &str;

    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Resolves an embedding model from its identifier.
pub trait ModelRegistry: Send + Sync {
    /// Fails with [`CollectionError::UnknownModel`] for an unrecognized identifier.
    fn get(&self, model_id: &str) -> Result<Arc<dyn EmbeddingModel>>;
}

/// Registry over a fixed set of models known up front.
#[derive(Default, Clone)]
pub struct StaticModelRegistry {
    models: HashMap<String, Arc<dyn EmbeddingModel>>,
}

impl StaticModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: Arc<dyn EmbeddingModel>) {
        self.models.insert(model.model_id().to_string(), model);
    }

    pub fn with_model(mut self, model: Arc<dyn EmbeddingModel>) -> Self {
        self.register(model);
        self
    }

    pub fn model_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.models.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl ModelRegistry for StaticModelRegistry {
    fn get(&self, model_id: &str) -> Result<Arc<dyn EmbeddingModel>> {
        self.models
            .get(model_id)
            .cloned()
            .ok_or_else(|| CollectionError::UnknownModel(model_id.to_string()))
    }
}
