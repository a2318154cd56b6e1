// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Named collections of text embeddings stored in SQLite, with exhaustive
//! similarity search over each collection.

pub mod collection;
pub mod config;
pub mod core;
pub mod error;
pub mod model;
pub mod search;
pub mod store;

pub use collection::{Collection, CollectionOptions};
pub use config::{StoreConfig, DEFAULT_SIMILAR_LIMIT};
pub use error::{CollectionError, ErrorKind, Result};
pub use model::{EmbeddingModel, ModelRegistry, StaticModelRegistry};
pub use search::SimilarityEngine;
pub use store::EmbeddingStore;
