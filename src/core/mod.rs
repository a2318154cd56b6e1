// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

pub mod codec;
pub mod types;
pub mod vector_ops;

pub use codec::{decode, encode, DecodeError};
pub use types::{CollectionInfo, EmbeddingRecord, Metadata, SearchResult};
pub use vector_ops::{CosineSimilarity, DotProduct, EuclideanSimilarity, Scorer};
