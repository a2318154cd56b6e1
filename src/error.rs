// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Error types shared by every layer of the crate.

use thiserror::Error;

use crate::core::codec::DecodeError;

pub type Result<T> = std::result::Result<T, CollectionError>;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("model_id does not match model.model_id: bound {bound}, requested {requested}")]
    ModelMismatch { bound: String, requested: String },

    #[error("Embedding {id:?} not found in collection {collection}")]
    NotFound { collection: i64, id: String },

    #[error("Embedding {id:?} already exists in collection {collection_id}")]
    Duplicate { collection_id: i64, id: String },

    #[error("Operation not implemented: {0}")]
    Unsupported(&'static str),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vectors must not be empty")]
    EmptyVector,

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Embedding model error: {0}")]
    Model(String),
}

/// Coarse classification callers can branch on without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    NotFound,
    Uniqueness,
    Unsupported,
    Decode,
    InvalidVector,
    Storage,
    Model,
}

impl CollectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CollectionError::Configuration(_)
            | CollectionError::UnknownModel(_)
            | CollectionError::ModelMismatch { .. } => ErrorKind::Configuration,
            CollectionError::NotFound { .. } => ErrorKind::NotFound,
            CollectionError::Duplicate { .. } => ErrorKind::Uniqueness,
            CollectionError::Unsupported(_) => ErrorKind::Unsupported,
            CollectionError::Decode(_) => ErrorKind::Decode,
            CollectionError::DimensionMismatch { .. } | CollectionError::EmptyVector => {
                ErrorKind::InvalidVector
            }
            CollectionError::Storage(_) | CollectionError::Metadata(_) => ErrorKind::Storage,
            CollectionError::Model(_) => ErrorKind::Model,
        }
    }
}
