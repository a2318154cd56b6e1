// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CollectionError, Result};

/// Result count used when callers do not pick one.
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Database file; `None` opens an in-memory database.
    pub path: Option<PathBuf>,
    pub busy_timeout: Duration,
    pub default_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout: Duration::from_millis(5000),
            default_limit: DEFAULT_SIMILAR_LIMIT,
        }
    }
}

impl StoreConfig {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let path = match env::var("EMBEDDINGS_DB_PATH") {
            Ok(p) if p == IN_MEMORY_PATH => None,
            Ok(p) if p.trim().is_empty() => {
                return Err(CollectionError::Configuration(
                    "EMBEDDINGS_DB_PATH is set but empty".to_string(),
                ))
            }
            Ok(p) => Some(PathBuf::from(p)),
            Err(_) => None,
        };

        let busy_timeout = env::var("EMBEDDINGS_BUSY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.busy_timeout);

        let default_limit = env::var("EMBEDDINGS_DEFAULT_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.default_limit);

        let config = Self {
            path,
            busy_timeout,
            default_limit,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 {
            return Err(CollectionError::Configuration(
                "default result limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
