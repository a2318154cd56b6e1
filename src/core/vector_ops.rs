// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use crate::core::types::SearchResult;
use crate::error::{CollectionError, Result};

/// Scores a stored vector against a query. Higher means more similar.
pub trait Scorer: Send + Sync {
    fn score(&self, query: &[f32], other: &[f32]) -> Result<f32>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

#[derive(Debug, Clone, Copy, Default)]
pub struct DotProduct;

/// Negated Euclidean distance, so that closer vectors rank higher.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanSimilarity;

impl Scorer for CosineSimilarity {
    fn score(&self, query: &[f32], other: &[f32]) -> Result<f32> {
        check_dimensions(query, other)?;
        Ok(cosine_similarity(query, other))
    }

    fn name(&self) -> &'static str {
        "cosine"
    }
}

impl Scorer for DotProduct {
    fn score(&self, query: &[f32], other: &[f32]) -> Result<f32> {
        check_dimensions(query, other)?;
        Ok(dot_product_scalar(query, other))
    }

    fn name(&self) -> &'static str {
        "dot"
    }
}

impl Scorer for EuclideanSimilarity {
    fn score(&self, query: &[f32], other: &[f32]) -> Result<f32> {
        check_dimensions(query, other)?;
        Ok(-euclidean_distance(query, other))
    }

    fn name(&self) -> &'static str {
        "euclidean"
    }
}

fn check_dimensions(a: &[f32], b: &[f32]) -> Result<()> {
    if a.is_empty() || b.is_empty() {
        return Err(CollectionError::EmptyVector);
    }
    if a.len() != b.len() {
        return Err(CollectionError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

pub fn dot_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub fn magnitude(a: &[f32]) -> f32 {
    a.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Zero-magnitude inputs score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mag_a = magnitude(a);
    let mag_b = magnitude(b);

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot_product_scalar(a, b) / (mag_a * mag_b)
}

pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Keep the best `k` results, preserving input order among equal scores.
pub fn top_k(mut results: Vec<SearchResult>, k: usize) -> Vec<SearchResult> {
    results.sort_by(SearchResult::rank);
    results.truncate(k);
    results
}
