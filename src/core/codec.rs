// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Binary vector encoding
//!
//! Vectors are stored as a contiguous run of little-endian IEEE-754 single-precision
//! floats with no header or length prefix. Dimensionality is `byte_len / 4`.

use thiserror::Error;

const F32_WIDTH: usize = std::mem::size_of::<f32>();

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Encoded vector length {0} is not a multiple of 4")]
    InvalidLength(usize),
}

/// Encode a vector into its storage blob.
pub fn encode(vector: &[f32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(vector.len() * F32_WIDTH);
    for value in vector {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    buf
}

/// Decode a storage blob back into a vector.
pub fn decode(bytes: &[u8]) -> Result<Vec<f32>, DecodeError> {
    if bytes.len() % F32_WIDTH != 0 {
        return Err(DecodeError::InvalidLength(bytes.len()));
    }

    Ok(bytes
        .chunks_exact(F32_WIDTH)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
