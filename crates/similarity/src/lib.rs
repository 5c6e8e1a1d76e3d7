//! # Similarity Engine
//!
//! Pure, stateless scoring: cosine similarity between float vectors and a
//! ranked ordering over quantized candidates. Repeated identical calls are
//! reproducible bit-for-bit; there is no caching and no hidden state.
//!
//! Dimensionality is never reconciled silently. Comparing vectors of
//! different lengths is a hard [`SimilarityError::DimensionMismatch`], since
//! a truncated comparison produces scores that look valid but mean nothing.

use std::cmp::Ordering;

use codec::EncodedVector;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the similarity engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimilarityError {
    /// The two vectors being compared have different dimensionality.
    #[error("dimension mismatch: left vector has {left} components, right has {right}")]
    DimensionMismatch { left: usize, right: usize },
}

/// A scored candidate: the item paired with its cosine similarity to the
/// query, in `[-1, 1]`. Transient; recomputed per query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<T> {
    #[serde(flatten)]
    pub item: T,
    pub similarity: f64,
}

/// Cosine of the angle between `a` and `b`: `dot / (‖a‖·‖b‖)`.
///
/// Defined only for equal lengths. When either norm is zero the result is
/// `NaN`; callers must treat `NaN` as incomparable (it sorts last in
/// [`rank_by_similarity`]).
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Decode each candidate vector, score it against `query`, and return the
/// results sorted by similarity descending.
///
/// The sort is stable: ties keep the candidates' original order, and `NaN`
/// scores (zero-norm vectors) sort after every comparable score. Any
/// candidate whose decoded length differs from `query` aborts the whole
/// ranking with [`SimilarityError::DimensionMismatch`].
pub fn rank_by_similarity<T>(
    query: &[f64],
    candidates: impl IntoIterator<Item = (T, EncodedVector)>,
) -> Result<Vec<SearchResult<T>>, SimilarityError> {
    let mut results = Vec::new();
    for (item, encoded) in candidates {
        let decoded = codec::decode(&encoded);
        let similarity = cosine_similarity(query, &decoded)?;
        results.push(SearchResult { item, similarity });
    }
    results.sort_by(|a, b| match b.similarity.partial_cmp(&a.similarity) {
        Some(ord) => ord,
        // partial_cmp is None only when at least one side is NaN.
        None => match (a.similarity.is_nan(), b.similarity.is_nan()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => Ordering::Equal,
        },
    });
    Ok(results)
}
