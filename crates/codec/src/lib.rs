//! # Vector Codec
//!
//! Quantizes floating-point embedding vectors into a compact, fixed-width
//! byte encoding and back, and defines the text wire format used everywhere
//! else in the system: `"0x"` + two lowercase hex digits per byte, no
//! separators.
//!
//! Each component is clamped to `[0, 1]` and mapped onto a 1/255 grid, so
//! round-tripping through [`encode`]/[`decode`] carries at most 1/255
//! absolute error per component. The byte representation itself round-trips
//! through hex losslessly. This trades bounded precision loss for a compact,
//! text-transportable, content-address-friendly representation.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors surfaced by the codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input vector cannot be encoded (e.g. it is empty).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A hex string does not decode to a byte sequence.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),
}

/// A quantized embedding: one unsigned byte per dimension.
///
/// The length is the embedding dimensionality and is fixed for the life of
/// the process by the embedding provider's configured output size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedVector(Vec<u8>);

impl EncodedVector {
    /// Wrap raw quantized bytes without re-quantizing.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The quantized bytes, one per embedding dimension.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize as the canonical wire string: `0x` + lowercase hex, two
    /// digits per byte, no separators.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// Parse the wire string produced by [`to_hex`](Self::to_hex). The `0x`
    /// prefix is optional; digit case is ignored.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() % 2 != 0 {
            return Err(CodecError::MalformedEncoding(format!(
                "odd number of hex digits ({})",
                digits.len()
            )));
        }
        let bytes = hex::decode(digits)
            .map_err(|err| CodecError::MalformedEncoding(err.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for EncodedVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for EncodedVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

struct EncodedVectorVisitor;

impl Visitor<'_> for EncodedVectorVisitor {
    type Value = EncodedVector;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 0x-prefixed hex string, two digits per dimension")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        EncodedVector::from_hex(value).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for EncodedVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(EncodedVectorVisitor)
    }
}

/// Quantize a floating-point vector onto the 1/255 byte grid.
///
/// Each component is clamped to `[0, 1]`, scaled by 255, rounded, and
/// clipped to `[0, 255]`. Fails with [`CodecError::InvalidInput`] when `v`
/// is empty, since a zero-dimension fingerprint is never meaningful.
pub fn encode(v: &[f64]) -> Result<EncodedVector, CodecError> {
    if v.is_empty() {
        return Err(CodecError::InvalidInput(
            "cannot encode an empty vector".into(),
        ));
    }
    let bytes = v
        .iter()
        .map(|&x| (x.clamp(0.0, 1.0) * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();
    Ok(EncodedVector(bytes))
}

/// Expand a quantized vector back to floats: `byte / 255.0` per dimension.
pub fn decode(e: &EncodedVector) -> Vec<f64> {
    e.0.iter().map(|&b| f64::from(b) / 255.0).collect()
}
