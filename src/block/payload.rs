use std::fmt;

use serde::{Serialize, Deserialize};
use serde_json::Value as Json;

use super::Hasher;
use super::finite::{FiniteCheck, FiniteCheckError};

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Payload contains non-finite number: {0}")]
    NonFiniteNumber(f64)
}

// Tags of the canonical encoding.
const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_NUMBER: u8 = 2;
const TAG_STRING: u8 = 3;
const TAG_ARRAY: u8 = 4;
const TAG_OBJECT: u8 = 5;

/// Business data stored in a block.
///
/// Payload is an arbitrary structured value. The ledger
/// doesn't enforce any schema on it, but it guarantees that
/// two structurally equal payloads are always hashed the
/// same way (see [`Payload::canonical_bytes`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Json);

impl Payload {
    /// Convert any serializable value into a payload.
    ///
    /// This fails when the value can't be represented as a
    /// structured tree, e.g. a map with non-string keys, or
    /// when it contains NaN or infinite floats.
    pub fn new(value: impl Serialize) -> Result<Self, SerializationError> {
        // Custom errors are reported by serde_json below.
        if let Err(FiniteCheckError::NonFinite(number)) = FiniteCheck::check(&value) {
            return Err(SerializationError::NonFiniteNumber(number));
        }

        Ok(Self(serde_json::to_value(value)?))
    }

    #[inline]
    pub fn as_json(&self) -> &Json {
        &self.0
    }

    #[inline]
    pub fn into_json(self) -> Json {
        self.0
    }

    /// Deterministic byte encoding of the payload.
    ///
    /// Every value is prefixed by a type tag, and strings, numbers,
    /// arrays and objects by their u64 big-endian length, so two
    /// different trees can never produce the same byte stream.
    /// Object entries are sorted by key.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        encode(&self.0, &mut buf);

        buf
    }

    /// Feed canonical encoding of the payload to the hasher.
    #[inline]
    pub(crate) fn hash_into(&self, hasher: &mut Hasher) {
        hasher.update(&self.canonical_bytes());
    }
}

impl From<Json> for Payload {
    #[inline]
    fn from(value: Json) -> Self {
        Self(value)
    }
}

impl From<&str> for Payload {
    #[inline]
    fn from(value: &str) -> Self {
        Self(Json::String(value.to_string()))
    }
}

impl From<String> for Payload {
    #[inline]
    fn from(value: String) -> Self {
        Self(Json::String(value))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[inline]
fn encode_len(len: usize, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&(len as u64).to_be_bytes());
}

#[inline]
fn encode_bytes(bytes: &[u8], buf: &mut Vec<u8>) {
    encode_len(bytes.len(), buf);

    buf.extend_from_slice(bytes);
}

fn encode(value: &Json, buf: &mut Vec<u8>) {
    match value {
        Json::Null => buf.push(TAG_NULL),

        Json::Bool(value) => {
            buf.push(TAG_BOOL);
            buf.push(*value as u8);
        }

        Json::Number(number) => {
            buf.push(TAG_NUMBER);

            encode_bytes(number.to_string().as_bytes(), buf);
        }

        Json::String(string) => {
            buf.push(TAG_STRING);

            encode_bytes(string.as_bytes(), buf);
        }

        Json::Array(values) => {
            buf.push(TAG_ARRAY);

            encode_len(values.len(), buf);

            for value in values {
                encode(value, buf);
            }
        }

        Json::Object(map) => {
            buf.push(TAG_OBJECT);

            encode_len(map.len(), buf);

            // Map iteration order depends on serde_json features.
            let mut entries = map.iter().collect::<Vec<_>>();

            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            for (key, value) in entries {
                encode_bytes(key.as_bytes(), buf);
                encode(value, buf);
            }
        }
    }
}
