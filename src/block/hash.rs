use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize, Serializer, Deserializer};
use sha2::Digest;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashError {
    #[error(transparent)]
    HexDecode(#[from] hex::FromHexError),

    #[error("Invalid hash length. 32 bytes expected, got {0}")]
    InvalidHashLength(usize)
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Previous block hash of the genesis block.
    ///
    /// This is also the minimal possible hash value.
    pub const SENTINEL: Hash = Hash([0; 32]);

    /// Maximal possible hash value.
    pub const MAX: Hash = Hash([255; 32]);

    #[inline]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self == &Self::SENTINEL
    }

    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(hash: impl AsRef<[u8]>) -> Result<Self, HashError> {
        let mut hash_slice = [0; 32];

        let hash = hex::decode(hash)?;

        if hash.len() != 32 {
            return Err(HashError::InvalidHashLength(hash.len()));
        }

        hash_slice.copy_from_slice(&hash);

        Ok(Self(hash_slice))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = HashError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hash = String::deserialize(deserializer)?;

        Self::from_hex(hash).map_err(serde::de::Error::custom)
    }
}

impl From<blake3::Hash> for Hash {
    #[inline]
    fn from(value: blake3::Hash) -> Self {
        Self(*value.as_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown hash algorithm: {0}. Expected sha256 or blake3")]
pub struct ParseHashAlgorithmError(String);

/// Digest function used to calculate blocks hashes.
///
/// It must stay the same for the whole lifetime of a chain
/// because validation re-derives every hash with it.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3
}

impl HashAlgorithm {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3"
        }
    }

    #[inline]
    pub fn hasher(&self) -> Hasher {
        match self {
            Self::Sha256 => Hasher::Sha256(sha2::Sha256::new()),
            Self::Blake3 => Hasher::Blake3(Box::new(blake3::Hasher::new()))
        }
    }

    /// Hash given slice in one go.
    pub fn hash(&self, slice: impl AsRef<[u8]>) -> Hash {
        let mut hasher = self.hasher();

        hasher.update(slice.as_ref());

        hasher.finalize()
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ParseHashAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),

            _ => Err(ParseHashAlgorithmError(s.to_string()))
        }
    }
}

/// Incremental hasher of the chosen algorithm.
pub enum Hasher {
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>)
}

impl Hasher {
    #[inline]
    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        match self {
            Self::Sha256(hasher) => hasher.update(bytes),
            Self::Blake3(hasher) => {
                hasher.update(bytes);
            }
        }

        self
    }

    pub fn finalize(self) -> Hash {
        match self {
            Self::Sha256(hasher) => Hash(hasher.finalize().into()),
            Self::Blake3(hasher) => hasher.finalize().into()
        }
    }
}
