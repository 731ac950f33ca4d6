use crate::block::{HashAlgorithm, Payload};

/// Payload of the genesis block used by default.
pub const GENESIS_PAYLOAD: &str = "Genesis Block";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOptions {
    /// Digest function used to hash the chain's blocks.
    ///
    /// It can't be changed after the chain is created.
    ///
    /// Default is sha256.
    pub hash_algorithm: HashAlgorithm,

    /// Payload stored in the genesis block.
    ///
    /// Default is `"Genesis Block"`.
    pub genesis_payload: Payload
}

impl Default for ChainOptions {
    #[inline]
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            genesis_payload: Payload::from(GENESIS_PAYLOAD)
        }
    }
}

impl ChainOptions {
    #[inline]
    pub fn with_hash_algorithm(self, hash_algorithm: HashAlgorithm) -> Self {
        Self {
            hash_algorithm,
            ..self
        }
    }

    #[inline]
    pub fn with_genesis_payload(self, genesis_payload: impl Into<Payload>) -> Self {
        Self {
            genesis_payload: genesis_payload.into(),
            ..self
        }
    }
}
