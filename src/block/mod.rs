use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

pub(crate) mod hash;
pub(crate) mod finite;
pub(crate) mod payload;
pub(crate) mod builder;

pub use hash::*;
pub use payload::*;

pub(crate) use builder::BlockBuilder;

pub mod prelude {
    pub use super::{
        Block,
        BlockView,
        Hash,
        HashAlgorithm,
        Payload,
        SerializationError
    };
}

/// Format of the block timestamp shown in [`BlockView`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Single immutable ledger record.
///
/// Block is created only by the chain and commits to its
/// content and to the previous block via the content hash.
///
/// Blocks can't be deserialized from outside of the crate:
///
/// ```compile_fail
/// let block = serde_json::from_str::<ledgerchain::block::Block>("{}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub struct Block {
    // Header
    pub(crate) number: u64,
    pub(crate) previous_hash: Hash,
    pub(crate) hash: Hash,

    // Metadata
    pub(crate) created_at: u64,

    // Body
    pub(crate) payload: Payload
}

impl Block {
    #[inline]
    /// Number of the block in the chain.
    pub fn number(&self) -> u64 {
        self.number
    }

    #[inline]
    /// Hash of the previous block.
    ///
    /// Equals [`Hash::SENTINEL`] for the genesis block.
    pub fn previous_hash(&self) -> Hash {
        self.previous_hash
    }

    #[inline]
    /// UTC timestamp (amount of milliseconds) when
    /// this block was made.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    #[inline]
    /// Business data stored in the block.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    #[inline]
    /// Get hash stored in the block.
    ///
    /// This method will not validate this hash so
    /// you should treat its value as insecure.
    pub fn hash(&self) -> Hash {
        self.hash
    }

    #[inline]
    pub fn is_genesis(&self) -> bool {
        self.number == 0
    }

    /// Calculate hash of the block from its stored fields.
    ///
    /// The stored hash is not updated. Algorithm must be
    /// the same one used when the block was built.
    pub fn recompute_hash(&self, algorithm: HashAlgorithm) -> Hash {
        let mut hasher = algorithm.hasher();

        // Header
        hasher.update(&self.number.to_be_bytes());

        // Metadata
        hasher.update(&self.created_at.to_be_bytes());

        // Body
        self.payload.hash_into(&mut hasher);

        hasher.update(&self.previous_hash.as_bytes());

        hasher.finalize()
    }

    /// Get display representation of the block.
    pub fn view(&self) -> BlockView {
        BlockView {
            index: self.number,
            timestamp: format_timestamp(self.created_at),
            payload: self.payload.clone(),
            previous_hash: self.previous_hash.to_hex(),
            hash: self.hash.to_hex()
        }
    }
}

/// Read-only projection of a block for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockView {
    pub index: u64,

    /// Creation time in [`TIMESTAMP_FORMAT`], UTC.
    pub timestamp: String,

    pub payload: Payload,
    pub previous_hash: String,
    pub hash: String
}

fn format_timestamp(created_at: u64) -> String {
    i64::try_from(created_at).ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|time| time.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| created_at.to_string())
}
