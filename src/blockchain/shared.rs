use parking_lot::RwLock;

use super::*;

/// Chain which can be used from several threads.
///
/// Appends are serialized by the write lock, so two writers
/// can't reference the same tail. Validations and reads
/// share the read lock and see a consistent chain state.
///
/// Clones reference the same chain.
#[derive(Debug, Clone, Default)]
pub struct SharedChain {
    chain: Arc<RwLock<Chain>>
}

impl From<Chain> for SharedChain {
    #[inline]
    fn from(chain: Chain) -> Self {
        Self {
            chain: Arc::new(RwLock::new(chain))
        }
    }
}

// Chain is never empty.
#[allow(clippy::len_without_is_empty)]
impl SharedChain {
    #[inline]
    pub fn new(chain: Chain) -> Self {
        Self::from(chain)
    }

    /// Append new block and return its copy.
    pub fn append(&self, payload: impl Serialize) -> Result<Block, SerializationError> {
        // Serialize outside of the lock.
        let payload = Payload::new(payload)?;

        Ok(self.append_payload(payload))
    }

    pub fn append_payload(&self, payload: impl Into<Payload>) -> Block {
        self.chain.write()
            .append_payload(payload)
            .clone()
    }

    #[inline]
    pub fn validate(&self) -> ChainValidationResult {
        self.chain.read().validate()
    }

    #[inline]
    pub fn validate_all(&self) -> Vec<ChainViolation> {
        self.chain.read().validate_all()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chain.read().len()
    }

    #[inline]
    pub fn tail(&self) -> Block {
        self.chain.read().tail().clone()
    }

    #[inline]
    pub fn views(&self) -> Vec<BlockView> {
        self.chain.read().views()
    }

    /// Get copy of all the chain's blocks.
    #[inline]
    pub fn snapshot(&self) -> Vec<Block> {
        self.chain.read().blocks().to_vec()
    }

    /// Run a function with read access to the chain.
    pub fn read<T>(&self, callback: impl FnOnce(&Chain) -> T) -> T {
        callback(&self.chain.read())
    }
}
