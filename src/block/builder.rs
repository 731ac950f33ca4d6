use super::*;

/// Block construction.
///
/// Builder doesn't know anything about the chain the block
/// will be stored in, so it trusts the given number and previous
/// hash. Only [`Chain`](crate::blockchain::Chain) uses it, which
/// guarantees that these values match the chain's tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockBuilder {
    number: u64,
    created_at: u64,
    previous_hash: Hash,
    payload: Payload
}

impl BlockBuilder {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            number: 0,
            created_at: 0,
            previous_hash: Hash::SENTINEL,
            payload: payload.into()
        }
    }

    /// Prepare a block which will follow the given one.
    pub fn chained(previous: &Block, payload: impl Into<Payload>) -> Self {
        Self::new(payload)
            .with_number(previous.number + 1)
            .with_previous(previous.hash)
    }

    /// Set position of the block in the chain.
    pub fn with_number(self, number: u64) -> Self {
        Self {
            number,
            ..self
        }
    }

    /// Set reference to the previous block.
    pub fn with_previous(self, previous_hash: Hash) -> Self {
        Self {
            previous_hash,
            ..self
        }
    }

    /// Change creation timestamp of the block.
    pub fn with_created_at(self, created_at: u64) -> Self {
        Self {
            created_at,
            ..self
        }
    }

    /// Build block by calculating its content hash.
    pub fn build(self, algorithm: HashAlgorithm) -> Block {
        let mut block = Block {
            number: self.number,
            created_at: self.created_at,
            payload: self.payload,
            previous_hash: self.previous_hash,
            hash: Hash::default()
        };

        block.hash = block.recompute_hash(algorithm);

        block
    }
}
