use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::block::{
    Block,
    BlockBuilder,
    BlockView,
    Hash,
    HashAlgorithm,
    Payload,
    SerializationError
};

mod clock;
mod options;
mod shared;

pub use clock::*;
pub use options::*;
pub use shared::*;

pub mod prelude {
    pub use super::{
        Chain,
        ChainOptions,
        ChainValidationResult,
        ChainViolation,
        InvalidReason,
        SharedChain,
        Clock,
        SystemClock,
        ManualClock
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    /// Stored hash differs from the one calculated
    /// from the block's content.
    HashMismatch {
        stored: Hash,
        calculated: Hash
    },

    /// Block doesn't reference the hash of the previous
    /// block (or the sentinel if it's the genesis block).
    LinkMismatch {
        expected: Hash,
        got: Hash
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashMismatch { stored, calculated } => {
                write!(f, "hash mismatch: stored {stored}, calculated {calculated}")
            }

            Self::LinkMismatch { expected, got } => {
                write!(f, "link mismatch: expected previous {expected}, got {got}")
            }
        }
    }
}

/// Single problem found in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainViolation {
    pub index: u64,
    pub reason: InvalidReason
}

impl fmt::Display for ChainViolation {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block #{}: {}", self.index, self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainValidationResult {
    /// First invalid block of the chain.
    Invalid {
        index: u64,
        reason: InvalidReason
    },

    /// Chain is valid.
    Valid
}

impl ChainValidationResult {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self == &Self::Valid
    }
}

impl From<Option<ChainViolation>> for ChainValidationResult {
    #[inline]
    fn from(value: Option<ChainViolation>) -> Self {
        match value {
            Some(ChainViolation { index, reason }) => Self::Invalid { index, reason },
            None => Self::Valid
        }
    }
}

impl fmt::Display for ChainValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { index, reason } => write!(f, "invalid at block #{index}: {reason}"),
            Self::Valid => f.write_str("valid")
        }
    }
}

/// Append-only sequence of blocks.
///
/// Chain always contains the genesis block. New blocks
/// can only be added to the tail, existing blocks are never
/// changed or removed.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
    options: ChainOptions,
    clock: Arc<dyn Clock>
}

impl Default for Chain {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// Chain is never empty.
#[allow(clippy::len_without_is_empty)]
impl Chain {
    /// Create new chain with default options.
    #[inline]
    pub fn new() -> Self {
        Self::with_options(ChainOptions::default())
    }

    #[inline]
    pub fn with_options(options: ChainOptions) -> Self {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    /// Create new chain which will take blocks
    /// creation time from the given clock.
    pub fn with_clock(options: ChainOptions, clock: Arc<dyn Clock>) -> Self {
        let genesis = BlockBuilder::new(options.genesis_payload.clone())
            .with_created_at(clock.now())
            .build(options.hash_algorithm);

        Self {
            blocks: vec![genesis],
            options,
            clock
        }
    }

    #[inline]
    pub fn options(&self) -> &ChainOptions {
        &self.options
    }

    #[inline]
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.options.hash_algorithm
    }

    #[inline]
    /// Amount of blocks in the chain, including genesis.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    #[inline]
    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    #[inline]
    /// Get the latest block.
    pub fn tail(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    #[inline]
    pub fn get_block(&self, number: u64) -> Option<&Block> {
        usize::try_from(number).ok()
            .and_then(|number| self.blocks.get(number))
    }

    /// Serialize the payload and append a new block with it.
    ///
    /// Chain is not changed if serialization fails.
    ///
    /// ```
    /// use serde_json::json;
    /// use ledgerchain::prelude::*;
    ///
    /// let mut chain = Chain::new();
    ///
    /// let block = chain.append(json!({ "transaction": "Alice to Bob", "amount": 10.0 }))
    ///     .unwrap()
    ///     .clone();
    ///
    /// assert_eq!(block.number(), 1);
    /// assert_eq!(block.previous_hash(), chain.genesis().hash());
    ///
    /// assert!(chain.append(f64::NAN).is_err());
    /// assert_eq!(chain.len(), 2);
    /// ```
    pub fn append(&mut self, payload: impl Serialize) -> Result<&Block, SerializationError> {
        let payload = Payload::new(payload)?;

        Ok(self.append_payload(payload))
    }

    /// Append a new block referencing the current tail.
    pub fn append_payload(&mut self, payload: impl Into<Payload>) -> &Block {
        let block = BlockBuilder::chained(self.tail(), payload)
            .with_created_at(self.clock.now())
            .build(self.options.hash_algorithm);

        self.blocks.push(block);

        self.tail()
    }

    /// Validate the chain.
    ///
    /// For every block, starting from the genesis one, this method will:
    ///
    /// 1. Calculate the block's hash and compare it
    ///    with stored value.
    ///
    /// 2. Verify that the block references the previous
    ///    block's hash, or the sentinel hash for genesis.
    ///
    /// First found problem is returned.
    ///
    /// ```
    /// use ledgerchain::prelude::*;
    ///
    /// let mut chain = Chain::new();
    ///
    /// chain.append("Alice to Bob").unwrap();
    /// chain.append("Bob to Carol").unwrap();
    ///
    /// assert_eq!(chain.validate(), ChainValidationResult::Valid);
    /// ```
    pub fn validate(&self) -> ChainValidationResult {
        self.violations().next().into()
    }

    /// Validate the chain and return all the found problems.
    ///
    /// Empty vector means the chain is valid.
    pub fn validate_all(&self) -> Vec<ChainViolation> {
        self.violations().collect()
    }

    /// Get display representation of all the blocks.
    pub fn views(&self) -> Vec<BlockView> {
        self.blocks.iter()
            .map(Block::view)
            .collect()
    }

    fn violations(&self) -> impl Iterator<Item = ChainViolation> + '_ {
        let algorithm = self.options.hash_algorithm;

        let mut expected_previous = Hash::SENTINEL;

        self.blocks.iter().enumerate().flat_map(move |(index, block)| {
            let calculated = block.recompute_hash(algorithm);

            let hash_mismatch = (calculated != block.hash).then_some(InvalidReason::HashMismatch {
                stored: block.hash,
                calculated
            });

            let link_mismatch = (block.previous_hash != expected_previous).then_some(InvalidReason::LinkMismatch {
                expected: expected_previous,
                got: block.previous_hash
            });

            expected_previous = block.hash;

            hash_mismatch.into_iter()
                .chain(link_mismatch)
                .map(move |reason| ChainViolation {
                    index: index as u64,
                    reason
                })
        })
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    pub fn get_chain() -> (Chain, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));

        let chain = Chain::with_clock(ChainOptions::default(), clock.clone());

        (chain, clock)
    }

    /// Chain from the transfers example: genesis, Alice to Bob, Bob to Carol.
    pub fn get_transfers() -> Result<(Chain, Arc<ManualClock>), SerializationError> {
        let (mut chain, clock) = get_chain();

        clock.advance(1000);

        chain.append(json!({ "transaction": "Alice to Bob", "amount": 10.0 }))?;

        clock.advance(1000);

        chain.append(json!({ "transaction": "Bob to Carol", "amount": 5.0 }))?;

        Ok((chain, clock))
    }

    #[test]
    fn genesis() {
        let chain = Chain::new();

        assert_eq!(chain.len(), 1);

        assert_eq!(chain.genesis().number(), 0);
        assert!(chain.genesis().previous_hash().is_sentinel());
        assert_eq!(chain.genesis().payload(), &Payload::from(GENESIS_PAYLOAD));

        assert_eq!(chain.tail(), chain.genesis());
        assert_eq!(chain.validate(), ChainValidationResult::Valid);
    }

    #[test]
    fn custom_options() -> Result<(), SerializationError> {
        let options = ChainOptions::default()
            .with_hash_algorithm(HashAlgorithm::Blake3)
            .with_genesis_payload(json!({ "network": "test" }));

        let mut chain = Chain::with_options(options);

        chain.append("Hello, World!")?;

        assert_eq!(chain.hash_algorithm(), HashAlgorithm::Blake3);
        assert_eq!(chain.genesis().payload().as_json(), &json!({ "network": "test" }));

        assert_eq!(
            chain.tail().hash(),
            chain.tail().recompute_hash(HashAlgorithm::Blake3)
        );

        assert!(chain.validate().is_valid());

        Ok(())
    }

    #[test]
    fn append() -> Result<(), SerializationError> {
        let (mut chain, clock) = get_chain();

        for i in 0..32 {
            clock.advance(10);

            let block = chain.append(json!({ "transfer": i }))?;

            assert_eq!(block.number(), i + 1);
            assert_eq!(block.created_at(), clock.now());
        }

        assert_eq!(chain.len(), 33);

        for (i, block) in chain.iter().enumerate() {
            assert_eq!(block.number(), i as u64);
            assert_eq!(chain.get_block(i as u64), Some(block));
        }

        assert!(chain.get_block(33).is_none());

        Ok(())
    }

    #[test]
    fn links() -> Result<(), SerializationError> {
        let mut chain = Chain::new();

        for i in 0..16 {
            let previous = chain.tail().hash();

            assert_eq!(chain.append(i)?.previous_hash(), previous);
        }

        for pair in chain.blocks().windows(2) {
            assert_eq!(pair[1].previous_hash(), pair[0].hash());
        }

        Ok(())
    }

    #[test]
    fn deterministic() -> Result<(), SerializationError> {
        let (chain_a, _) = get_transfers()?;
        let (chain_b, _) = get_transfers()?;

        assert_eq!(chain_a.blocks(), chain_b.blocks());

        Ok(())
    }

    #[test]
    fn any_payload_is_valid() -> Result<(), SerializationError> {
        let mut chain = Chain::new();

        chain.append(json!(null))?;
        chain.append("")?;
        chain.append(json!({}))?;
        chain.append(json!([]))?;
        chain.append("Привет, мир! 🧱")?;
        chain.append(json!({ "ключ": ["значение", { "ü": -1.5e-7 }] }))?;
        chain.append(json!({ "a": { "b": { "c": { "d": [[[[{ "e": true }]]]] } } } }))?;
        chain.append(u64::MAX)?;
        chain.append(i64::MIN)?;

        assert_eq!(chain.len(), 10);
        assert!(chain.validate().is_valid());
        assert!(chain.validate_all().is_empty());

        Ok(())
    }

    #[test]
    fn failed_append() -> Result<(), SerializationError> {
        let (mut chain, _) = get_transfers()?;

        let blocks = chain.blocks().to_vec();

        let mut payload = HashMap::new();

        payload.insert((1, 2), "non-string key");

        assert!(chain.append(payload).is_err());

        assert_eq!(chain.blocks(), blocks);
        assert!(chain.validate().is_valid());

        Ok(())
    }

    #[test]
    fn transfers() -> Result<(), SerializationError> {
        let (mut chain, _) = get_transfers()?;

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.validate(), ChainValidationResult::Valid);

        chain.blocks[1].payload = Payload::from(json!({
            "transaction": "Alice to Bob",
            "amount": 999.0
        }));

        assert!(matches!(chain.validate(), ChainValidationResult::Invalid {
            index: 1,
            reason: InvalidReason::HashMismatch { .. }
        }));

        Ok(())
    }

    #[test]
    fn tampered_fields() -> Result<(), SerializationError> {
        let (chain, _) = get_transfers()?;

        let tampers: [fn(&mut Block); 4] = [
            |block| block.payload = Payload::from("Mallory to Mallory"),
            |block| block.created_at += 1,
            |block| block.previous_hash = Hash::MAX,
            |block| block.number += 1
        ];

        for index in 1..chain.len() {
            for tamper in tampers {
                let mut chain = chain.clone();

                let stored = chain.blocks[index].hash;

                tamper(&mut chain.blocks[index]);

                let calculated = chain.blocks[index].recompute_hash(chain.hash_algorithm());

                assert_eq!(chain.validate(), ChainValidationResult::Invalid {
                    index: index as u64,
                    reason: InvalidReason::HashMismatch {
                        stored,
                        calculated
                    }
                });
            }
        }

        Ok(())
    }

    #[test]
    fn tampered_hash() -> Result<(), SerializationError> {
        let (mut chain, _) = get_transfers()?;

        chain.blocks[2].hash = Hash::MAX;

        assert!(matches!(chain.validate(), ChainValidationResult::Invalid {
            index: 2,
            reason: InvalidReason::HashMismatch { stored: Hash::MAX, .. }
        }));

        Ok(())
    }

    #[test]
    fn severed_link() -> Result<(), SerializationError> {
        let (mut chain, _) = get_transfers()?;

        let algorithm = chain.hash_algorithm();

        // Re-hashed forgery: content hash is consistent, link is not.
        let block = &mut chain.blocks[2];

        block.previous_hash = algorithm.hash(b"unrelated");
        block.hash = block.recompute_hash(algorithm);

        assert_eq!(chain.validate(), ChainValidationResult::Invalid {
            index: 2,
            reason: InvalidReason::LinkMismatch {
                expected: chain.blocks[1].hash(),
                got: algorithm.hash(b"unrelated")
            }
        });

        Ok(())
    }

    #[test]
    fn removed_block() -> Result<(), SerializationError> {
        let (mut chain, _) = get_transfers()?;

        let genesis_hash = chain.genesis().hash();

        chain.blocks.remove(1);

        assert!(matches!(chain.validate(), ChainValidationResult::Invalid {
            index: 1,
            reason: InvalidReason::LinkMismatch { expected, .. }
        } if expected == genesis_hash));

        Ok(())
    }

    #[test]
    fn tampered_genesis() -> Result<(), SerializationError> {
        let (mut chain, _) = get_transfers()?;

        chain.blocks[0].payload = Payload::from("Not a genesis block");

        assert!(matches!(chain.validate(), ChainValidationResult::Invalid {
            index: 0,
            reason: InvalidReason::HashMismatch { .. }
        }));

        // Forged genesis with a predecessor.
        let (mut chain, _) = get_transfers()?;

        let algorithm = chain.hash_algorithm();

        let genesis = &mut chain.blocks[0];

        genesis.previous_hash = Hash::MAX;
        genesis.hash = genesis.recompute_hash(algorithm);

        assert_eq!(chain.validate(), ChainValidationResult::Invalid {
            index: 0,
            reason: InvalidReason::LinkMismatch {
                expected: Hash::SENTINEL,
                got: Hash::MAX
            }
        });

        Ok(())
    }

    #[test]
    fn all_violations() -> Result<(), SerializationError> {
        let (mut chain, _) = get_transfers()?;

        chain.append("Carol to Dave")?;

        chain.blocks[1].payload = Payload::from("Alice to Mallory");

        let algorithm = chain.hash_algorithm();
        let block = &mut chain.blocks[3];

        block.previous_hash = Hash::from_bytes([7; 32]);
        block.created_at = 0;

        let violations = chain.validate_all();

        assert_eq!(violations.len(), 3);

        assert!(matches!(violations[0], ChainViolation { index: 1, reason: InvalidReason::HashMismatch { .. } }));
        assert!(matches!(violations[1], ChainViolation { index: 3, reason: InvalidReason::HashMismatch { .. } }));

        assert_eq!(violations[2], ChainViolation {
            index: 3,
            reason: InvalidReason::LinkMismatch {
                expected: chain.blocks[2].hash(),
                got: Hash::from_bytes([7; 32])
            }
        });

        assert_ne!(chain.blocks[3].recompute_hash(algorithm), chain.blocks[3].hash());

        Ok(())
    }

    #[test]
    fn display() {
        let result = ChainValidationResult::Invalid {
            index: 4,
            reason: InvalidReason::LinkMismatch {
                expected: Hash::SENTINEL,
                got: Hash::MAX
            }
        };

        assert_eq!(ChainValidationResult::Valid.to_string(), "valid");

        assert!(result.to_string().starts_with("invalid at block #4: link mismatch"));
    }
}
