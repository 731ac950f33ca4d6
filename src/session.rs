use serde::{Serialize, Deserialize};

use crate::block::{BlockView, SerializationError};
use crate::blockchain::{Chain, ChainOptions, ChainValidationResult};

pub mod prelude {
    pub use super::{
        Session,
        TransactionRecord
    };
}

/// Payload of a transfer submitted through a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Free-form description, e.g. `"Alice to Bob"`.
    pub transaction: String,
    pub amount: f64
}

/// Ledger session.
///
/// Session owns its own chain which lives as long as the
/// session itself. Presentation layers submit new records
/// and read blocks and validity status through it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    chain: Chain
}

impl From<Chain> for Session {
    #[inline]
    fn from(chain: Chain) -> Self {
        Self {
            chain
        }
    }
}

impl Session {
    #[inline]
    pub fn new(options: ChainOptions) -> Self {
        Self::from(Chain::with_options(options))
    }

    #[inline]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Append a transfer record and return number of its block.
    ///
    /// ```
    /// use ledgerchain::prelude::*;
    ///
    /// let mut session = Session::default();
    ///
    /// assert_eq!(session.submit_transaction("Alice to Bob", 10.0).unwrap(), 1);
    /// assert_eq!(session.submit_transaction("Bob to Carol", 5.0).unwrap(), 2);
    ///
    /// let blocks = session.list_blocks();
    ///
    /// assert_eq!(blocks[2].previous_hash, blocks[1].hash);
    /// assert!(session.check_validity().is_valid());
    /// ```
    pub fn submit_transaction(&mut self, transaction: impl Into<String>, amount: f64) -> Result<u64, SerializationError> {
        self.submit(TransactionRecord {
            transaction: transaction.into(),
            amount
        })
    }

    /// Append an arbitrary payload and return number of its block.
    pub fn submit(&mut self, payload: impl Serialize) -> Result<u64, SerializationError> {
        let block = self.chain.append(payload)?;

        tracing::debug!(
            number = block.number(),
            hash = %block.hash(),
            "appended block"
        );

        Ok(block.number())
    }

    #[inline]
    pub fn list_blocks(&self) -> Vec<BlockView> {
        self.chain.views()
    }

    pub fn check_validity(&self) -> ChainValidationResult {
        let result = self.chain.validate();

        if let ChainValidationResult::Invalid { index, reason } = &result {
            tracing::warn!(index, %reason, "chain validation failed");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::block::HashAlgorithm;

    use super::*;

    #[test]
    fn transactions() -> Result<(), SerializationError> {
        let mut session = Session::default();

        assert_eq!(session.submit_transaction("Alice to Bob", 10.0)?, 1);
        assert_eq!(session.submit_transaction(String::from("Bob to Carol"), 5.0)?, 2);

        let blocks = session.list_blocks();

        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[1].payload.as_json(), &json!({
            "transaction": "Alice to Bob",
            "amount": 10.0
        }));

        assert_eq!(blocks[2].previous_hash, blocks[1].hash);

        assert!(session.check_validity().is_valid());

        Ok(())
    }

    #[test]
    fn non_finite_amount() -> Result<(), SerializationError> {
        let mut session = Session::default();

        session.submit_transaction("Alice to Bob", 10.0)?;

        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                session.submit_transaction("Bob to Carol", amount),
                Err(SerializationError::NonFiniteNumber(_))
            ));
        }

        assert_eq!(session.list_blocks().len(), 2);
        assert!(session.check_validity().is_valid());

        Ok(())
    }

    #[test]
    fn arbitrary_payload() -> Result<(), SerializationError> {
        let mut session = Session::new(ChainOptions::default().with_hash_algorithm(HashAlgorithm::Blake3));

        assert_eq!(session.submit(json!({ "note": ["free", "form"] }))?, 1);

        assert_eq!(session.chain().hash_algorithm(), HashAlgorithm::Blake3);
        assert!(session.check_validity().is_valid());

        Ok(())
    }
}
