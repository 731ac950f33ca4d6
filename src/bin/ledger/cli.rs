use clap::Parser;

use ledgerchain::block::HashAlgorithm;

use crate::logging::LogFormat;

/// Interactive tamper-evident ledger.
///
/// Reads commands from stdin, one per line. The chain lives
/// only as long as the session.
#[derive(Parser, Debug)]
#[command(name = "ledger", version)]
pub struct LedgerCli {
    /// Digest function used to hash blocks.
    #[arg(long, env = "LEDGER_HASH_ALGORITHM", default_value_t = HashAlgorithm::Sha256)]
    pub hash_algorithm: HashAlgorithm,

    /// Payload of the genesis block.
    #[arg(long, env = "LEDGER_GENESIS")]
    pub genesis: Option<String>,

    /// Default log filter, overridden by `RUST_LOG`.
    #[arg(long, env = "LEDGER_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat
}
