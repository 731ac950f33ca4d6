//! Interactive shell over a single ledger session.

mod cli;
mod logging;
mod shell;

use clap::Parser;

use ledgerchain::blockchain::ChainOptions;
use ledgerchain::session::Session;

use cli::LedgerCli;

fn main() -> anyhow::Result<()> {
    let cli = LedgerCli::parse();

    logging::init_logging(&cli.log_level, cli.log_format);

    let mut options = ChainOptions::default()
        .with_hash_algorithm(cli.hash_algorithm);

    if let Some(genesis) = cli.genesis {
        options = options.with_genesis_payload(genesis);
    }

    let mut session = Session::new(options);

    tracing::info!(
        hash_algorithm = %session.chain().hash_algorithm(),
        genesis = %session.chain().genesis().hash(),
        "ledger session started"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    shell::run(&mut session, stdin.lock(), stdout.lock())?;

    tracing::info!(blocks = session.chain().len(), "ledger session finished");

    Ok(())
}
