use std::io::{BufRead, Write};
use std::str::FromStr;

use ledgerchain::blockchain::ChainValidationResult;
use ledgerchain::session::Session;

pub const HELP: &str = "\
Commands:
  add <amount> <transaction>  append a transfer record
  list                        print all the blocks
  validate                    check the chain's integrity
  help                        print this message
  quit                        end the session";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}. Type `help` to list commands")]
    Unknown(String),

    #[error("Missing transaction amount")]
    MissingAmount,

    #[error("Invalid transaction amount: {0}")]
    InvalidAmount(String),

    #[error("Missing transaction description")]
    MissingTransaction
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        amount: f64,
        transaction: String
    },

    List,
    Validate,
    Help,
    Quit
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();

        let (command, args) = line.split_once(char::is_whitespace)
            .unwrap_or((line, ""));

        match command.to_ascii_lowercase().as_str() {
            "add" => {
                let args = args.trim_start();

                let (amount, transaction) = args.split_once(char::is_whitespace)
                    .unwrap_or((args, ""));

                if amount.is_empty() {
                    return Err(CommandError::MissingAmount);
                }

                let amount = amount.parse::<f64>()
                    .ok()
                    .filter(|amount| amount.is_finite() && *amount >= 0.0)
                    .ok_or_else(|| CommandError::InvalidAmount(amount.to_string()))?;

                let transaction = transaction.trim();

                if transaction.is_empty() {
                    return Err(CommandError::MissingTransaction);
                }

                Ok(Self::Add {
                    amount,
                    transaction: transaction.to_string()
                })
            }

            "list" => Ok(Self::List),
            "validate" => Ok(Self::Validate),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),

            _ => Err(CommandError::Unknown(command.to_string()))
        }
    }
}

/// Read commands line by line and execute them over the session
/// until the input ends or `quit` is received.
pub fn run(session: &mut Session, input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,

            Err(err) => {
                writeln!(output, "{err}")?;

                continue;
            }
        };

        match command {
            Command::Add { amount, transaction } => {
                let number = session.submit_transaction(transaction, amount)?;

                writeln!(output, "Block #{number} added")?;
            }

            Command::List => {
                writeln!(output, "{}", serde_json::to_string_pretty(&session.list_blocks())?)?;
            }

            Command::Validate => match session.check_validity() {
                ChainValidationResult::Valid => writeln!(output, "Chain is valid")?,
                result => writeln!(output, "Chain is INVALID: {result}")?
            }

            Command::Help => writeln!(output, "{HELP}")?,

            Command::Quit => break
        }
    }

    output.flush()?;

    Ok(())
}
