//! Top-level argument parsing for the operator CLI.

use crate::commands::{Command, CommandResult};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kvctl",
    about = "Operator CLI for the sharded key-value service: run gateway/storage-node \
             processes, issue client operations against a running cluster, or inspect \
             a ring offline"
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Parse `std::env::args()` and run. A thin synchronous wrapper so
    /// `main` doesn't need its own `#[tokio::main]` — the long-running
    /// `gateway`/`node` subcommands need the runtime to live exactly as
    /// long as the command does.
    pub fn run(self) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        let result = runtime.block_on(self.command.execute())?;
        match result {
            CommandResult::Message(msg) => println!("{msg}"),
            CommandResult::Value(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        }
        Ok(())
    }
}
