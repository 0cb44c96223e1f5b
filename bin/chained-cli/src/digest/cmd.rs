use alloy_primitives::{Address, B256, U256};
use clap::Parser;
use tracing::debug;

use crate::common::{load_calls, AccountArgs, EnvArgs, Result};

/// Arguments describing one `executeSigned` operation
#[derive(Parser, Debug, Clone)]
pub struct OperationArgs {
    /// Call list as inline JSON
    #[arg(long = "calls")]
    pub calls: Option<String>,

    /// File containing the JSON call list. If '-' is specified, it is read from stdin
    #[arg(long = "callsfile")]
    pub calls_file: Option<String>,

    /// Deadline of the operation as a unix timestamp, 0 for none
    #[arg(long = "deadline", default_value = "0")]
    pub deadline: U256,

    /// Account configuration
    #[command(flatten)]
    pub account_args: AccountArgs,

    /// Environment configuration
    #[command(flatten)]
    pub env_args: EnvArgs,
}

impl OperationArgs {
    /// Computes the `executeSigned` digest of the operation for an account owned by `owner`.
    pub fn digest(&self, owner: Address) -> Result<B256> {
        let calls = load_calls(self.calls.as_deref(), self.calls_file.as_deref())?;
        let account = self.account_args.account(owner);
        let digest = account.signing_digest(
            self.env_args.chain_id,
            &calls,
            account.nonce(),
            self.deadline,
        );
        debug!(
            target: "chained_cli::digest",
            account = %account.address(),
            calls = calls.len(),
            nonce = %account.nonce(),
            %digest,
            "Computed digest"
        );
        Ok(digest)
    }
}

/// Print the digest an owner signs to authorize `executeSigned`
#[derive(Parser, Debug)]
pub struct Cmd {
    /// The operation
    #[command(flatten)]
    pub operation: OperationArgs,
}

impl Cmd {
    /// Execute the digest command
    pub fn run(&self) -> Result<()> {
        // The owner does not enter the digest.
        let digest = self.operation.digest(Address::ZERO)?;
        println!("{digest}");
        Ok(())
    }
}
