use alloy_primitives::{Address, B256, U256};
use chained_account::{AccountState, BlockInfo, ChainedAccount};
use clap::Parser;

/// Block environment arguments
#[derive(Parser, Debug, Clone)]
pub struct EnvArgs {
    /// `ChainID` to use
    #[arg(long = "env.chainid", default_value = "6342")]
    pub chain_id: u64,

    /// Block timestamp
    #[arg(long = "env.timestamp", default_value = "1")]
    pub timestamp: u64,

    /// Block prevrandao
    #[arg(
        long = "env.prevrandao",
        default_value = "0x0000000000000000000000000000000000000000000000000000000000000000"
    )]
    pub prevrandao: B256,
}

impl EnvArgs {
    /// Creates [`BlockInfo`].
    pub const fn block_info(&self) -> BlockInfo {
        BlockInfo {
            chain_id: self.chain_id,
            timestamp: self.timestamp,
            prevrandao: self.prevrandao,
        }
    }
}

/// Account arguments
#[derive(Parser, Debug, Clone)]
pub struct AccountArgs {
    /// Address of the account
    #[arg(long = "account", default_value = "0x00000000000000000000000000000000000ac0de")]
    pub account: Address,

    /// Owner of the account. Defaults to the address of the signing key, where there is one.
    #[arg(long = "owner")]
    pub owner: Option<Address>,

    /// Account-abstraction entry point
    #[arg(long = "entrypoint", default_value = "0x0000000071727De22E5E9d8BAf0edAc6f37da032")]
    pub entry_point: Address,

    /// Current nonce of the account
    #[arg(long = "nonce", default_value = "0")]
    pub nonce: U256,
}

impl AccountArgs {
    /// Creates the [`ChainedAccount`], falling back to `default_owner` when `--owner` is not
    /// given.
    pub fn account(&self, default_owner: Address) -> ChainedAccount {
        let state = AccountState {
            owner: self.owner.unwrap_or(default_owner),
            entry_point: self.entry_point,
            nonce: self.nonce,
        };
        ChainedAccount::from_state(self.account, state)
    }
}
