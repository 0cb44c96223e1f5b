//! Shared fixture for the account integration tests.
#![allow(dead_code)]

use alloy_primitives::{address, Address, Bytes, B256, U256};
use chained_account::{
    test_utils::{Echo, InMemoryHost, Recorder, Revert, ReturnData, TestSigner},
    BlockInfo, ChainedAccount,
};

pub const ACCOUNT: Address = address!("ac00000000000000000000000000000000000001");
pub const ENTRY_POINT: Address = address!("0000000071727De22E5E9d8BAf0edAc6f37da032");
pub const STRANGER: Address = address!("5700000000000000000000000000000000000005");
pub const RECEIVER: Address = address!("2000000000000000000000000000000000000002");

pub const RECORDER: Address = address!("1000000000000000000000000000000000000001");
pub const RECORDER_2: Address = address!("1000000000000000000000000000000000000002");
pub const REVERTER: Address = address!("1000000000000000000000000000000000000003");
pub const ECHO: Address = address!("1000000000000000000000000000000000000004");
pub const RETURNER: Address = address!("1000000000000000000000000000000000000005");

pub const CHAIN_ID: u64 = 6342;
pub const TIMESTAMP: u64 = 1_700_000_000;
pub const ACCOUNT_BALANCE: u64 = 1_000_000;

/// The word returned by the contract at [`RETURNER`].
pub const RETURNED_WORD: B256 = B256::repeat_byte(0xab);

/// The payload the contract at [`REVERTER`] reverts with.
pub fn revert_payload() -> Bytes {
    Bytes::from_static(b"\x08\xc3\x79\xa0boom")
}

pub fn block() -> BlockInfo {
    BlockInfo { chain_id: CHAIN_ID, timestamp: TIMESTAMP, prevrandao: B256::repeat_byte(0x5a) }
}

/// An account owned by a plain keypair, funded, next to a handful of mock contracts.
#[derive(Debug)]
pub struct Fixture {
    pub host: InMemoryHost,
    pub account: ChainedAccount,
    pub signer: TestSigner,
}

impl Fixture {
    pub fn new() -> Self {
        let signer = TestSigner::from_seed(1);
        let account = ChainedAccount::new(ACCOUNT, signer.address(), ENTRY_POINT);
        let host = InMemoryHost::new(block())
            .with_balance(ACCOUNT, U256::from(ACCOUNT_BALANCE))
            .with_contract(RECORDER, Recorder)
            .with_contract(RECORDER_2, Recorder)
            .with_contract(REVERTER, Revert(revert_payload()))
            .with_contract(ECHO, Echo)
            .with_contract(RETURNER, ReturnData(Bytes::copy_from_slice(RETURNED_WORD.as_slice())));
        Self { host, account, signer }
    }

    pub fn owner(&self) -> Address {
        self.account.owner()
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
