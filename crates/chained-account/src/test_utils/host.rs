use core::fmt::Debug;
use std::{collections::HashMap, sync::Arc};

use alloy_primitives::{Address, Bytes, Log, B256, U256};

use crate::{BlockInfo, CallOutcome, Host, JournalCheckpoint};

/// Code deployed at an address of the [`InMemoryHost`].
///
/// Contracts hold no state of their own; everything they persist goes through the
/// [`MockCallContext`] so that it is journaled and rolled back with the host.
pub trait MockContract: Debug + Send + Sync {
    /// Executes a call to the contract.
    fn call(&self, ctx: &mut MockCallContext<'_>, input: &[u8]) -> CallOutcome;
}

/// The view a [`MockContract`] has of the host during a call.
#[derive(Debug)]
pub struct MockCallContext<'a> {
    host: &'a mut InMemoryHost,
    /// The address of the called contract.
    pub address: Address,
    /// The immediate caller.
    pub caller: Address,
    /// The value attached to the call.
    pub value: U256,
}

impl MockCallContext<'_> {
    /// Reads a storage slot of the called contract. Unset slots are empty.
    pub fn sload(&self, key: B256) -> Bytes {
        self.host.storage(self.address, key)
    }

    /// Writes a storage slot of the called contract.
    pub fn sstore(&mut self, key: B256, value: Bytes) {
        self.host.set_storage(self.address, key, value);
    }

    /// Emits a log from the called contract.
    pub fn log(&mut self, log: Log) {
        self.host.log(log);
    }

    /// The current block environment.
    pub fn block(&self) -> BlockInfo {
        self.host.block
    }
}

/// A single undoable change.
#[derive(Clone, Debug, PartialEq, Eq)]
enum JournalEntry {
    /// The balance of an account changed from `previous`.
    BalanceChange { address: Address, previous: U256 },
    /// A storage slot changed from `previous`.
    StorageChange { address: Address, key: B256, previous: Option<Bytes> },
}

/// An in-memory [`Host`] with journaled balances, storage and logs.
///
/// Calls to addresses without code succeed with empty return data, like value transfers to an
/// externally owned account.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    block: BlockInfo,
    balances: HashMap<Address, U256>,
    storage: HashMap<(Address, B256), Bytes>,
    contracts: HashMap<Address, Arc<dyn MockContract>>,
    logs: Vec<Log>,
    journal: Vec<JournalEntry>,
}

impl InMemoryHost {
    /// Creates an empty host with the given block environment.
    pub fn new(block: BlockInfo) -> Self {
        Self { block, ..Default::default() }
    }

    /// Deploys `contract` at `address`.
    pub fn with_contract(
        mut self,
        address: Address,
        contract: impl MockContract + 'static,
    ) -> Self {
        self.set_contract(address, contract);
        self
    }

    /// Sets the balance of `address`.
    pub fn with_balance(mut self, address: Address, balance: U256) -> Self {
        self.balances.insert(address, balance);
        self
    }

    /// Deploys `contract` at `address`.
    pub fn set_contract(&mut self, address: Address, contract: impl MockContract + 'static) {
        self.contracts.insert(address, Arc::new(contract));
    }

    /// Sets the block timestamp.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.block.timestamp = timestamp;
    }

    /// Reads a storage slot. Unset slots are empty.
    pub fn storage(&self, address: Address, key: B256) -> Bytes {
        self.storage.get(&(address, key)).cloned().unwrap_or_default()
    }

    /// Writes a storage slot, journaling the previous value.
    pub fn set_storage(&mut self, address: Address, key: B256, value: Bytes) {
        let previous = self.storage.insert((address, key), value);
        self.journal.push(JournalEntry::StorageChange { address, key, previous });
    }

    /// All logs emitted and not rolled back.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Moves `value` from `from` to `to`. Fails without changes if `from` is short of funds.
    fn transfer(&mut self, from: Address, to: Address, value: U256) -> bool {
        if value.is_zero() || from == to {
            return self.balance(from) >= value;
        }
        let from_balance = self.balance(from);
        let Some(remaining) = from_balance.checked_sub(value) else {
            return false;
        };
        let to_balance = self.balance(to);
        self.set_balance(from, remaining);
        self.set_balance(to, to_balance + value);
        true
    }

    fn set_balance(&mut self, address: Address, balance: U256) {
        let previous = self.balances.insert(address, balance).unwrap_or_default();
        self.journal.push(JournalEntry::BalanceChange { address, previous });
    }
}

impl Host for InMemoryHost {
    fn block(&self) -> BlockInfo {
        self.block
    }

    fn is_contract(&self, address: Address) -> bool {
        self.contracts.contains_key(&address)
    }

    fn balance(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }

    fn invoke(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        input: Bytes,
    ) -> CallOutcome {
        let checkpoint = self.checkpoint();
        if !self.transfer(caller, target, value) {
            self.checkpoint_revert(checkpoint);
            return Err(Bytes::new());
        }

        let outcome = match self.contracts.get(&target).cloned() {
            Some(contract) => {
                let mut ctx = MockCallContext { host: &mut *self, address: target, caller, value };
                contract.call(&mut ctx, &input)
            }
            None => Ok(Bytes::new()),
        };

        if outcome.is_ok() {
            self.checkpoint_commit();
        } else {
            self.checkpoint_revert(checkpoint);
        }
        outcome
    }

    fn log(&mut self, log: Log) {
        self.logs.push(log);
    }

    fn checkpoint(&mut self) -> JournalCheckpoint {
        JournalCheckpoint { log_i: self.logs.len(), journal_i: self.journal.len() }
    }

    fn checkpoint_commit(&mut self) {}

    fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint) {
        self.logs.truncate(checkpoint.log_i);
        while self.journal.len() > checkpoint.journal_i {
            match self.journal.pop() {
                Some(JournalEntry::BalanceChange { address, previous }) => {
                    self.balances.insert(address, previous);
                }
                Some(JournalEntry::StorageChange { address, key, previous }) => match previous {
                    Some(value) => {
                        self.storage.insert((address, key), value);
                    }
                    None => {
                        self.storage.remove(&(address, key));
                    }
                },
                None => break,
            }
        }
    }
}
