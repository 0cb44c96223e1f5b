use alloy_primitives::{Address, Bytes, Log, U256};
use auto_impl::auto_impl;

use crate::BlockInfo;

/// Outcome of a dispatched call: the raw return data on success, the raw revert payload on
/// failure.
pub type CallOutcome = Result<Bytes, Bytes>;

/// Journal position returned by [`Host::checkpoint`].
///
/// Mirrors revm's `JournalCheckpoint`: every change made after the checkpoint can be undone by
/// [`Host::checkpoint_revert`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JournalCheckpoint {
    /// Number of logs at the time of the checkpoint.
    pub log_i: usize,
    /// Number of journal entries at the time of the checkpoint.
    pub journal_i: usize,
}

/// The execution environment the account runs in.
///
/// The host owns everything outside the account's own state: other contracts, native balances,
/// emitted logs and the block environment.
#[auto_impl(&mut, Box)]
pub trait Host {
    /// Returns the current block environment.
    fn block(&self) -> BlockInfo;

    /// Returns `true` if code is deployed at `address`.
    fn is_contract(&self, address: Address) -> bool;

    /// Returns the native balance of `address`.
    fn balance(&self, address: Address) -> U256;

    /// Calls `target` from `caller`, attaching `value` and sending `input`.
    ///
    /// A failed call must not leave any state change behind, including the value transfer.
    fn invoke(&mut self, caller: Address, target: Address, value: U256, input: Bytes)
        -> CallOutcome;

    /// Appends a log.
    fn log(&mut self, log: Log);

    /// Marks the current journal position.
    fn checkpoint(&mut self) -> JournalCheckpoint;

    /// Keeps every change made since the last checkpoint.
    fn checkpoint_commit(&mut self);

    /// Undoes every change made since `checkpoint`.
    fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint);
}
