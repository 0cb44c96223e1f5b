//! The call pipeline.
//!
//! Calls run strictly in order. Before a call is dispatched, its injection rules are applied
//! against the results collected so far. The first failing call aborts the pipeline and rolls
//! back everything the earlier calls did.

use alloy_primitives::{keccak256, Address, Bytes, Log, B256, U256};
use alloy_sol_types::{SolEvent, SolValue};
use tracing::debug;

use crate::{apply_injections, AccountError, Call, Host, IChainedAccount};

/// Per-invocation record of call results, one slot per call.
///
/// Slots start empty and are filled as calls complete, so a rule pointing at a call that has
/// not run yet reads an empty source.
#[derive(Clone, Debug, Default, PartialEq, Eq, derive_more::Deref)]
pub struct ExecutionContext {
    results: Vec<Bytes>,
}

impl ExecutionContext {
    /// Creates a context with `len` empty result slots.
    pub fn new(len: usize) -> Self {
        Self { results: vec![Bytes::new(); len] }
    }

    /// Returns the input to dispatch for `call`, with its injection rules applied.
    pub fn patched_input(&self, call: &Call) -> Bytes {
        if call.injections.is_empty() {
            return call.callData.clone();
        }
        apply_injections(&call.callData, &call.injections, &self.results)
    }

    /// Stores the result of the call at `index`.
    pub fn record(&mut self, index: usize, result: Bytes) {
        self.results[index] = result;
    }

    /// Consumes the context and returns the collected results.
    pub fn into_results(self) -> Vec<Bytes> {
        self.results
    }
}

/// Derives the session identifier carried by the `ChainExecuted` event.
///
/// Only meant for indexing, it carries no security property.
pub fn session_id(timestamp: u64, prevrandao: B256, nonce: U256) -> B256 {
    keccak256((U256::from(timestamp), prevrandao, nonce).abi_encode_packed())
}

/// Runs `calls` from `account` and returns their raw results in order.
///
/// The pipeline is atomic: if any call fails, every change made by the earlier calls is rolled
/// back through the host journal and [`AccountError::CallFailed`] carries the index and raw
/// revert payload of the failing call. On success a `ChainExecuted` log is emitted, whose
/// session identifier is derived from `nonce`.
pub fn execute_pipeline<H: Host>(
    host: &mut H,
    account: Address,
    nonce: U256,
    calls: &[Call],
) -> Result<Vec<Bytes>, AccountError> {
    let checkpoint = host.checkpoint();
    let mut context = ExecutionContext::new(calls.len());

    for (index, call) in calls.iter().enumerate() {
        let input = context.patched_input(call);
        debug!(
            target: "chained_account::pipeline",
            index,
            callee = %call.target,
            value = %call.value,
            input_len = input.len(),
            injections = call.injections.len(),
            "Dispatching call"
        );

        match host.invoke(account, call.target, call.value, input) {
            Ok(result) => context.record(index, result),
            Err(reason) => {
                debug!(target: "chained_account::pipeline", index, %reason, "Call failed");
                host.checkpoint_revert(checkpoint);
                return Err(AccountError::CallFailed { index, reason });
            }
        }
    }

    let block = host.block();
    let event = IChainedAccount::ChainExecuted {
        callCount: U256::from(calls.len()),
        sessionId: session_id(block.timestamp, block.prevrandao, nonce),
    };
    host.log(Log { address: account, data: event.encode_log_data() });
    host.checkpoint_commit();

    Ok(context.into_results())
}
