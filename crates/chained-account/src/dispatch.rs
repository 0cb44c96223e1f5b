//! ABI entry point of the account.
//!
//! Decodes raw call data against [`IChainedAccount`], routes it to the typed operation on
//! [`ChainedAccount`] and encodes the result the way a deployed contract would: ABI return data
//! on success, ABI custom-error data on revert.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolInterface, SolValue};
use tracing::debug;

use crate::{CallOutcome, ChainedAccount, Host, IChainedAccount::IChainedAccountCalls};

impl ChainedAccount {
    /// Handles a raw call to the account from `caller`.
    ///
    /// Empty input is a plain deposit and succeeds. Input that does not decode to a known
    /// function reverts with empty data.
    pub fn call<H: Host>(&mut self, host: &mut H, caller: Address, input: &[u8]) -> CallOutcome {
        if input.is_empty() {
            return Ok(Bytes::new());
        }
        let Ok(decoded) = IChainedAccountCalls::abi_decode(input, true) else {
            debug!(target: "chained_account::dispatch", %caller, "Unknown or malformed call");
            return Err(Bytes::new());
        };

        let output = match decoded {
            IChainedAccountCalls::execute_0(call) => self
                .execute(host, caller, call.target, call.value, call.data)
                .map(|result| result.abi_encode()),
            IChainedAccountCalls::execute_1(call) => {
                self.execute_batch(host, caller, &call.calls).map(|results| results.abi_encode())
            }
            IChainedAccountCalls::executeSigned(call) => self
                .execute_signed(host, &call.calls, call.nonce, call.deadline, &call.signature)
                .map(|results| results.abi_encode()),
            IChainedAccountCalls::validateUserOp(call) => self
                .validate_user_op(
                    host,
                    caller,
                    &call.userOp,
                    call.userOpHash,
                    call.missingAccountFunds,
                )
                .map(|validation| validation.to_u256().abi_encode()),
            IChainedAccountCalls::setOwner(call) => {
                self.set_owner(host, caller, call.newOwner).map(|()| Vec::new())
            }
            IChainedAccountCalls::withdrawETH(call) => {
                self.withdraw_eth(host, caller, call.to, call.amount).map(|()| Vec::new())
            }
            IChainedAccountCalls::withdrawToken(call) => self
                .withdraw_token(host, caller, call.token, call.to, call.amount)
                .map(|()| Vec::new()),
            IChainedAccountCalls::owner(_) => Ok(self.owner().abi_encode()),
            IChainedAccountCalls::entryPoint(_) => Ok(self.entry_point().abi_encode()),
            IChainedAccountCalls::nonce(_) => Ok(self.nonce().abi_encode()),
            IChainedAccountCalls::supportsInterface(call) => {
                Ok(self.supports_interface(call.interfaceId).abi_encode())
            }
        };

        output.map(Bytes::from).map_err(|err| {
            debug!(target: "chained_account::dispatch", %caller, %err, "Call reverted");
            err.encode_revert()
        })
    }
}
