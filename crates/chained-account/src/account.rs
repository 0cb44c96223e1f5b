use alloy_primitives::{Address, Bytes, FixedBytes, Log, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use tracing::{debug, info, warn};

use crate::{
    execute_pipeline, execute_signed_digest, to_eth_signed_message_hash, AccountError,
    AccountState, Call, Host, IAccount, IChainedAccount, IERC165, IERC20, PackedUserOperation,
    SignatureVerifier, ValidationData,
};

/// A chained account: its address plus the state persisted between invocations.
///
/// Every operation takes the [`Host`] it runs in and the immediate caller explicitly. Operations
/// returning [`AccountError`] are transactional: on error both the host journal and the account
/// state are restored to where they were before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainedAccount {
    address: Address,
    state: AccountState,
}

impl ChainedAccount {
    /// Creates a fresh account at `address` with a zero nonce.
    pub const fn new(address: Address, owner: Address, entry_point: Address) -> Self {
        Self { address, state: AccountState::new(owner, entry_point) }
    }

    /// Restores an account from its persisted state.
    pub const fn from_state(address: Address, state: AccountState) -> Self {
        Self { address, state }
    }

    /// The address of the account.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The persisted state of the account.
    pub const fn state(&self) -> &AccountState {
        &self.state
    }

    /// The current owner.
    pub const fn owner(&self) -> Address {
        self.state.owner
    }

    /// The account-abstraction entry point.
    pub const fn entry_point(&self) -> Address {
        self.state.entry_point
    }

    /// The current replay-protection nonce.
    pub const fn nonce(&self) -> U256 {
        self.state.nonce
    }

    /// Returns `true` for the ERC-165 and `IAccount` interface identifiers.
    pub fn supports_interface(&self, interface_id: FixedBytes<4>) -> bool {
        interface_id.0 == IERC165::supportsInterfaceCall::SELECTOR
            || interface_id.0 == IAccount::validateUserOpCall::SELECTOR
    }

    /// Computes the digest the owner must sign for [`Self::execute_signed`] on the given chain.
    pub fn signing_digest(
        &self,
        chain_id: u64,
        calls: &[Call],
        nonce: U256,
        deadline: U256,
    ) -> B256 {
        execute_signed_digest(self.address, chain_id, calls, nonce, deadline)
    }

    /// Dispatches a single call. Only the owner or the entry point may call this.
    ///
    /// A failing call is reported as [`AccountError::CallFailed`] with index `0`.
    pub fn execute<H: Host>(
        &mut self,
        host: &mut H,
        caller: Address,
        target: Address,
        value: U256,
        data: Bytes,
    ) -> Result<Bytes, AccountError> {
        self.transact(host, |account, host| {
            account.ensure_owner_or_entry_point(caller)?;
            debug!(target: "chained_account::account", callee = %target, %value, "Direct call");
            host.invoke(account.address, target, value, data)
                .map_err(|reason| AccountError::CallFailed { index: 0, reason })
        })
    }

    /// Runs `calls` as a pipeline. Only the owner or the entry point may call this.
    ///
    /// No signature and no nonce are involved on this path.
    pub fn execute_batch<H: Host>(
        &mut self,
        host: &mut H,
        caller: Address,
        calls: &[Call],
    ) -> Result<Vec<Bytes>, AccountError> {
        self.transact(host, |account, host| {
            account.ensure_owner_or_entry_point(caller)?;
            execute_pipeline(host, account.address, account.state.nonce, calls)
        })
    }

    /// Runs an owner-signed pipeline on behalf of anyone.
    ///
    /// Checks run before anything is mutated, cheapest first: the deadline (`0` never expires),
    /// then the signature over [`Self::signing_digest`], then strict nonce equality. Only then is
    /// the nonce advanced and the pipeline run.
    pub fn execute_signed<H: Host>(
        &mut self,
        host: &mut H,
        calls: &[Call],
        nonce: U256,
        deadline: U256,
        signature: &[u8],
    ) -> Result<Vec<Bytes>, AccountError> {
        self.transact(host, |account, host| {
            let block = host.block();
            if !deadline.is_zero() && U256::from(block.timestamp) > deadline {
                debug!(
                    target: "chained_account::account",
                    %deadline,
                    timestamp = block.timestamp,
                    "Signed operation expired"
                );
                return Err(AccountError::InvalidSignature);
            }

            let digest = account.signing_digest(block.chain_id, calls, nonce, deadline);
            if !account.verify_owner_signature(host, digest, signature) {
                return Err(AccountError::InvalidSignature);
            }

            if nonce != account.state.nonce {
                return Err(AccountError::InvalidNonce {
                    expected: account.state.nonce,
                    provided: nonce,
                });
            }
            account.advance_nonce();

            execute_pipeline(host, account.address, account.state.nonce, calls)
        })
    }

    /// The ERC-4337 validation handshake. Only the entry point may call this.
    ///
    /// A bad signature or a nonce mismatch is reported as [`ValidationData::Failed`] and changes
    /// nothing. On success the nonce is advanced and `missing_funds` is sent to the entry point.
    /// A failed prefund transfer is ignored: covering an underfunded account is the entry
    /// point's job. The operation's call data is not executed here.
    pub fn validate_user_op<H: Host>(
        &mut self,
        host: &mut H,
        caller: Address,
        user_op: &PackedUserOperation,
        user_op_hash: B256,
        missing_funds: U256,
    ) -> Result<ValidationData, AccountError> {
        self.transact(host, |account, host| {
            if caller != account.state.entry_point {
                return Err(AccountError::Unauthorized { caller });
            }

            let digest = to_eth_signed_message_hash(user_op_hash);
            if !account.verify_owner_signature(host, digest, &user_op.signature) {
                debug!(
                    target: "chained_account::account",
                    %user_op_hash,
                    "User operation signature rejected"
                );
                return Ok(ValidationData::Failed);
            }
            if user_op.nonce != account.state.nonce {
                debug!(
                    target: "chained_account::account",
                    expected = %account.state.nonce,
                    provided = %user_op.nonce,
                    "User operation nonce rejected"
                );
                return Ok(ValidationData::Failed);
            }
            account.advance_nonce();

            if !missing_funds.is_zero() {
                let entry_point = account.state.entry_point;
                if let Err(reason) =
                    host.invoke(account.address, entry_point, missing_funds, Bytes::new())
                {
                    warn!(
                        target: "chained_account::account",
                        %entry_point,
                        %missing_funds,
                        %reason,
                        "Prefund transfer failed, ignoring"
                    );
                }
            }

            Ok(ValidationData::Success)
        })
    }

    /// Replaces the owner. Only the current owner may call this.
    pub fn set_owner<H: Host>(
        &mut self,
        host: &mut H,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), AccountError> {
        self.transact(host, |account, host| {
            account.ensure_owner(caller)?;
            let previous_owner = account.state.owner;
            account.state.owner = new_owner;

            let event = IChainedAccount::OwnerChanged {
                previousOwner: previous_owner,
                newOwner: new_owner,
            };
            host.log(Log { address: account.address, data: event.encode_log_data() });
            info!(
                target: "chained_account::account",
                %previous_owner,
                %new_owner,
                "Owner changed"
            );
            Ok(())
        })
    }

    /// Sends `amount` of native currency to `to`. Only the owner may call this.
    pub fn withdraw_eth<H: Host>(
        &mut self,
        host: &mut H,
        caller: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), AccountError> {
        self.transact(host, |account, host| {
            account.ensure_owner(caller)?;
            host.invoke(account.address, to, amount, Bytes::new())
                .map(drop)
                .map_err(|reason| AccountError::TransferFailed { reason })
        })
    }

    /// Transfers `amount` of `token` to `to` through the token's `transfer` function. Only the
    /// owner may call this.
    ///
    /// Tokens that return nothing are accepted; tokens whose first return word is anything but
    /// `true` are not. A `token` without code is rejected.
    pub fn withdraw_token<H: Host>(
        &mut self,
        host: &mut H,
        caller: Address,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), AccountError> {
        self.transact(host, |account, host| {
            account.ensure_owner(caller)?;
            let input = IERC20::transferCall { to, amount }.abi_encode();
            let output = host
                .invoke(account.address, token, U256::ZERO, input.into())
                .map_err(|reason| AccountError::TransferFailed { reason })?;
            if output.is_empty() {
                // A call to an address without code succeeds with empty data.
                if !host.is_contract(token) {
                    return Err(AccountError::TransferFailed { reason: Bytes::new() });
                }
                return Ok(());
            }
            // Only the first word counts, trailing return data is ignored.
            let accepted =
                output.len() >= 32 && bool::abi_decode(&output[..32], true).unwrap_or(false);
            if !accepted {
                return Err(AccountError::TransferFailed { reason: output });
            }
            Ok(())
        })
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), AccountError> {
        if caller == self.state.owner {
            Ok(())
        } else {
            Err(AccountError::Unauthorized { caller })
        }
    }

    fn ensure_owner_or_entry_point(&self, caller: Address) -> Result<(), AccountError> {
        if caller == self.state.owner || caller == self.state.entry_point {
            Ok(())
        } else {
            Err(AccountError::Unauthorized { caller })
        }
    }

    fn verify_owner_signature<H: Host>(
        &self,
        host: &mut H,
        digest: B256,
        signature: &[u8],
    ) -> bool {
        SignatureVerifier::for_owner(host, self.state.owner).verify(
            host,
            self.address,
            digest,
            signature,
        )
    }

    fn advance_nonce(&mut self) {
        self.state.nonce += U256::from(1);
        info!(target: "chained_account::account", nonce = %self.state.nonce, "Nonce advanced");
    }

    /// Runs `f` as one transaction: on error the host journal and the account state are rolled
    /// back.
    fn transact<H, T, F>(&mut self, host: &mut H, f: F) -> Result<T, AccountError>
    where
        H: Host,
        F: FnOnce(&mut Self, &mut H) -> Result<T, AccountError>,
    {
        let checkpoint = host.checkpoint();
        let snapshot = self.state;
        match f(self, host) {
            Ok(value) => {
                host.checkpoint_commit();
                Ok(value)
            }
            Err(err) => {
                host.checkpoint_revert(checkpoint);
                self.state = snapshot;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, fixed_bytes};

    const OWNER: Address = address!("00000000000000000000000000000000000000aa");
    const ENTRY_POINT: Address = address!("0000000071727De22E5E9d8BAf0edAc6f37da032");

    #[test]
    fn test_supports_interface() {
        let account = ChainedAccount::new(Address::repeat_byte(1), OWNER, ENTRY_POINT);

        assert!(account.supports_interface(fixed_bytes!("01ffc9a7")));
        assert!(account.supports_interface(fixed_bytes!("19822f7c")));
        assert!(!account.supports_interface(fixed_bytes!("ffffffff")));
        assert!(!account.supports_interface(fixed_bytes!("1626ba7e")));
    }

    #[test]
    fn test_new_account_state() {
        let account = ChainedAccount::new(Address::repeat_byte(1), OWNER, ENTRY_POINT);

        assert_eq!(account.owner(), OWNER);
        assert_eq!(account.entry_point(), ENTRY_POINT);
        assert_eq!(account.nonce(), U256::ZERO);
        assert_eq!(ChainedAccount::from_state(account.address(), *account.state()), account);
    }
}
