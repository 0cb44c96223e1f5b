//! Error types of the chained account.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolError;

use crate::IChainedAccount;

/// Errors that abort an account operation.
///
/// Every variant maps to a custom error of [`IChainedAccount`], see
/// [`AccountError::encode_revert`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// The caller is not allowed on this path.
    #[error("unauthorized caller {caller}")]
    Unauthorized {
        /// The rejected caller
        caller: Address,
    },
    /// A dispatched call failed. The pipeline and everything it did is rolled back.
    #[error("call {index} failed with {reason}")]
    CallFailed {
        /// Zero-based position of the failing call
        index: usize,
        /// Raw failure payload of the call, untouched
        reason: Bytes,
    },
    /// The signature does not belong to the owner, or the signed operation expired.
    #[error("invalid signature")]
    InvalidSignature,
    /// The supplied nonce is not the current nonce of the account.
    #[error("invalid nonce: expected {expected}, provided {provided}")]
    InvalidNonce {
        /// The current nonce of the account
        expected: U256,
        /// The nonce carried by the operation
        provided: U256,
    },
    /// Moving native currency or tokens out of the account failed.
    #[error("transfer failed with {reason}")]
    TransferFailed {
        /// Raw failure payload of the transfer
        reason: Bytes,
    },
}

impl AccountError {
    /// Encodes the error as ABI revert data using the custom errors of [`IChainedAccount`].
    pub fn encode_revert(&self) -> Bytes {
        match self {
            Self::Unauthorized { .. } => IChainedAccount::Unauthorized {}.abi_encode().into(),
            Self::CallFailed { index, reason } => {
                IChainedAccount::CallFailed { index: U256::from(*index), reason: reason.clone() }
                    .abi_encode()
                    .into()
            }
            Self::InvalidSignature => IChainedAccount::InvalidSignature {}.abi_encode().into(),
            Self::InvalidNonce { .. } => IChainedAccount::InvalidNonce {}.abi_encode().into(),
            Self::TransferFailed { reason } => {
                IChainedAccount::TransferFailed { reason: reason.clone() }.abi_encode().into()
            }
        }
    }
}
