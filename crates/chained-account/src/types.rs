use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::constants::erc4337::{SIG_VALIDATION_FAILED, SIG_VALIDATION_SUCCESS};

/// The persisted state of a chained account.
///
/// `entry_point` is fixed when the account is created. `nonce` only moves forward, by exactly
/// one per operation accepted on the `validateUserOp` or `executeSigned` path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    /// The controlling identity, either a plain keypair address or an ERC-1271 contract.
    pub owner: Address,
    /// The account-abstraction entry point.
    pub entry_point: Address,
    /// Replay-protection counter shared by the two signature-checked paths.
    pub nonce: U256,
}

impl AccountState {
    /// Creates the state of a freshly deployed account.
    pub const fn new(owner: Address, entry_point: Address) -> Self {
        Self { owner, entry_point, nonce: U256::ZERO }
    }
}

/// The block environment visible to the account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    /// Chain identifier (CHAINID opcode).
    pub chain_id: u64,
    /// Block timestamp (TIMESTAMP opcode).
    pub timestamp: u64,
    /// Previous block randomness (PREVRANDAO opcode).
    pub prevrandao: B256,
}

/// Result of the `validateUserOp` handshake.
///
/// A rejected operation is reported through this value instead of an error so the entry point
/// can decide what to do with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationData {
    /// Signature and nonce were accepted and the nonce was advanced.
    #[display("success")]
    Success,
    /// Signature or nonce was rejected. Nothing was changed.
    #[display("failed")]
    Failed,
}

impl ValidationData {
    /// Returns the `validationData` word the entry point expects.
    pub const fn to_u256(self) -> U256 {
        match self {
            Self::Success => SIG_VALIDATION_SUCCESS,
            Self::Failed => SIG_VALIDATION_FAILED,
        }
    }

    /// Returns `true` if the operation was accepted.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}
