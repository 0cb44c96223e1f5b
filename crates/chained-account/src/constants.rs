//! Constants for the chained account.
//!
//! Grouped by the standard they come from.

/// Constants of the ERC-4337 account-abstraction handshake.
pub mod erc4337 {
    use alloy_primitives::U256;

    /// `validationData` returned by `validateUserOp` when the operation is accepted.
    pub const SIG_VALIDATION_SUCCESS: U256 = U256::ZERO;

    /// `validationData` returned by `validateUserOp` when the signature or nonce is rejected.
    pub const SIG_VALIDATION_FAILED: U256 = U256::from_limbs([1, 0, 0, 0]);
}

/// Constants of the ERC-1271 delegated signature validity query.
pub mod erc1271 {
    use alloy_primitives::{b256, fixed_bytes, FixedBytes, B256};

    /// The value a contract owner returns from `isValidSignature` to accept a signature.
    pub const MAGIC_VALUE: FixedBytes<4> = fixed_bytes!("1626ba7e");

    /// [`MAGIC_VALUE`] as the first ABI word of the return data, left aligned.
    pub const MAGIC_VALUE_WORD: B256 =
        b256!("1626ba7e00000000000000000000000000000000000000000000000000000000");
}

/// Constants of plain-keypair ECDSA signatures.
pub mod ecdsa {
    /// Length of an `r || s || v` signature.
    pub const SIGNATURE_LENGTH: usize = 65;

    /// Offset added to the recovery id in the `v` byte.
    pub const V_OFFSET: u8 = 27;
}
