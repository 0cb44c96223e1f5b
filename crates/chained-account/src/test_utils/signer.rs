use alloy_primitives::{Address, Bytes, B256, U256};
use k256::ecdsa::SigningKey;

use crate::{
    execute_signed_digest, public_key_to_address, sign_digest, to_eth_signed_message_hash, Call,
};

/// A deterministic ECDSA keypair for tests.
#[derive(Clone, Debug)]
pub struct TestSigner {
    key: SigningKey,
}

impl TestSigner {
    /// Creates the signer whose secret key is `seed` repeated 32 times.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is zero.
    pub fn from_seed(seed: u8) -> Self {
        let key = SigningKey::from_slice(&[seed; 32]).expect("non-zero seed is a valid key");
        Self { key }
    }

    /// The address of the signer.
    pub fn address(&self) -> Address {
        public_key_to_address(self.key.verifying_key())
    }

    /// Signs a raw digest.
    pub fn sign(&self, digest: B256) -> Bytes {
        sign_digest(&self.key, digest).expect("signing a 32-byte digest")
    }

    /// Signs an `executeSigned` operation for `account` on `chain_id`.
    pub fn sign_execute(
        &self,
        account: Address,
        chain_id: u64,
        calls: &[Call],
        nonce: U256,
        deadline: U256,
    ) -> Bytes {
        self.sign(execute_signed_digest(account, chain_id, calls, nonce, deadline))
    }

    /// Signs a user operation hash the way wallets do, as an EIP-191 personal message.
    pub fn sign_user_op_hash(&self, user_op_hash: B256) -> Bytes {
        self.sign(to_eth_signed_message_hash(user_op_hash))
    }
}

impl Default for TestSigner {
    fn default() -> Self {
        Self::from_seed(1)
    }
}
