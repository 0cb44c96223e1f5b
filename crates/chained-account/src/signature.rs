//! Signature checks against the account owner.
//!
//! The owner is either a plain keypair, checked by ECDSA recovery, or a contract, asked through
//! an ERC-1271 `isValidSignature` query. [`SignatureVerifier::for_owner`] picks the mode from
//! whether the owner has code.

use alloy_primitives::{eip191_hash_message, keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use tracing::trace;

use crate::{
    constants::{
        ecdsa::{SIGNATURE_LENGTH, V_OFFSET},
        erc1271::MAGIC_VALUE_WORD,
    },
    Call, Host, IERC1271,
};

/// Wraps a 32-byte hash into an EIP-191 personal-message digest.
pub fn to_eth_signed_message_hash(hash: B256) -> B256 {
    eip191_hash_message(hash)
}

/// Computes the digest an owner signs to authorize `executeSigned`.
///
/// The digest binds the signature to the account, the chain, the exact call list and the
/// nonce/deadline pair:
/// `eip191(keccak256(abi.encode(account, chainId, calls, nonce, deadline)))`.
pub fn execute_signed_digest(
    account: Address,
    chain_id: u64,
    calls: &[Call],
    nonce: U256,
    deadline: U256,
) -> B256 {
    let encoded =
        (account, U256::from(chain_id), calls.to_vec(), nonce, deadline).abi_encode_params();
    to_eth_signed_message_hash(keccak256(encoded))
}

/// Derives the address of an ECDSA public key: `keccak256(x || y)[12..]`.
pub fn public_key_to_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 prefix of the uncompressed point.
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recovers the signer of a 65-byte `r || s || v` signature over `digest`.
///
/// Returns `None` for malformed signatures, for `v` outside `{27, 28}` and for signatures with
/// a high `s` value.
pub fn recover_signer(digest: B256, signature: &[u8]) -> Option<Address> {
    if signature.len() != SIGNATURE_LENGTH {
        return None;
    }
    let v = signature[64];
    if v != V_OFFSET && v != V_OFFSET + 1 {
        return None;
    }
    let recovery_id = RecoveryId::from_byte(v - V_OFFSET)?;
    let signature = Signature::from_slice(&signature[..64]).ok()?;
    if signature.normalize_s().is_some() {
        return None;
    }
    let key =
        VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id).ok()?;
    Some(public_key_to_address(&key))
}

/// Signs `digest` with `key` and returns the 65-byte `r || s || v` signature.
pub fn sign_digest(key: &SigningKey, digest: B256) -> Result<Bytes, k256::ecdsa::Error> {
    let (signature, recovery_id) = key.sign_prehash_recoverable(digest.as_slice())?;
    let mut out = Vec::with_capacity(SIGNATURE_LENGTH);
    out.extend_from_slice(&signature.to_bytes());
    out.push(recovery_id.to_byte() + V_OFFSET);
    Ok(out.into())
}

/// The two ways an owner proves a signature is theirs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignatureVerifier {
    /// The owner is a plain keypair; the signer recovered from the signature must match.
    Ecdsa {
        /// The expected signer
        signer: Address,
    },
    /// The owner is a contract; its `isValidSignature` answer decides.
    Erc1271 {
        /// The owner contract
        contract: Address,
    },
}

impl SignatureVerifier {
    /// Chooses the verification mode for `owner`.
    pub fn for_owner<H: Host>(host: &H, owner: Address) -> Self {
        if host.is_contract(owner) {
            Self::Erc1271 { contract: owner }
        } else {
            Self::Ecdsa { signer: owner }
        }
    }

    /// Returns `true` if `signature` over `digest` is authentic.
    ///
    /// The ERC-1271 query is sent from `account` with no value attached. It passes only if the
    /// call succeeds and its first return word is the magic value.
    pub fn verify<H: Host>(
        &self,
        host: &mut H,
        account: Address,
        digest: B256,
        signature: &[u8],
    ) -> bool {
        match *self {
            Self::Ecdsa { signer } => {
                let recovered = recover_signer(digest, signature);
                trace!(
                    target: "chained_account::signature",
                    ?recovered,
                    %signer,
                    "ECDSA check"
                );
                recovered == Some(signer)
            }
            Self::Erc1271 { contract } => {
                let query = IERC1271::isValidSignatureCall {
                    hash: digest,
                    signature: Bytes::copy_from_slice(signature),
                };
                let outcome =
                    host.invoke(account, contract, U256::ZERO, query.abi_encode().into());
                trace!(
                    target: "chained_account::signature",
                    %contract,
                    ?outcome,
                    "ERC-1271 check"
                );
                matches!(
                    outcome,
                    Ok(data) if data.len() >= 32 && data[..32] == MAGIC_VALUE_WORD[..]
                )
            }
        }
    }
}
