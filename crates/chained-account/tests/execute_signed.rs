//! Tests for permissionless execution of owner-signed call lists.

mod common;

use alloy_primitives::{address, bytes, Address, Bytes, U256};
use chained_account::{
    test_utils::{Erc1271Stub, Recorder, TestSigner},
    AccountError, Call, ChainedAccount,
};
use common::*;
use rstest::rstest;

const OWNER_CONTRACT: Address = address!("0c00000000000000000000000000000000000001");

fn calls() -> Vec<Call> {
    vec![Call::new(RECORDER, U256::from(3), bytes!("01"))]
}

fn sign(fx: &Fixture, calls: &[Call], nonce: u64, deadline: u64) -> Bytes {
    fx.signer.sign_execute(ACCOUNT, CHAIN_ID, calls, U256::from(nonce), U256::from(deadline))
}

/// A fixture whose owner is a contract answering every `isValidSignature` query with `stub`.
fn contract_owned(stub: Erc1271Stub) -> Fixture {
    let mut fx = Fixture::new();
    fx.host.set_contract(OWNER_CONTRACT, stub);
    fx.account = ChainedAccount::new(ACCOUNT, OWNER_CONTRACT, ENTRY_POINT);
    fx
}

#[test]
fn test_anyone_can_relay_a_signed_call_list() {
    let mut fx = Fixture::new();
    let calls = calls();
    let signature = sign(&fx, &calls, 0, 0);

    let results = fx
        .account
        .execute_signed(&mut fx.host, &calls, U256::ZERO, U256::ZERO, &signature)
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(Recorder::call_count(&fx.host, RECORDER), 1);
    assert_eq!(Recorder::last_value(&fx.host, RECORDER), U256::from(3));
    assert_eq!(fx.account.nonce(), U256::from(1));
}

#[test]
fn test_replay_is_rejected() {
    let mut fx = Fixture::new();
    let calls = calls();
    let signature = sign(&fx, &calls, 0, 0);
    fx.account.execute_signed(&mut fx.host, &calls, U256::ZERO, U256::ZERO, &signature).unwrap();

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls, U256::ZERO, U256::ZERO, &signature)
        .unwrap_err();

    assert_eq!(err, AccountError::InvalidNonce { expected: U256::from(1), provided: U256::ZERO });
    assert_eq!(fx.account.nonce(), U256::from(1));
    assert_eq!(Recorder::call_count(&fx.host, RECORDER), 1);
}

#[test]
fn test_future_nonce_is_rejected() {
    let mut fx = Fixture::new();
    let calls = calls();
    let signature = sign(&fx, &calls, 1, 0);

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls, U256::from(1), U256::ZERO, &signature)
        .unwrap_err();

    assert_eq!(err, AccountError::InvalidNonce { expected: U256::ZERO, provided: U256::from(1) });
    assert_eq!(fx.account.nonce(), U256::ZERO);
}

#[test]
fn test_nonce_counts_accepted_operations() {
    let mut fx = Fixture::new();
    let calls = calls();

    for nonce in 0..5 {
        let signature = sign(&fx, &calls, nonce, 0);
        fx.account
            .execute_signed(&mut fx.host, &calls, U256::from(nonce), U256::ZERO, &signature)
            .unwrap();
    }

    assert_eq!(fx.account.nonce(), U256::from(5));
    assert_eq!(Recorder::call_count(&fx.host, RECORDER), 5);
}

#[test]
fn test_signature_from_other_key_is_rejected() {
    let mut fx = Fixture::new();
    let calls = calls();
    let signature = TestSigner::from_seed(2).sign_execute(
        ACCOUNT,
        CHAIN_ID,
        &calls,
        U256::ZERO,
        U256::ZERO,
    );

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls, U256::ZERO, U256::ZERO, &signature)
        .unwrap_err();

    assert_eq!(err, AccountError::InvalidSignature);
    assert_eq!(fx.account.nonce(), U256::ZERO);
    assert_eq!(Recorder::call_count(&fx.host, RECORDER), 0);
}

#[rstest]
#[case::other_chain(ACCOUNT, CHAIN_ID + 1)]
#[case::other_account(STRANGER, CHAIN_ID)]
fn test_signature_is_bound_to_account_and_chain(#[case] account: Address, #[case] chain_id: u64) {
    let mut fx = Fixture::new();
    let calls = calls();
    let signature = fx.signer.sign_execute(account, chain_id, &calls, U256::ZERO, U256::ZERO);

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls, U256::ZERO, U256::ZERO, &signature)
        .unwrap_err();

    assert_eq!(err, AccountError::InvalidSignature);
}

#[test]
fn test_signature_is_bound_to_calls() {
    let mut fx = Fixture::new();
    let signature = sign(&fx, &calls(), 0, 0);
    let tampered = vec![Call::new(RECEIVER, U256::from(3), bytes!("01"))];

    let err = fx
        .account
        .execute_signed(&mut fx.host, &tampered, U256::ZERO, U256::ZERO, &signature)
        .unwrap_err();

    assert_eq!(err, AccountError::InvalidSignature);
    assert_eq!(fx.account.nonce(), U256::ZERO);
}

#[rstest]
#[case::empty(Bytes::new())]
#[case::short(bytes!("deadbeef"))]
#[case::garbage(Bytes::from(vec![0x11; 65]))]
fn test_malformed_signature_is_rejected(#[case] signature: Bytes) {
    let mut fx = Fixture::new();

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls(), U256::ZERO, U256::ZERO, &signature)
        .unwrap_err();

    assert_eq!(err, AccountError::InvalidSignature);
}

#[test]
fn test_expired_deadline_is_rejected_before_signature() {
    let mut fx = Fixture::new();
    let calls = calls();
    let deadline = TIMESTAMP - 1;
    let signature = sign(&fx, &calls, 0, deadline);

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls, U256::ZERO, U256::from(deadline), &signature)
        .unwrap_err();
    assert_eq!(err, AccountError::InvalidSignature);

    // Same result with garbage instead of a signature.
    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls, U256::ZERO, U256::from(deadline), &[])
        .unwrap_err();
    assert_eq!(err, AccountError::InvalidSignature);
    assert_eq!(fx.account.nonce(), U256::ZERO);
}

#[rstest]
#[case::at_deadline(TIMESTAMP)]
#[case::before_deadline(TIMESTAMP + 60)]
fn test_unexpired_deadline_is_accepted(#[case] deadline: u64) {
    let mut fx = Fixture::new();
    let calls = calls();
    let signature = sign(&fx, &calls, 0, deadline);

    fx.account
        .execute_signed(&mut fx.host, &calls, U256::ZERO, U256::from(deadline), &signature)
        .unwrap();

    assert_eq!(fx.account.nonce(), U256::from(1));
}

#[test]
fn test_zero_deadline_never_expires() {
    let mut fx = Fixture::new();
    let calls = calls();
    let signature = sign(&fx, &calls, 0, 0);
    fx.host.set_timestamp(u64::MAX);

    fx.account.execute_signed(&mut fx.host, &calls, U256::ZERO, U256::ZERO, &signature).unwrap();

    assert_eq!(fx.account.nonce(), U256::from(1));
}

#[test]
fn test_failed_pipeline_keeps_nonce() {
    let mut fx = Fixture::new();
    let calls = vec![
        Call::new(RECORDER, U256::ZERO, bytes!("01")),
        Call::new(REVERTER, U256::ZERO, bytes!("02")),
    ];
    let signature = sign(&fx, &calls, 0, 0);

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls, U256::ZERO, U256::ZERO, &signature)
        .unwrap_err();

    assert_eq!(err, AccountError::CallFailed { index: 1, reason: revert_payload() });
    assert_eq!(fx.account.nonce(), U256::ZERO);
    assert_eq!(Recorder::call_count(&fx.host, RECORDER), 0);
}

#[rstest]
#[case::empty(Bytes::new())]
#[case::arbitrary(bytes!("0123456789"))]
#[case::keypair_signature(TestSigner::from_seed(9).sign(Default::default()))]
fn test_contract_owner_accepting_any_bytes(#[case] signature: Bytes) {
    let mut fx = contract_owned(Erc1271Stub::accepting());

    fx.account
        .execute_signed(&mut fx.host, &calls(), U256::ZERO, U256::ZERO, &signature)
        .unwrap();

    assert_eq!(fx.account.nonce(), U256::from(1));
    assert_eq!(Recorder::call_count(&fx.host, RECORDER), 1);
}

#[test]
fn test_contract_owner_rejecting() {
    let mut fx = contract_owned(Erc1271Stub::rejecting());
    let calls = calls();
    // A valid signature by a keypair does not matter once the owner is a contract.
    let signature = sign(&fx, &calls, 0, 0);

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls, U256::ZERO, U256::ZERO, &signature)
        .unwrap_err();

    assert_eq!(err, AccountError::InvalidSignature);
    assert_eq!(fx.account.nonce(), U256::ZERO);
}

#[test]
fn test_contract_owner_that_reverts_rejects() {
    let mut fx = Fixture::new();
    fx.account = ChainedAccount::new(ACCOUNT, REVERTER, ENTRY_POINT);

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls(), U256::ZERO, U256::ZERO, &[])
        .unwrap_err();

    assert_eq!(err, AccountError::InvalidSignature);
}

#[test]
fn test_contract_owner_with_short_answer_rejects() {
    let mut fx = Fixture::new();
    // Echo answers with the query itself: the selector followed by the digest.
    fx.account = ChainedAccount::new(ACCOUNT, ECHO, ENTRY_POINT);

    let err = fx
        .account
        .execute_signed(&mut fx.host, &calls(), U256::ZERO, U256::ZERO, &[])
        .unwrap_err();

    assert_eq!(err, AccountError::InvalidSignature);
}
