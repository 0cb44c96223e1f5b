//! Tests for the owner-only administration operations.

mod common;

use alloy_primitives::{address, Address, Bytes, U256};
use alloy_sol_types::SolEvent;
use chained_account::{
    test_utils::{MockToken, TransferReturn},
    AccountError, Host, IChainedAccount,
};
use common::*;
use rstest::rstest;

const TOKEN: Address = address!("7000000000000000000000000000000000000007");
const TOKEN_BALANCE: u64 = 1_000;

fn with_token(returns: TransferReturn) -> Fixture {
    let mut fx = Fixture::new();
    fx.host.set_contract(TOKEN, MockToken::new(returns));
    MockToken::mint(&mut fx.host, TOKEN, ACCOUNT, U256::from(TOKEN_BALANCE));
    fx
}

#[test]
fn test_set_owner_emits_event() {
    let mut fx = Fixture::new();
    let previous = fx.owner();

    fx.account.set_owner(&mut fx.host, previous, RECEIVER).unwrap();

    assert_eq!(fx.account.owner(), RECEIVER);
    let [log] = fx.host.logs() else { panic!("expected exactly one log") };
    assert_eq!(log.address, ACCOUNT);
    let event = IChainedAccount::OwnerChanged::decode_log_data(&log.data, true).unwrap();
    assert_eq!(event.previousOwner, previous);
    assert_eq!(event.newOwner, RECEIVER);
}

#[rstest]
#[case::stranger(STRANGER)]
#[case::entry_point(ENTRY_POINT)]
fn test_set_owner_is_owner_only(#[case] caller: Address) {
    let mut fx = Fixture::new();
    let owner = fx.owner();

    let err = fx.account.set_owner(&mut fx.host, caller, caller).unwrap_err();

    assert_eq!(err, AccountError::Unauthorized { caller });
    assert_eq!(fx.account.owner(), owner);
    assert!(fx.host.logs().is_empty());
}

#[test]
fn test_set_owner_keeps_nonce_and_entry_point() {
    let mut fx = Fixture::new();
    let owner = fx.owner();

    fx.account.set_owner(&mut fx.host, owner, RECEIVER).unwrap();

    assert_eq!(fx.account.entry_point(), ENTRY_POINT);
    assert_eq!(fx.account.nonce(), U256::ZERO);
}

#[test]
fn test_withdraw_eth() {
    let mut fx = Fixture::new();
    let owner = fx.owner();

    fx.account.withdraw_eth(&mut fx.host, owner, RECEIVER, U256::from(250)).unwrap();

    assert_eq!(fx.host.balance(RECEIVER), U256::from(250));
    assert_eq!(fx.host.balance(ACCOUNT), U256::from(ACCOUNT_BALANCE - 250));
}

#[test]
fn test_withdraw_eth_beyond_balance_fails() {
    let mut fx = Fixture::new();
    let owner = fx.owner();

    let err = fx
        .account
        .withdraw_eth(&mut fx.host, owner, RECEIVER, U256::from(ACCOUNT_BALANCE + 1))
        .unwrap_err();

    assert_eq!(err, AccountError::TransferFailed { reason: Bytes::new() });
    assert_eq!(fx.host.balance(ACCOUNT), U256::from(ACCOUNT_BALANCE));
}

#[test]
fn test_withdraw_eth_to_reverting_receiver_fails() {
    let mut fx = Fixture::new();
    let owner = fx.owner();

    let err = fx.account.withdraw_eth(&mut fx.host, owner, REVERTER, U256::from(1)).unwrap_err();

    assert_eq!(err, AccountError::TransferFailed { reason: revert_payload() });
    assert_eq!(fx.host.balance(ACCOUNT), U256::from(ACCOUNT_BALANCE));
}

#[rstest]
#[case::stranger(STRANGER)]
#[case::entry_point(ENTRY_POINT)]
fn test_withdraw_is_owner_only(#[case] caller: Address) {
    let mut fx = with_token(TransferReturn::True);

    let err = fx.account.withdraw_eth(&mut fx.host, caller, caller, U256::from(1)).unwrap_err();
    assert_eq!(err, AccountError::Unauthorized { caller });

    let err =
        fx.account.withdraw_token(&mut fx.host, caller, TOKEN, caller, U256::from(1)).unwrap_err();
    assert_eq!(err, AccountError::Unauthorized { caller });

    assert_eq!(fx.host.balance(ACCOUNT), U256::from(ACCOUNT_BALANCE));
    assert_eq!(MockToken::balance_of(&fx.host, TOKEN, ACCOUNT), U256::from(TOKEN_BALANCE));
}

#[rstest]
#[case::returns_true(TransferReturn::True)]
#[case::returns_nothing(TransferReturn::Nothing)]
#[case::returns_true_with_trailing_data(TransferReturn::TrueWithTrailingData)]
fn test_withdraw_token(#[case] returns: TransferReturn) {
    let mut fx = with_token(returns);
    let owner = fx.owner();

    fx.account.withdraw_token(&mut fx.host, owner, TOKEN, RECEIVER, U256::from(400)).unwrap();

    assert_eq!(MockToken::balance_of(&fx.host, TOKEN, RECEIVER), U256::from(400));
    assert_eq!(MockToken::balance_of(&fx.host, TOKEN, ACCOUNT), U256::from(TOKEN_BALANCE - 400));
}

#[test]
fn test_withdraw_token_returning_false_fails() {
    let mut fx = with_token(TransferReturn::False);
    let owner = fx.owner();

    let err = fx
        .account
        .withdraw_token(&mut fx.host, owner, TOKEN, RECEIVER, U256::from(400))
        .unwrap_err();

    let AccountError::TransferFailed { reason } = &err else { panic!("unexpected {err:?}") };
    assert_eq!(reason.len(), 32);
    assert_eq!(MockToken::balance_of(&fx.host, TOKEN, ACCOUNT), U256::from(TOKEN_BALANCE));
}

#[test]
fn test_withdraw_token_beyond_balance_fails() {
    let mut fx = with_token(TransferReturn::True);
    let owner = fx.owner();

    let err = fx
        .account
        .withdraw_token(&mut fx.host, owner, TOKEN, RECEIVER, U256::from(TOKEN_BALANCE + 1))
        .unwrap_err();

    assert_eq!(err, AccountError::TransferFailed { reason: Bytes::new() });
    assert_eq!(MockToken::balance_of(&fx.host, TOKEN, RECEIVER), U256::ZERO);
}

#[test]
fn test_withdraw_token_from_address_without_code_fails() {
    let mut fx = Fixture::new();
    let owner = fx.owner();
    let not_a_token = Address::repeat_byte(0x77);

    let err = fx
        .account
        .withdraw_token(&mut fx.host, owner, not_a_token, RECEIVER, U256::from(400))
        .unwrap_err();

    assert_eq!(err, AccountError::TransferFailed { reason: Bytes::new() });
    assert!(!fx.host.is_contract(not_a_token));
}
