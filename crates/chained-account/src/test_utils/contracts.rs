//! Mock contracts for the [`InMemoryHost`](super::InMemoryHost).

use alloy_primitives::{keccak256, Address, Bytes, FixedBytes, B256, U256};
use alloy_sol_types::{SolInterface, SolValue};

use super::{InMemoryHost, MockCallContext, MockContract};
use crate::{
    constants::erc1271::MAGIC_VALUE, CallOutcome, IERC20::IERC20Calls, IERC1271::IERC1271Calls,
};

fn word(value: U256) -> Bytes {
    Bytes::copy_from_slice(&value.to_be_bytes::<32>())
}

fn read_word(data: &[u8]) -> U256 {
    if data.is_empty() {
        U256::ZERO
    } else {
        U256::from_be_slice(data)
    }
}

/// Always returns the same data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReturnData(pub Bytes);

impl MockContract for ReturnData {
    fn call(&self, _ctx: &mut MockCallContext<'_>, _input: &[u8]) -> CallOutcome {
        Ok(self.0.clone())
    }
}

/// Returns its input unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Echo;

impl MockContract for Echo {
    fn call(&self, _ctx: &mut MockCallContext<'_>, input: &[u8]) -> CallOutcome {
        Ok(Bytes::copy_from_slice(input))
    }
}

/// Always reverts with the given payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Revert(pub Bytes);

impl MockContract for Revert {
    fn call(&self, _ctx: &mut MockCallContext<'_>, _input: &[u8]) -> CallOutcome {
        Err(self.0.clone())
    }
}

/// Stores the last input, the last value and the number of calls it received, and returns the
/// new call count as an ABI word.
///
/// Everything lives in host storage, so a rolled-back call leaves no trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Recorder;

impl Recorder {
    const INPUT_SLOT: B256 = B256::ZERO;
    const COUNT_SLOT: B256 = B256::with_last_byte(1);
    const VALUE_SLOT: B256 = B256::with_last_byte(2);

    /// The last input the recorder at `address` received.
    pub fn last_input(host: &InMemoryHost, address: Address) -> Bytes {
        host.storage(address, Self::INPUT_SLOT)
    }

    /// The value attached to the last call the recorder at `address` received.
    pub fn last_value(host: &InMemoryHost, address: Address) -> U256 {
        read_word(&host.storage(address, Self::VALUE_SLOT))
    }

    /// How many calls the recorder at `address` received.
    pub fn call_count(host: &InMemoryHost, address: Address) -> u64 {
        read_word(&host.storage(address, Self::COUNT_SLOT)).to::<u64>()
    }
}

impl MockContract for Recorder {
    fn call(&self, ctx: &mut MockCallContext<'_>, input: &[u8]) -> CallOutcome {
        let count = read_word(&ctx.sload(Self::COUNT_SLOT)) + U256::from(1);
        ctx.sstore(Self::INPUT_SLOT, Bytes::copy_from_slice(input));
        ctx.sstore(Self::VALUE_SLOT, word(ctx.value));
        ctx.sstore(Self::COUNT_SLOT, word(count));
        Ok(word(count))
    }
}

/// An ERC-1271 owner contract that accepts or rejects every signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Erc1271Stub {
    /// Whether `isValidSignature` answers with the magic value.
    pub valid: bool,
}

impl Erc1271Stub {
    /// A contract that accepts any signature, including an empty one.
    pub const fn accepting() -> Self {
        Self { valid: true }
    }

    /// A contract that rejects every signature.
    pub const fn rejecting() -> Self {
        Self { valid: false }
    }
}

impl MockContract for Erc1271Stub {
    fn call(&self, _ctx: &mut MockCallContext<'_>, input: &[u8]) -> CallOutcome {
        match IERC1271Calls::abi_decode(input, true) {
            Ok(IERC1271Calls::isValidSignature(_)) if self.valid => {
                Ok(MAGIC_VALUE.abi_encode().into())
            }
            Ok(IERC1271Calls::isValidSignature(_)) => {
                Ok(FixedBytes::<4>::repeat_byte(0xff).abi_encode().into())
            }
            Err(_) => Err(Bytes::new()),
        }
    }
}

/// What a [`MockToken`] returns from a successful `transfer`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransferReturn {
    /// ABI-encoded `true`.
    #[default]
    True,
    /// ABI-encoded `false`, without moving any balance.
    False,
    /// Nothing, like tokens predating the final ERC-20 interface.
    Nothing,
    /// ABI-encoded `true` followed by an extra zero word.
    TrueWithTrailingData,
}

/// A minimal ERC-20 token keeping balances in host storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MockToken {
    /// The return convention of `transfer`.
    pub returns: TransferReturn,
}

impl MockToken {
    /// A token with the given `transfer` return convention.
    pub const fn new(returns: TransferReturn) -> Self {
        Self { returns }
    }

    fn balance_slot(holder: Address) -> B256 {
        keccak256(holder)
    }

    /// Credits `amount` to `holder` on the token at `token`.
    pub fn mint(host: &mut InMemoryHost, token: Address, holder: Address, amount: U256) {
        let balance = Self::balance_of(host, token, holder) + amount;
        host.set_storage(token, Self::balance_slot(holder), word(balance));
    }

    /// The balance of `holder` on the token at `token`.
    pub fn balance_of(host: &InMemoryHost, token: Address, holder: Address) -> U256 {
        read_word(&host.storage(token, Self::balance_slot(holder)))
    }
}

impl MockContract for MockToken {
    fn call(&self, ctx: &mut MockCallContext<'_>, input: &[u8]) -> CallOutcome {
        match IERC20Calls::abi_decode(input, true).map_err(|_| Bytes::new())? {
            IERC20Calls::balanceOf(call) => {
                Ok(word(read_word(&ctx.sload(Self::balance_slot(call.owner)))))
            }
            IERC20Calls::transfer(call) => {
                if self.returns == TransferReturn::False {
                    return Ok(false.abi_encode().into());
                }
                let from = ctx.caller;
                let from_balance = read_word(&ctx.sload(Self::balance_slot(from)));
                let Some(remaining) = from_balance.checked_sub(call.amount) else {
                    return Err(Bytes::new());
                };
                ctx.sstore(Self::balance_slot(from), word(remaining));
                let to_balance = read_word(&ctx.sload(Self::balance_slot(call.to)));
                ctx.sstore(Self::balance_slot(call.to), word(to_balance + call.amount));

                match self.returns {
                    TransferReturn::Nothing => Ok(Bytes::new()),
                    TransferReturn::TrueWithTrailingData => {
                        Ok((true, U256::ZERO).abi_encode_params().into())
                    }
                    TransferReturn::True | TransferReturn::False => Ok(true.abi_encode().into()),
                }
            }
        }
    }
}
