use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes, U256};
use chained_account::{
    test_utils::{
        Echo, Erc1271Stub, InMemoryHost, MockToken, Recorder, Revert, ReturnData, TransferReturn,
    },
    BlockInfo, Call,
};
use serde::{Deserialize, Serialize};

/// How the call list enters the account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// `execute(calls)` from the owner, the entry point or `caller`
    #[default]
    Execute,
    /// `executeSigned` relayed by anyone, signed with the CLI key
    Signed,
}

/// What a token returns from `transfer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenReturn {
    /// `true`
    #[default]
    True,
    /// `false`
    False,
    /// Nothing
    Nothing,
}

impl From<TokenReturn> for TransferReturn {
    fn from(value: TokenReturn) -> Self {
        match value {
            TokenReturn::True => Self::True,
            TokenReturn::False => Self::False,
            TokenReturn::Nothing => Self::Nothing,
        }
    }
}

/// A scripted contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContractKind {
    /// Returns its input
    Echo,
    /// Always returns `data`
    ReturnData {
        /// The return data
        data: Bytes,
    },
    /// Always reverts with `data`
    Revert {
        /// The revert payload
        #[serde(default)]
        data: Bytes,
    },
    /// Records its last input and counts calls
    Recorder,
    /// Answers `isValidSignature` with the magic value if `valid`
    Erc1271 {
        /// Whether every signature is accepted
        valid: bool,
    },
    /// An ERC-20 token
    Token {
        /// Return convention of `transfer`
        #[serde(default)]
        returns: TokenReturn,
        /// Initial token balances
        #[serde(default)]
        balances: BTreeMap<Address, U256>,
    },
}

/// A contract deployed for the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSpec {
    /// Where it is deployed
    pub address: Address,
    /// What it does
    #[serde(flatten)]
    pub kind: ContractKind,
}

/// A dry-run scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Scripted contracts
    #[serde(default)]
    pub contracts: Vec<ContractSpec>,
    /// Initial native balances
    #[serde(default)]
    pub balances: BTreeMap<Address, U256>,
    /// The call list
    pub calls: Vec<Call>,
    /// Entry path
    #[serde(default)]
    pub mode: Mode,
    /// Caller of `execute`. Defaults to the owner
    #[serde(default)]
    pub caller: Option<Address>,
    /// Deadline of a signed operation, 0 for none
    #[serde(default)]
    pub deadline: U256,
}

impl Scenario {
    /// Builds the host the scenario runs on.
    pub fn host(&self, block: BlockInfo) -> InMemoryHost {
        let mut host = InMemoryHost::new(block);
        for (address, balance) in &self.balances {
            host = host.with_balance(*address, *balance);
        }
        for contract in &self.contracts {
            let address = contract.address;
            match &contract.kind {
                ContractKind::Echo => host.set_contract(address, Echo),
                ContractKind::ReturnData { data } => {
                    host.set_contract(address, ReturnData(data.clone()))
                }
                ContractKind::Revert { data } => host.set_contract(address, Revert(data.clone())),
                ContractKind::Recorder => host.set_contract(address, Recorder),
                ContractKind::Erc1271 { valid } => {
                    host.set_contract(address, Erc1271Stub { valid: *valid })
                }
                ContractKind::Token { returns, balances } => {
                    host.set_contract(address, MockToken::new((*returns).into()));
                    for (holder, amount) in balances {
                        MockToken::mint(&mut host, address, *holder, *amount);
                    }
                }
            }
        }
        host
    }
}
