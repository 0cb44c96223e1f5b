use alloy_primitives::{Bytes, Log, U256};
use alloy_sol_types::{SolEventInterface, SolInterface};
use chained_account::{
    public_key_to_address, sign_digest, AccountError, AccountState, Host,
    IChainedAccount::{IChainedAccountErrors, IChainedAccountEvents},
};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use super::{Mode, Scenario};
use crate::{
    common::{load_json, AccountArgs, CliError, EnvArgs, Result},
    sign::KeyArgs,
};

/// Dry-run a call list against scripted contracts
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Scenario file. If '-' is specified, it is read from stdin
    #[arg(value_name = "SCENARIO")]
    pub scenario: String,

    /// Signing key, required for signed scenarios with a keypair owner
    #[command(flatten)]
    pub key_args: KeyArgs,

    /// Account configuration
    #[command(flatten)]
    pub account_args: AccountArgs,

    /// Environment configuration
    #[command(flatten)]
    pub env_args: EnvArgs,
}

/// Result of a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    /// Whether the operation went through
    pub success: bool,
    /// Raw result of every call, on success
    pub results: Vec<Bytes>,
    /// Human-readable error, on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// ABI-encoded revert data, on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert: Option<Bytes>,
    /// Events emitted by the account
    pub events: Vec<String>,
    /// Account state afterwards
    pub state: AccountState,
    /// Native balance of the account afterwards
    pub balance: U256,
}

impl Cmd {
    /// Execute the run command
    pub fn run(&self) -> Result<()> {
        let scenario: Scenario = load_json(None, Some(&self.scenario))?
            .ok_or_else(|| CliError::InvalidInput("Missing scenario".to_owned()))?;
        let outcome = self.execute(&scenario)?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        Ok(())
    }

    /// Runs `scenario` and collects the outcome.
    pub fn execute(&self, scenario: &Scenario) -> Result<RunOutcome> {
        let key = self.key_args.try_signing_key()?;
        let default_owner =
            key.as_ref().map(|key| public_key_to_address(key.verifying_key())).unwrap_or_default();
        let mut account = self.account_args.account(default_owner);
        let mut host = scenario.host(self.env_args.block_info());

        info!(
            target: "chained_cli::run",
            account = %account.address(),
            owner = %account.owner(),
            mode = ?scenario.mode,
            calls = scenario.calls.len(),
            "Running scenario"
        );

        let result = match scenario.mode {
            Mode::Execute => {
                let caller = scenario.caller.unwrap_or_else(|| account.owner());
                account.execute_batch(&mut host, caller, &scenario.calls)
            }
            Mode::Signed => {
                let nonce = account.nonce();
                let signature = match &key {
                    Some(key) => {
                        let digest = account.signing_digest(
                            self.env_args.chain_id,
                            &scenario.calls,
                            nonce,
                            scenario.deadline,
                        );
                        sign_digest(key, digest)?
                    }
                    // Contract owners decide on their own, so any bytes will do.
                    None if host.is_contract(account.owner()) => Bytes::new(),
                    None => {
                        return Err(CliError::InvalidInput(
                            "Signed scenarios with a keypair owner need --key".to_owned(),
                        ))
                    }
                };
                account.execute_signed(
                    &mut host,
                    &scenario.calls,
                    nonce,
                    scenario.deadline,
                    &signature,
                )
            }
        };

        let events = host
            .logs()
            .iter()
            .filter(|log| log.address == account.address())
            .map(describe_event)
            .collect();
        let (success, results, error, revert) = match result {
            Ok(results) => (true, results, None, None),
            Err(err) => (false, Vec::new(), Some(describe_error(&err)), Some(err.encode_revert())),
        };

        Ok(RunOutcome {
            success,
            results,
            error,
            revert,
            events,
            state: *account.state(),
            balance: host.balance(account.address()),
        })
    }
}

fn describe_event(log: &Log) -> String {
    match IChainedAccountEvents::decode_log(log, true).map(|decoded| decoded.data) {
        Ok(IChainedAccountEvents::ChainExecuted(event)) => format!(
            "ChainExecuted(callCount: {}, sessionId: {})",
            event.callCount, event.sessionId
        ),
        Ok(IChainedAccountEvents::OwnerChanged(event)) => format!(
            "OwnerChanged(previousOwner: {}, newOwner: {})",
            event.previousOwner, event.newOwner
        ),
        Err(_) => format!("unknown log {}", log.data.data),
    }
}

fn describe_error(err: &AccountError) -> String {
    // The revert of a failed call may itself be an account error, e.g. from a nested account.
    if let AccountError::CallFailed { index, reason } = err {
        if let Ok(inner) = IChainedAccountErrors::abi_decode(reason, true) {
            return format!("call {index} failed with {}", describe_account_error(&inner));
        }
    }
    err.to_string()
}

fn describe_account_error(err: &IChainedAccountErrors) -> String {
    match err {
        IChainedAccountErrors::Unauthorized(_) => "Unauthorized()".to_owned(),
        IChainedAccountErrors::CallFailed(inner) => {
            format!("CallFailed({}, {})", inner.index, inner.reason)
        }
        IChainedAccountErrors::InvalidSignature(_) => "InvalidSignature()".to_owned(),
        IChainedAccountErrors::InvalidNonce(_) => "InvalidNonce()".to_owned(),
        IChainedAccountErrors::TransferFailed(inner) => format!("TransferFailed({})", inner.reason),
    }
}
