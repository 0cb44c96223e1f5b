use alloy_primitives::{Bytes, B256};
use chained_account::{public_key_to_address, sign_digest, to_eth_signed_message_hash};
use clap::Parser;
use k256::ecdsa::SigningKey;
use tracing::info;

use crate::{
    common::{decode_hex, CliError, Result},
    digest::OperationArgs,
};

/// Private key arguments
#[derive(Parser, Debug, Clone)]
pub struct KeyArgs {
    /// Hex-encoded secp256k1 private key of the owner
    #[arg(long = "key", env = "CHAINED_PRIVATE_KEY", hide_env_values = true)]
    pub key: Option<String>,
}

impl KeyArgs {
    /// Parses the signing key, if one was given.
    pub fn try_signing_key(&self) -> Result<Option<SigningKey>> {
        self.key.as_deref().map(parse_signing_key).transpose()
    }

    /// Parses the signing key, failing if none was given.
    pub fn signing_key(&self) -> Result<SigningKey> {
        self.try_signing_key()?
            .ok_or_else(|| CliError::InvalidInput("Missing --key".to_owned()))
    }
}

/// Parses a hex-encoded secp256k1 private key.
pub fn parse_signing_key(key: &str) -> Result<SigningKey> {
    let bytes = decode_hex(key)?;
    if bytes.len() != 32 {
        return Err(CliError::InvalidInput(format!(
            "Private key must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(SigningKey::from_slice(&bytes)?)
}

/// Sign an `executeSigned` operation, or a user operation hash with `--userop-hash`
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Signing key
    #[command(flatten)]
    pub key_args: KeyArgs,

    /// Sign this user operation hash as a personal message instead of an `executeSigned`
    /// operation
    #[arg(long = "userop-hash")]
    pub user_op_hash: Option<B256>,

    /// The operation
    #[command(flatten)]
    pub operation: OperationArgs,
}

impl Cmd {
    /// Execute the sign command
    pub fn run(&self) -> Result<()> {
        let signature = self.sign()?;
        println!("{signature}");
        Ok(())
    }

    /// Produces the 65-byte signature.
    pub fn sign(&self) -> Result<Bytes> {
        let key = self.key_args.signing_key()?;
        let signer = public_key_to_address(key.verifying_key());
        let digest = match self.user_op_hash {
            Some(hash) => to_eth_signed_message_hash(hash),
            None => self.operation.digest(signer)?,
        };
        let signature = sign_digest(&key, digest)?;
        info!(target: "chained_cli::sign", %signer, %digest, "Signed");
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, U256};
    use chained_account::recover_signer;
    use clap::Parser;

    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[derive(Parser, Debug)]
    struct Wrapper {
        #[command(flatten)]
        cmd: Cmd,
    }

    fn parse(args: &[&str]) -> Cmd {
        Wrapper::parse_from(std::iter::once("sign").chain(args.iter().copied())).cmd
    }

    #[test]
    fn test_signs_operation_digest() {
        let cmd = parse(&["--key", ANVIL_KEY, "--calls", "[]", "--deadline", "100"]);
        let signer = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

        let signature = cmd.sign().unwrap();

        let digest = cmd.operation.digest(signer).unwrap();
        assert_eq!(cmd.operation.deadline, U256::from(100));
        assert_eq!(recover_signer(digest, &signature), Some(signer));
    }

    #[test]
    fn test_signs_user_op_hash_as_personal_message() {
        let hash = B256::repeat_byte(0x11);
        let cmd = parse(&["--key", ANVIL_KEY, "--userop-hash", &hash.to_string()]);

        let signature = cmd.sign().unwrap();

        assert_eq!(
            recover_signer(to_eth_signed_message_hash(hash), &signature),
            Some(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
        );
    }

    #[test]
    fn test_rejects_short_key() {
        assert!(matches!(parse_signing_key("0x1234"), Err(CliError::InvalidInput(_))));
    }
}
