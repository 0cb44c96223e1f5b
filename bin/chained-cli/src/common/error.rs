use alloy_primitives::hex::FromHexError;
use chained_account::AccountError;

/// Error types of the chained CLI
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Failed to read or write a file
    #[error("Failed to access file: {0}")]
    File(#[from] std::io::Error),

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// Invalid JSON document
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid private key or failed signing
    #[error("Signing error: {0}")]
    Signing(#[from] k256::ecdsa::Error),

    /// The account rejected the operation
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type of the chained CLI
pub type Result<T> = std::result::Result<T, CliError>;
