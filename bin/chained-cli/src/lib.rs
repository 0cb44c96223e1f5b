//! Command-line tool for the chained account.
//!
//! Computes and signs `executeSigned` digests, applies injection rules to call data offline and
//! dry-runs call lists against scripted contracts on an in-memory host.

mod cmd;
pub use cmd::*;

/// Shared argument groups, input loading, logging and errors
pub mod common;
/// Digest of a signed operation
pub mod digest;
/// Offline injection patching
pub mod patch;
/// Scenario dry runs
pub mod run;
/// Signing operations and user operation hashes
pub mod sign;
