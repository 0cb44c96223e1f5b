//! Signing `executeSigned` operations and user operation hashes.

mod cmd;

pub use cmd::*;
