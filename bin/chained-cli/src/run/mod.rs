//! Dry-running a call list against scripted contracts.
//!
//! A scenario file declares the contracts and balances the account sees, plus the call list.
//! The list runs on an in-memory host through `execute` or `executeSigned`, and the outcome is
//! printed as JSON.

mod cmd;
mod scenario;

pub use cmd::*;
pub use scenario::*;
