//! A minimal programmable account that runs an ordered list of calls atomically and pipes byte
//! ranges of earlier return data into the input of later calls before they are dispatched.
//!
//! The account accepts work through three doors:
//!
//! - direct execution by the owner or the account-abstraction entry point,
//! - the `validateUserOp` handshake of the entry point,
//! - permissionless execution of an owner-signed call list (`executeSigned`).
//!
//! External contracts, balances, logs and the block environment are reached through the
//! [`Host`] trait, so the same account logic runs against any execution backend.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod account;
pub use account::*;

mod dispatch;

mod error;
pub use error::*;

mod host;
pub use host::*;

mod injection;
pub use injection::*;

mod interfaces;
pub use interfaces::*;

mod pipeline;
pub use pipeline::*;

mod signature;
pub use signature::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

mod types;
pub use types::*;
