//! Test utilities for the chained account.

mod contracts;
mod host;
mod signer;

pub use contracts::*;
pub use host::*;
pub use signer::*;
