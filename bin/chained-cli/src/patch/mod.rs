//! Applying injection rules to call data offline.

mod cmd;

pub use cmd::*;
