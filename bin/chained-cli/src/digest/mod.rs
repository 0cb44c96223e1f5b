//! Computing the digest an owner signs for `executeSigned`.

mod cmd;

pub use cmd::*;
