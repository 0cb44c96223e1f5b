mod calls;
mod env;
mod error;
mod hex;
mod logging;

pub use calls::*;
pub use env::*;
pub use error::*;
pub use hex::*;
pub use logging::*;
