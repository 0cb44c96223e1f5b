//! Loading call lists and injection rules from JSON.

use chained_account::{Call, Injection};
use serde::de::DeserializeOwned;

use super::{read_source, Result};

/// Reads a JSON document from an inline argument or a file (`-` for stdin).
/// Priority: arg > file.
pub fn load_json<T: DeserializeOwned>(arg: Option<&str>, file: Option<&str>) -> Result<Option<T>> {
    let json = match (arg, file) {
        (Some(arg), _) => arg.to_owned(),
        (None, Some(file)) => read_source(file)?,
        (None, None) => return Ok(None),
    };
    Ok(Some(serde_json::from_str(&json)?))
}

/// Reads a JSON call list.
pub fn load_calls(arg: Option<&str>, file: Option<&str>) -> Result<Vec<Call>> {
    Ok(load_json(arg, file)?.unwrap_or_default())
}

/// Reads a JSON list of injection rules.
pub fn load_injections(arg: Option<&str>, file: Option<&str>) -> Result<Vec<Injection>> {
    Ok(load_json(arg, file)?.unwrap_or_default())
}
