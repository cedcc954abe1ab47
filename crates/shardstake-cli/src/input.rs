//! Input helpers: file-or-stdin reading and hex decoding.

use crate::error::CliError;
use std::io::{self, Read};

/// Reads the whole input file, or stdin if no path is given.
pub fn read_text(input: Option<&str>) -> Result<String, CliError> {
    match input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_string(),
            source,
        }),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Reads hex text, ignoring whitespace and line breaks.
pub fn read_hex(input: Option<&str>) -> Result<Vec<u8>, CliError> {
    let text = read_text(input)?;
    let compact: String = text.split_whitespace().collect();
    Ok(hex::decode(compact)?)
}
