//! JSON output formatting

use std::io;

use crate::walker::DirectorySizeResult;

/// Render results as a pretty-printed JSON array.
pub fn to_json(results: &[DirectorySizeResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

/// Print results as pretty-printed JSON to stdout.
pub fn print_json(results: &[DirectorySizeResult]) -> io::Result<()> {
    let json = to_json(results).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
