//! Result formatting and display
//!
//! - `table` - console table with optional colors
//! - `json` - JSON array of results

mod config;
mod json;
mod table;

pub use config::OutputConfig;
pub use json::{print_json, to_json};
pub use table::{TableFormatter, print_table};
