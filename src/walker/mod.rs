//! Directory size computation
//!
//! `SizeWalker` sizes one root at a time, either the root's own files or the
//! whole tree below it. Subdirectories that are symlinks or mount points are
//! never entered, and an unreadable subtree only costs its own contribution.

mod config;
mod result;
mod utils;
#[allow(clippy::module_inception)]
mod walker;

pub use config::{QueryFailurePolicy, WalkerConfig};
pub use result::DirectorySizeResult;
pub use utils::{format_number, format_size};
pub use walker::{RootOutcome, SizeWalker};
