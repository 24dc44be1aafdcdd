//! dirsize - directory sizes that stop at symlinks and mount points

pub mod diagnostics;
pub mod error;
pub mod output;
pub mod reparse;
pub mod resolve;
pub mod walker;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::SizeError;
pub use output::{OutputConfig, TableFormatter, print_json, print_table};
pub use reparse::{NativeClassifier, ReparseClassifier, is_reparse_point};
pub use resolve::{Resolution, resolve_paths};
pub use walker::{
    DirectorySizeResult, QueryFailurePolicy, RootOutcome, SizeWalker, WalkerConfig, format_size,
};
