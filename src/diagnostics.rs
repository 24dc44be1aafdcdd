//! Side-channel notes and warnings emitted while sizing a directory
//!
//! Diagnostics are advisory. They never change the totals that are returned;
//! they only explain what was skipped and why.

use std::fmt;
use std::path::PathBuf;

/// One observation made during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The root path no longer exists
    NotFound { path: PathBuf },
    /// The root path exists but is not a directory
    NotADirectory { path: PathBuf },
    /// A symlink or mount point that was not entered
    ReparsePoint { path: PathBuf },
    /// Totals for one fully enumerated directory
    DirectoryScanned { path: PathBuf, files: u64, size: u64 },
    /// Enumeration stopped on a permission error
    AccessDenied { path: PathBuf, message: String },
    /// Enumeration stopped on any other I/O error
    Unreadable { path: PathBuf, message: String },
    /// The reparse query failed and the directory was not entered
    QueryFailed { path: PathBuf, message: String },
}

impl Diagnostic {
    /// Warnings mean part of the tree was not counted.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Diagnostic::AccessDenied { .. }
                | Diagnostic::Unreadable { .. }
                | Diagnostic::QueryFailed { .. }
        )
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            Diagnostic::NotFound { path }
            | Diagnostic::NotADirectory { path }
            | Diagnostic::ReparsePoint { path }
            | Diagnostic::DirectoryScanned { path, .. }
            | Diagnostic::AccessDenied { path, .. }
            | Diagnostic::Unreadable { path, .. }
            | Diagnostic::QueryFailed { path, .. } => path,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NotFound { path } => {
                write!(f, "Ignores the path '{}' because it does not exist.", path.display())
            }
            Diagnostic::NotADirectory { path } => write!(
                f,
                "Ignores the path '{}' because it is not a directory.",
                path.display()
            ),
            Diagnostic::ReparsePoint { path } => write!(
                f,
                "Ignores the path '{}' because it is a reparse point.",
                path.display()
            ),
            Diagnostic::DirectoryScanned { path, files, size } => {
                write!(f, "{}: files = {}, size = {}", path.display(), files, size)
            }
            Diagnostic::AccessDenied { path, message } => {
                write!(f, "Access to the path '{}' is denied: {}", path.display(), message)
            }
            Diagnostic::Unreadable { path, message } => {
                write!(f, "Cannot read the path '{}': {}", path.display(), message)
            }
            Diagnostic::QueryFailed { path, message } => write!(
                f,
                "Skips the path '{}' because its reparse data could not be read: {}",
                path.display(),
                message
            ),
        }
    }
}

/// Receiver for diagnostics; one sink per scan.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Collects everything, mostly for tests and callers that report later.
impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`.
///
/// Per-directory totals go to `trace`, skip notes to `debug`, warnings to
/// `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink {
    warnings: usize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of warnings emitted so far.
    pub fn warnings(&self) -> usize {
        self.warnings
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::DirectoryScanned { .. } => tracing::trace!("{}", diagnostic),
            d if d.is_warning() => {
                self.warnings += 1;
                tracing::warn!("{}", diagnostic);
            }
            _ => tracing::debug!("{}", diagnostic),
        }
    }
}
