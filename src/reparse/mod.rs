//! Reparse point classification
//!
//! Decides whether a directory is a traversal boundary: a symbolic link or a
//! mount point (junction). The walker never descends into such a directory.
//!
//! - Windows opens the path without following reparse semantics and asks the
//!   filesystem for its reparse buffer (`FSCTL_GET_REPARSE_POINT`).
//! - Unix reports symlinks and directories that sit on a different device
//!   than their parent.
//!
//! Results are never cached: each call queries the filesystem again.

mod header;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod win32;

use std::path::Path;

use crate::error::SizeError;

pub use header::{
    IO_REPARSE_TAG_MOUNT_POINT, IO_REPARSE_TAG_SYMLINK, MAXIMUM_REPARSE_DATA_BUFFER_SIZE,
    ReparseDataHeader, is_traversal_boundary,
};

/// Check whether `path` is a symbolic link or mount point.
///
/// Fails open: a path that cannot be opened is reported as `Ok(false)` so the
/// walker tries to enumerate it and surfaces the real error there. Only an
/// unexpected failure of the metadata query itself is returned as
/// [`SizeError::ReparseQuery`].
pub fn is_reparse_point(path: &Path) -> Result<bool, SizeError> {
    #[cfg(windows)]
    return win32::is_reparse_point(path);
    #[cfg(unix)]
    return unix::is_reparse_point(path);
    #[cfg(not(any(windows, unix)))]
    Ok(path.is_symlink())
}

/// Seam between the walker and the reparse query, so traversal can be driven
/// by something other than the live filesystem.
pub trait ReparseClassifier {
    fn is_reparse_point(&self, path: &Path) -> Result<bool, SizeError>;
}

/// Classifier backed by the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeClassifier;

impl ReparseClassifier for NativeClassifier {
    fn is_reparse_point(&self, path: &Path) -> Result<bool, SizeError> {
        is_reparse_point(path)
    }
}

impl<F> ReparseClassifier for F
where
    F: Fn(&Path) -> Result<bool, SizeError>,
{
    fn is_reparse_point(&self, path: &Path) -> Result<bool, SizeError> {
        self(path)
    }
}
