//! Per-root scan result

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::utils::format_size;

/// Aggregate size of one scanned directory.
///
/// Built once when the walk of its root finishes and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorySizeResult {
    directory: PathBuf,
    file_count: u64,
    total_size: u64,
}

impl DirectorySizeResult {
    pub(crate) fn new(directory: &Path, file_count: u64, total_size: u64) -> Self {
        Self {
            directory: directory.to_path_buf(),
            file_count,
            total_size,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of files counted
    pub fn file_count(&self) -> u64 {
        self.file_count
    }

    /// Sum of file lengths in bytes
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn human_size(&self) -> String {
        format_size(self.total_size)
    }
}

/// Running totals for one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub files: u64,
    pub size: u64,
}

impl Totals {
    pub fn add_file(&mut self, len: u64) {
        self.files += 1;
        self.size += len;
    }

    /// Counts gathered since `earlier` was taken.
    pub fn since(&self, earlier: Totals) -> Totals {
        Totals {
            files: self.files - earlier.files,
            size: self.size - earlier.size,
        }
    }
}
