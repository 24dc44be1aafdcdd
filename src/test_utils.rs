//! Test utilities for building directory trees of known size.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// The tree is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// The directory tree from the classic example:
    /// `A/f1` (100 bytes), `A/f2` (50 bytes), `A/B/f3` (25 bytes).
    pub fn sample() -> Self {
        let tree = Self::new();
        tree.add_file("A/f1", 100);
        tree.add_file("A/f2", 50);
        tree.add_file("A/B/f3", 25);
        tree
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file of exactly `len` bytes.
    ///
    /// Creates parent directories as needed.
    pub fn add_file(&self, path: &str, len: usize) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, vec![b'x'; len]).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Add `width` directories at each of `depth` levels, each holding one
    /// file of `file_len` bytes. Returns the number of files created.
    pub fn add_wide_tree(&self, root: &str, depth: usize, width: usize, file_len: usize) -> usize {
        let mut level = vec![self.add_dir(root)];
        let mut files = 0;

        for _ in 0..depth {
            let mut next = Vec::new();
            for parent in &level {
                for i in 0..width {
                    let dir = parent.join(format!("d{i}"));
                    fs::create_dir_all(&dir).expect("Failed to create dir");
                    fs::write(dir.join("file.bin"), vec![b'x'; file_len])
                        .expect("Failed to write file");
                    files += 1;
                    next.push(dir);
                }
            }
            level = next;
        }

        files
    }

    /// Create a directory symlink at `link` pointing to `target`.
    #[cfg(unix)]
    pub fn symlink_dir(&self, target: &str, link: &str) -> PathBuf {
        let link_path = self.dir.path().join(link);
        std::os::unix::fs::symlink(self.dir.path().join(target), &link_path)
            .expect("Failed to create symlink");
        link_path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
