//! Unix reparse check: symlinks and mount points

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Component, Path, PathBuf};

use crate::error::SizeError;

pub fn is_reparse_point(path: &Path) -> Result<bool, SizeError> {
    // lstat: never follow the link
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(_) => return Ok(false),
    };

    if meta.file_type().is_symlink() {
        return Ok(true);
    }
    if !meta.is_dir() {
        return Ok(false);
    }

    // Stat the parent rather than `path/..`, which would need search
    // permission on `path` itself. Links among the ancestors are followed.
    let query_failed = |source| SizeError::ReparseQuery {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.components().next_back() {
        Some(Component::Normal(_)) => match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        },
        // `.`, `..` or the root: only the resolved path has a meaningful parent
        _ => {
            let canonical = fs::canonicalize(path).map_err(query_failed)?;
            match canonical.parent() {
                Some(p) => p.to_path_buf(),
                // filesystem root
                None => return Ok(false),
            }
        }
    };
    let parent = fs::metadata(&parent).map_err(query_failed)?;

    Ok(parent.dev() != meta.dev())
}
