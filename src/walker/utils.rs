//! Shared helpers for the size walker

use std::fs::{DirEntry, FileType};
use std::io;

/// Whether an entry is a subdirectory candidate.
///
/// Plain directories qualify, and so do symlinks whose target is a
/// directory; the latter are then rejected by the reparse check. Everything
/// else counts as a file.
#[cfg(not(windows))]
pub fn is_directory_entry(entry: &DirEntry, file_type: FileType) -> bool {
    if file_type.is_dir() {
        return true;
    }
    file_type.is_symlink()
        && std::fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false)
}

/// Whether an entry is a subdirectory candidate.
///
/// Directory symlinks and junctions carry the directory attribute
/// themselves, so the link is never followed and a dangling one is still a
/// directory child (rejected later by the reparse check).
#[cfg(windows)]
pub fn is_directory_entry(_entry: &DirEntry, file_type: FileType) -> bool {
    use std::os::windows::fs::FileTypeExt;

    file_type.is_dir() || file_type.is_symlink_dir()
}

/// Whether an enumeration error is an authorization failure.
pub fn is_access_denied(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1}T", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
