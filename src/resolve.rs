//! Turning user-supplied path strings into concrete directories to size
//!
//! Inputs may be relative, may carry a `FileSystem::` provider prefix, and
//! (unless taken literally) may contain wildcards. Problems with one input
//! are collected as errors; the remaining inputs still resolve.

use std::collections::HashSet;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use glob::Pattern;

use crate::error::SizeError;

/// Name of the only provider whose paths can be sized.
const FILESYSTEM_PROVIDER: &str = "FileSystem";

/// Resolved paths plus per-input errors, in input order.
#[derive(Debug, Default)]
pub struct Resolution {
    pub paths: Vec<PathBuf>,
    pub errors: Vec<SizeError>,
}

/// Resolve `inputs` against `cwd`.
///
/// With no inputs the result is `cwd` itself. When `literal` is false,
/// inputs containing `*`, `?` or `[` are expanded as glob patterns.
/// Duplicates are dropped, keeping the first occurrence.
pub fn resolve_paths<S: AsRef<str>>(inputs: &[S], literal: bool, cwd: &Path) -> Resolution {
    let mut resolution = Resolution::default();

    if inputs.is_empty() {
        resolution.paths.push(cwd.to_path_buf());
        return resolution;
    }

    let mut seen = HashSet::new();

    for input in inputs {
        let input = input.as_ref();
        match resolve_one(input, literal, cwd) {
            Ok(paths) => {
                for path in paths {
                    if seen.insert(path.clone()) {
                        resolution.paths.push(path);
                    }
                }
            }
            Err(e) => resolution.errors.push(e),
        }
    }

    resolution
}

fn resolve_one(input: &str, literal: bool, cwd: &Path) -> Result<Vec<PathBuf>, SizeError> {
    let stripped = strip_provider(input)?;

    if literal || !has_wildcards(stripped) {
        let path = cwd.join(stripped);
        if !path.exists() {
            return Err(SizeError::NotFound { path });
        }
        return Ok(vec![path]);
    }

    let pattern = if Path::new(stripped).is_absolute() {
        stripped.to_string()
    } else {
        format!(
            "{}{}{}",
            Pattern::escape(&cwd.to_string_lossy()),
            MAIN_SEPARATOR,
            stripped
        )
    };

    let matches = glob::glob(&pattern).map_err(|source| SizeError::InvalidPattern {
        pattern: input.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in matches {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => tracing::debug!("skipping unreadable match: {}", e),
        }
    }

    if paths.is_empty() {
        return Err(SizeError::NotFound {
            path: cwd.join(stripped),
        });
    }
    Ok(paths)
}

/// Strip a `FileSystem::` provider qualifier; reject any other provider.
///
/// Accepts both `FileSystem::/data` and module-qualified forms such as
/// `Microsoft.PowerShell.Core\FileSystem::C:\data`.
fn strip_provider(input: &str) -> Result<&str, SizeError> {
    if input.contains("://") {
        return Err(SizeError::NotFileSystem {
            path: input.to_string(),
        });
    }

    let Some((qualifier, rest)) = input.split_once("::") else {
        return Ok(input);
    };

    let provider = qualifier.rsplit('\\').next().unwrap_or(qualifier);
    if provider.eq_ignore_ascii_case(FILESYSTEM_PROVIDER) {
        Ok(rest)
    } else {
        Err(SizeError::NotFileSystem {
            path: input.to_string(),
        })
    }
}

fn has_wildcards(s: &str) -> bool {
    s.contains(['*', '?', '['])
}
