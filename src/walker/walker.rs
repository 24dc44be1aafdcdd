//! SizeWalker - sums file counts and lengths under a directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::SizeError;
use crate::reparse::{NativeClassifier, ReparseClassifier};

use super::config::{QueryFailurePolicy, WalkerConfig};
use super::result::{DirectorySizeResult, Totals};
use super::utils::{is_access_denied, is_directory_entry};

/// Why the enumeration of one directory stopped early.
enum EnumerateError {
    /// Local to the directory: reported, the walk goes on
    Io(io::Error),
    /// Query failure under [`QueryFailurePolicy::Abort`]: ends the walk
    Abort(SizeError),
}

impl From<io::Error> for EnumerateError {
    fn from(e: io::Error) -> Self {
        EnumerateError::Io(e)
    }
}

/// Outcome of sizing one root as part of a batch.
#[derive(Debug)]
pub struct RootOutcome<S> {
    pub root: PathBuf,
    /// `Ok(None)` when the root was skipped (missing, not a directory,
    /// or a reparse point)
    pub result: Result<Option<DirectorySizeResult>, SizeError>,
    pub diagnostics: S,
}

/// Computes directory sizes without crossing symlinks or mount points.
///
/// The walk is iterative: pending directories live on an explicit stack, so
/// tree depth is bounded by memory rather than by the call stack.
pub struct SizeWalker<C = NativeClassifier> {
    config: WalkerConfig,
    classifier: C,
}

impl SizeWalker<NativeClassifier> {
    pub fn new(config: WalkerConfig) -> Self {
        Self {
            config,
            classifier: NativeClassifier,
        }
    }
}

impl<C: ReparseClassifier> SizeWalker<C> {
    /// Replace the reparse classifier.
    pub fn with_classifier<D: ReparseClassifier>(self, classifier: D) -> SizeWalker<D> {
        SizeWalker {
            config: self.config,
            classifier,
        }
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Size one directory.
    ///
    /// Returns `Ok(None)` (with a note on `sink`) when `root` does not exist,
    /// is not a directory, or is itself a reparse point. Unreadable
    /// subdirectories are reported as warnings and contribute whatever was
    /// counted before the failure.
    pub fn compute_size<S>(
        &self,
        root: &Path,
        sink: &mut S,
    ) -> Result<Option<DirectorySizeResult>, SizeError>
    where
        S: DiagnosticSink + ?Sized,
    {
        if !root.exists() {
            sink.emit(Diagnostic::NotFound {
                path: root.to_path_buf(),
            });
            return Ok(None);
        }
        if !root.is_dir() {
            sink.emit(Diagnostic::NotADirectory {
                path: root.to_path_buf(),
            });
            return Ok(None);
        }
        if self.classifier.is_reparse_point(root)? {
            sink.emit(Diagnostic::ReparsePoint {
                path: root.to_path_buf(),
            });
            return Ok(None);
        }

        let mut totals = Totals::default();

        if self.config.recurse {
            let mut pending = vec![root.to_path_buf()];
            while let Some(dir) = pending.pop() {
                self.scan_directory(&dir, Some(&mut pending), &mut totals, sink)?;
            }
        } else {
            self.scan_directory(root, None, &mut totals, sink)?;
        }

        tracing::debug!(
            root = %root.display(),
            files = totals.files,
            size = totals.size,
            "directory sized"
        );

        Ok(Some(DirectorySizeResult::new(root, totals.files, totals.size)))
    }

    /// Size several roots, concurrently unless `parallel_workers == 1`.
    ///
    /// Every root gets its own stack, totals and sink. Outcomes come back in
    /// the order of `roots`.
    pub fn compute_sizes<S, F>(&self, roots: &[PathBuf], make_sink: F) -> Vec<RootOutcome<S>>
    where
        C: Sync,
        S: DiagnosticSink + Send,
        F: Fn() -> S + Sync,
    {
        let size_root = |root: &PathBuf| {
            let mut diagnostics = make_sink();
            let result = self.compute_size(root, &mut diagnostics);
            RootOutcome {
                root: root.clone(),
                result,
                diagnostics,
            }
        };

        match self.config.parallel_workers {
            1 => roots.iter().map(size_root).collect(),
            0 => roots.par_iter().map(size_root).collect(),
            n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(|| roots.par_iter().map(size_root).collect()),
                Err(e) => {
                    tracing::debug!("falling back to global thread pool: {}", e);
                    roots.par_iter().map(size_root).collect()
                }
            },
        }
    }

    /// Enumerate one directory, reporting rather than propagating local
    /// failures. `pending` is `None` in non-recursive mode.
    fn scan_directory<S>(
        &self,
        dir: &Path,
        pending: Option<&mut Vec<PathBuf>>,
        totals: &mut Totals,
        sink: &mut S,
    ) -> Result<(), SizeError>
    where
        S: DiagnosticSink + ?Sized,
    {
        let before = *totals;

        match self.enumerate(dir, pending, totals, sink) {
            Ok(()) => {
                let counted = totals.since(before);
                sink.emit(Diagnostic::DirectoryScanned {
                    path: dir.to_path_buf(),
                    files: counted.files,
                    size: counted.size,
                });
                Ok(())
            }
            Err(EnumerateError::Io(e)) => {
                let path = dir.to_path_buf();
                let message = e.to_string();
                sink.emit(if is_access_denied(&e) {
                    Diagnostic::AccessDenied { path, message }
                } else {
                    Diagnostic::Unreadable { path, message }
                });
                Ok(())
            }
            Err(EnumerateError::Abort(e)) => Err(e),
        }
    }

    fn enumerate<S>(
        &self,
        dir: &Path,
        mut pending: Option<&mut Vec<PathBuf>>,
        totals: &mut Totals,
        sink: &mut S,
    ) -> Result<(), EnumerateError>
    where
        S: DiagnosticSink + ?Sized,
    {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;

            if !is_directory_entry(&entry, file_type) {
                // Length as reported for the entry itself, links not followed
                totals.add_file(entry.metadata()?.len());
                continue;
            }

            let Some(pending) = pending.as_deref_mut() else {
                continue;
            };
            let path = entry.path();

            match self.classifier.is_reparse_point(&path) {
                Ok(false) => pending.push(path),
                Ok(true) => sink.emit(Diagnostic::ReparsePoint { path }),
                Err(e) => match self.config.on_query_failure {
                    QueryFailurePolicy::Skip => sink.emit(Diagnostic::QueryFailed {
                        path,
                        message: e.to_string(),
                    }),
                    QueryFailurePolicy::Descend => pending.push(path),
                    QueryFailurePolicy::Abort => return Err(EnumerateError::Abort(e)),
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    /// A/f1 (100), A/f2 (50), A/B/f3 (25)
    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("A");
        fs::create_dir_all(a.join("B")).unwrap();
        fs::write(a.join("f1"), vec![0u8; 100]).unwrap();
        fs::write(a.join("f2"), vec![0u8; 50]).unwrap();
        fs::write(a.join("B").join("f3"), vec![0u8; 25]).unwrap();
        dir
    }

    fn totals(result: &DirectorySizeResult) -> (u64, u64) {
        (result.file_count(), result.total_size())
    }

    #[test]
    fn test_non_recursive_counts_root_files_only() {
        let tree = sample_tree();
        let root = tree.path().join("A");
        let walker = SizeWalker::new(WalkerConfig::default());
        let mut diags: Vec<Diagnostic> = Vec::new();

        let result = walker.compute_size(&root, &mut diags).unwrap().unwrap();
        assert_eq!(totals(&result), (2, 150));
        assert_eq!(result.directory(), root.as_path());
        assert!(!diags.iter().any(Diagnostic::is_warning));
    }

    #[test]
    fn test_recursive_includes_subdirectories() {
        let tree = sample_tree();
        let walker = SizeWalker::new(WalkerConfig::recursive());
        let result = walker
            .compute_size(&tree.path().join("A"), &mut Vec::<Diagnostic>::new())
            .unwrap()
            .unwrap();
        assert_eq!(totals(&result), (3, 175));
    }

    #[test]
    fn test_mount_point_subdirectory_contributes_nothing() {
        let tree = sample_tree();
        let walker = SizeWalker::new(WalkerConfig::recursive())
            .with_classifier(|p: &Path| -> Result<bool, SizeError> { Ok(p.ends_with("B")) });
        let mut diags: Vec<Diagnostic> = Vec::new();

        let result = walker
            .compute_size(&tree.path().join("A"), &mut diags)
            .unwrap()
            .unwrap();
        assert_eq!(totals(&result), (2, 150));

        let notes: Vec<_> = diags
            .iter()
            .filter(|d| matches!(d, Diagnostic::ReparsePoint { .. }))
            .collect();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].path().ends_with("B"));
    }

    #[test]
    fn test_reparse_root_is_skipped() {
        let tree = sample_tree();
        for recurse in [false, true] {
            let walker = SizeWalker::new(WalkerConfig {
                recurse,
                ..Default::default()
            })
            .with_classifier(|_: &Path| -> Result<bool, SizeError> { Ok(true) });
            let mut diags: Vec<Diagnostic> = Vec::new();

            let result = walker.compute_size(&tree.path().join("A"), &mut diags).unwrap();
            assert!(result.is_none());
            assert!(matches!(diags[..], [Diagnostic::ReparsePoint { .. }]));
        }
    }

    #[test]
    fn test_missing_root_is_skipped() {
        let tree = TempDir::new().unwrap();
        let walker = SizeWalker::new(WalkerConfig::recursive());
        let mut diags: Vec<Diagnostic> = Vec::new();

        let result = walker
            .compute_size(&tree.path().join("missing"), &mut diags)
            .unwrap();
        assert!(result.is_none());
        assert!(matches!(diags[..], [Diagnostic::NotFound { .. }]));
    }

    #[test]
    fn test_file_root_is_skipped() {
        let tree = sample_tree();
        let walker = SizeWalker::new(WalkerConfig::recursive());
        let mut diags: Vec<Diagnostic> = Vec::new();

        let result = walker
            .compute_size(&tree.path().join("A").join("f1"), &mut diags)
            .unwrap();
        assert!(result.is_none());
        assert!(matches!(diags[..], [Diagnostic::NotADirectory { .. }]));
    }

    #[test]
    fn test_recursive_equals_sum_of_non_recursive() {
        let tree = sample_tree();
        let a = tree.path().join("A");
        fs::create_dir_all(a.join("B").join("C").join("D")).unwrap();
        fs::write(a.join("B").join("C").join("g"), vec![1u8; 7]).unwrap();
        fs::write(a.join("B").join("C").join("D").join("h"), vec![1u8; 3]).unwrap();

        let flat = SizeWalker::new(WalkerConfig::default());
        let mut expected = (0, 0);
        for dir in [
            a.clone(),
            a.join("B"),
            a.join("B").join("C"),
            a.join("B").join("C").join("D"),
        ] {
            let r = flat.compute_size(&dir, &mut Vec::<Diagnostic>::new()).unwrap().unwrap();
            expected.0 += r.file_count();
            expected.1 += r.total_size();
        }

        let deep = SizeWalker::new(WalkerConfig::recursive());
        let r = deep.compute_size(&a, &mut Vec::<Diagnostic>::new()).unwrap().unwrap();
        assert_eq!(totals(&r), expected);
        assert_eq!(expected, (5, 185));
    }

    #[test]
    fn test_idempotent() {
        let tree = sample_tree();
        let walker = SizeWalker::new(WalkerConfig::recursive());
        let root = tree.path().join("A");
        let first = walker.compute_size(&root, &mut Vec::<Diagnostic>::new()).unwrap();
        let second = walker.compute_size(&root, &mut Vec::<Diagnostic>::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_directory() {
        let tree = TempDir::new().unwrap();
        let walker = SizeWalker::new(WalkerConfig::recursive());
        let result = walker.compute_size(tree.path(), &mut Vec::<Diagnostic>::new()).unwrap().unwrap();
        assert_eq!(totals(&result), (0, 0));
    }

    #[test]
    fn test_per_directory_scan_notes() {
        let tree = sample_tree();
        let walker = SizeWalker::new(WalkerConfig::recursive());
        let mut diags: Vec<Diagnostic> = Vec::new();
        walker
            .compute_size(&tree.path().join("A"), &mut diags)
            .unwrap();

        let scanned: Vec<_> = diags
            .iter()
            .filter_map(|d| match d {
                Diagnostic::DirectoryScanned { path, files, size } => {
                    Some((path.file_name().unwrap().to_owned(), *files, *size))
                }
                _ => None,
            })
            .collect();
        assert_eq!(scanned.len(), 2);
        assert!(scanned.contains(&("A".into(), 2, 150)));
        assert!(scanned.contains(&("B".into(), 1, 25)));
    }

    fn failing_on_b(p: &Path) -> Result<bool, SizeError> {
        if p.ends_with("B") {
            Err(SizeError::ReparseQuery {
                path: p.to_path_buf(),
                source: io::Error::from(ErrorKind::Other),
            })
        } else {
            Ok(false)
        }
    }

    #[test]
    fn test_query_failure_skip_policy() {
        let tree = sample_tree();
        let walker = SizeWalker::new(WalkerConfig::recursive()).with_classifier(failing_on_b);
        let mut diags: Vec<Diagnostic> = Vec::new();

        let result = walker
            .compute_size(&tree.path().join("A"), &mut diags)
            .unwrap()
            .unwrap();
        assert_eq!(totals(&result), (2, 150));
        assert!(
            diags
                .iter()
                .any(|d| matches!(d, Diagnostic::QueryFailed { .. }) && d.is_warning())
        );
    }

    #[test]
    fn test_query_failure_descend_policy() {
        let tree = sample_tree();
        let walker = SizeWalker::new(WalkerConfig {
            recurse: true,
            on_query_failure: QueryFailurePolicy::Descend,
            ..Default::default()
        })
        .with_classifier(failing_on_b);

        let result = walker
            .compute_size(&tree.path().join("A"), &mut Vec::<Diagnostic>::new())
            .unwrap()
            .unwrap();
        assert_eq!(totals(&result), (3, 175));
    }

    #[test]
    fn test_query_failure_abort_policy() {
        let tree = sample_tree();
        let walker = SizeWalker::new(WalkerConfig {
            recurse: true,
            on_query_failure: QueryFailurePolicy::Abort,
            ..Default::default()
        })
        .with_classifier(failing_on_b);

        let err = walker
            .compute_size(&tree.path().join("A"), &mut Vec::<Diagnostic>::new())
            .unwrap_err();
        assert!(matches!(err, SizeError::ReparseQuery { .. }));
    }

    #[test]
    fn test_query_failure_on_root_is_an_error() {
        let tree = sample_tree();
        let walker = SizeWalker::new(WalkerConfig::default()).with_classifier(failing_on_b);
        let err = walker
            .compute_size(&tree.path().join("A").join("B"), &mut Vec::<Diagnostic>::new())
            .unwrap_err();
        assert!(matches!(err, SizeError::ReparseQuery { .. }));
    }

    #[test]
    fn test_non_recursive_never_queries_subdirectories() {
        let tree = sample_tree();
        let root = tree.path().join("A");
        let only_root = |p: &Path| -> Result<bool, SizeError> {
            assert!(p.ends_with("A"), "unexpected reparse query for {}", p.display());
            Ok(false)
        };
        let walker = SizeWalker::new(WalkerConfig::default()).with_classifier(only_root);
        let result = walker.compute_size(&root, &mut Vec::<Diagnostic>::new()).unwrap().unwrap();
        assert_eq!(totals(&result), (2, 150));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_subdirectory_not_followed() {
        use std::os::unix::fs::symlink;

        let tree = sample_tree();
        let a = tree.path().join("A");
        symlink(&a, a.join("loop")).unwrap();

        let walker = SizeWalker::new(WalkerConfig::recursive());
        let mut diags: Vec<Diagnostic> = Vec::new();
        let result = walker.compute_size(&a, &mut diags).unwrap().unwrap();

        assert_eq!(totals(&result), (3, 175));
        assert!(diags.iter().any(
            |d| matches!(d, Diagnostic::ReparsePoint { path } if path.ends_with("loop"))
        ));
    }

    #[cfg(windows)]
    #[test]
    fn test_dangling_directory_link_counts_nothing() {
        let tree = sample_tree();
        let a = tree.path().join("A");
        let target = tree.path().join("X");
        fs::create_dir(&target).unwrap();
        // Creating symlinks needs developer mode or elevation
        if std::os::windows::fs::symlink_dir(&target, a.join("j")).is_err() {
            return;
        }
        fs::remove_dir(&target).unwrap();

        for (config, expected) in [
            (WalkerConfig::default(), (2, 150)),
            (WalkerConfig::recursive(), (3, 175)),
        ] {
            let walker = SizeWalker::new(config);
            let result = walker
                .compute_size(&a, &mut Vec::<Diagnostic>::new())
                .unwrap()
                .unwrap();
            assert_eq!(totals(&result), expected);
        }
    }

    #[test]
    fn test_subdirectory_vanishing_mid_walk_is_isolated() {
        let tree = sample_tree();
        let a = tree.path().join("A");
        // B is removed after being discovered and before it is enumerated
        let removing_b = |p: &Path| -> Result<bool, SizeError> {
            if p.ends_with("B") {
                fs::remove_dir_all(p).unwrap();
            }
            Ok(false)
        };
        let walker = SizeWalker::new(WalkerConfig::recursive()).with_classifier(removing_b);
        let mut diags: Vec<Diagnostic> = Vec::new();

        let result = walker.compute_size(&a, &mut diags).unwrap().unwrap();
        assert_eq!(totals(&result), (2, 150));

        let warnings: Vec<_> = diags.iter().filter(|d| d.is_warning()).collect();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            Diagnostic::Unreadable { path, .. } if path.ends_with("B")
        ));
        assert!(diags.iter().any(
            |d| matches!(d, Diagnostic::DirectoryScanned { path, files: 2, size: 150 } if *path == a)
        ));
    }

    #[test]
    fn test_compute_sizes_keeps_input_order() {
        let tree = sample_tree();
        let a = tree.path().join("A");
        let roots = vec![a.join("B"), tree.path().join("missing"), a.clone()];

        for workers in [0, 1, 3] {
            let walker = SizeWalker::new(WalkerConfig {
                recurse: true,
                parallel_workers: workers,
                ..Default::default()
            });
            let outcomes = walker.compute_sizes(&roots, Vec::<Diagnostic>::new);

            assert_eq!(outcomes.len(), 3);
            assert_eq!(outcomes[0].root, roots[0]);
            let first = outcomes[0].result.as_ref().unwrap().as_ref().unwrap();
            assert_eq!(totals(first), (1, 25));
            assert!(outcomes[1].result.as_ref().unwrap().is_none());
            assert!(matches!(
                outcomes[1].diagnostics[..],
                [Diagnostic::NotFound { .. }]
            ));
            let last = outcomes[2].result.as_ref().unwrap().as_ref().unwrap();
            assert_eq!(totals(last), (3, 175));
        }
    }
}
