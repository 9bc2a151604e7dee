//! # File Discovery
//!
//! Recursive collection of `*.neon` files under a list of root directories.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::CheckerError;
use crate::report::ParseFailure;

const EXTENSION_SUFFIX: &str = ".neon";

/// Find every regular file whose name ends in `.neon` under `roots`.
///
/// Results are grouped by root in the order given and sorted within each
/// root. A file reachable from two roots is listed once. Directories that
/// cannot be read are logged and skipped. Symbolic links to directories are
/// not followed; symbolic links to files are listed like the files.
pub fn find_neon_files<P: AsRef<Path>>(roots: &[P]) -> Vec<PathBuf> {
    let mut results = Vec::new();
    let mut seen = HashSet::new();
    for root in roots {
        let mut found = Vec::new();
        walk(root.as_ref(), &mut found, &mut seen);
        found.sort();
        results.extend(found);
    }
    results
}

fn walk(dir: &Path, acc: &mut Vec<PathBuf>, seen: &mut HashSet<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "failed to read directory during file walk"
            );
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "failed to stat entry");
                continue;
            }
        };
        let path = entry.path();
        if file_type.is_dir() {
            walk(&path, acc, seen);
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "not following directory symlink");
        } else if path.is_file() && is_neon(&path) && seen.insert(path.clone()) {
            acc.push(path);
        }
    }
}

/// Read one discovered file.
///
/// The outer error is a real I/O failure. Content that is not valid UTF-8
/// comes back as a [`ParseFailure`] positioned at the first invalid byte,
/// carrying a lossy copy of the text for the excerpt.
pub fn read_source(path: &Path) -> Result<Result<String, ParseFailure>, CheckerError> {
    let bytes = std::fs::read(path).map_err(|source| CheckerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let err = match String::from_utf8(bytes) {
        Ok(text) => return Ok(Ok(text)),
        Err(e) => e,
    };

    let valid_up_to = err.utf8_error().valid_up_to();
    let bytes = err.into_bytes();
    let prefix = String::from_utf8_lossy(&bytes[..valid_up_to]);
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    let message = format!("Invalid UTF-8 sequence on line {line}, column {column}.");
    Ok(Err(ParseFailure::new(
        path,
        message,
        String::from_utf8_lossy(&bytes).into_owned(),
    )))
}

fn is_neon(path: &Path) -> bool {
    path.file_name()
        .and_then(|f| f.to_str())
        .is_some_and(|name| name.ends_with(EXTENSION_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"a: 1\n").unwrap();
    }

    #[test]
    fn finds_nested_neon_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b").join("two.neon"));
        touch(&dir.path().join("a").join("deep").join("one.neon"));
        touch(&dir.path().join("top.neon"));

        let files = find_neon_files(&[dir.path()]);
        assert_eq!(files.len(), 3);
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn ignores_other_extensions_and_case() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("config.yaml"));
        touch(&dir.path().join("upper.NEON"));
        touch(&dir.path().join("local.neon.dist"));
        touch(&dir.path().join("ok.neon"));

        let files = find_neon_files(&[dir.path()]);
        assert_eq!(files, vec![dir.path().join("ok.neon")]);
    }

    #[test]
    fn directory_named_like_a_neon_file_is_descended() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("fake.neon").join("real.neon"));

        let files = find_neon_files(&[dir.path()]);
        assert_eq!(files, vec![dir.path().join("fake.neon").join("real.neon")]);
    }

    #[test]
    fn roots_keep_their_order_and_overlap_is_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("z");
        let second = dir.path().join("a");
        touch(&first.join("x.neon"));
        touch(&second.join("y.neon"));

        let files = find_neon_files(&[first.clone(), second.clone(), first.clone()]);
        assert_eq!(files, vec![first.join("x.neon"), second.join("y.neon")]);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = find_neon_files(&[dir.path().join("absent")]);
        assert!(files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlink_cycle_is_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.neon"));
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let files = find_neon_files(&[dir.path()]);
        assert_eq!(files, vec![dir.path().join("a.neon")]);
    }

    #[cfg(unix)]
    #[test]
    fn file_symlink_is_listed() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("store").join("real.conf");
        touch(&target);
        std::os::unix::fs::symlink(&target, dir.path().join("linked.neon")).unwrap();

        let files = find_neon_files(&[dir.path()]);
        assert_eq!(files, vec![dir.path().join("linked.neon")]);
    }

    #[test]
    fn read_source_returns_utf8_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.neon");
        std::fs::write(&path, "name: café\n").unwrap();
        assert_eq!(read_source(&path).unwrap().unwrap(), "name: café\n");
    }

    #[test]
    fn read_source_positions_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.neon");
        std::fs::write(&path, b"a: 1\nname: caf\xe9\n").unwrap();

        let failure = read_source(&path).unwrap().unwrap_err();
        assert_eq!(failure.message, "Invalid UTF-8 sequence on line 2, column 10.");
        assert_eq!(failure.location.line, Some(2));
        assert_eq!(failure.location.column, Some(10));
        assert_eq!(failure.excerpt(), "1: a: 1\n2: >>name: caf\u{fffd}<<\n3: \n");
    }

    #[test]
    fn read_source_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_source(&dir.path().join("gone.neon")).unwrap_err();
        assert!(matches!(err, CheckerError::Io { .. }));
    }
}
