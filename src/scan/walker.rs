//! Per-entry outcomes of a directory walk.
//!
//! Each entry the walk yields is either recorded, skipped with a warning, or
//! turns into a fatal error that aborts the whole build.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::snapshot::{EntryKind, EntryMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PermissionDenied,
    /// listed by the parent but gone (or a dangling link) when queried
    Vanished,
    /// the name cannot be stored as a document key without loss
    NonUtf8Name,
}

/// An entry left out of the snapshot. Reported, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            SkipReason::PermissionDenied => write!(f, "\"{}\" - permission denied", self.path.display()),
            SkipReason::Vanished => write!(f, "\"{}\" - not found (broken link?)", self.path.display()),
            SkipReason::NonUtf8Name => write!(f, "\"{}\" - name is not valid UTF-8", self.path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Recorded(String, EntryMetadata),
    Skipped(SkippedEntry),
}

/// Query metadata for one walked entry. Links are followed, so a link to a
/// directory is recorded as a directory and a dangling link is skipped.
///
/// Paths that are not valid UTF-8 are skipped before any metadata is read.
/// Two such names can differ only in their invalid bytes, so a lossy key
/// would merge them.
pub fn query(path: &Path) -> Result<EntryOutcome> {
    let Some(key) = path.to_str() else {
        return Ok(EntryOutcome::Skipped(SkippedEntry {
            path: path.to_path_buf(),
            reason: SkipReason::NonUtf8Name,
        }));
    };

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => return classify(path, err),
    };

    let modified = match metadata.modified() {
        Ok(time) => time,
        Err(err) => return classify(path, err),
    };

    let kind = if metadata.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };

    Ok(EntryOutcome::Recorded(
        key.to_owned(),
        EntryMetadata { modified: unix_seconds(modified), kind },
    ))
}

/// Sort an io error into skip-and-warn or abort.
pub fn classify(path: &Path, err: io::Error) -> Result<EntryOutcome> {
    let reason = match err.kind() {
        io::ErrorKind::PermissionDenied => SkipReason::PermissionDenied,
        io::ErrorKind::NotFound => SkipReason::Vanished,
        _ => {
            return Err(Error::UnexpectedWalkFailure {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    Ok(EntryOutcome::Skipped(SkippedEntry {
        path: path.to_path_buf(),
        reason,
    }))
}

/// Split an error from walkdir itself, raised while reading a directory's
/// children, into the path it concerns and the underlying io error.
pub fn split_walk_error(root: &Path, err: walkdir::Error) -> (PathBuf, io::Error) {
    let path = err.path().unwrap_or(root).to_path_buf();
    (path, io::Error::from(err))
}

// times before the epoch come out negative rather than failing
fn unix_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs_f64(),
        Err(err) => -err.duration().as_secs_f64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn permission_denied_is_skipped() {
        let path = Path::new("/locked");
        let outcome = classify(path, io::Error::from(io::ErrorKind::PermissionDenied)).unwrap();
        assert_eq!(
            outcome,
            EntryOutcome::Skipped(SkippedEntry {
                path: path.to_path_buf(),
                reason: SkipReason::PermissionDenied,
            })
        );
    }

    #[test]
    fn not_found_is_skipped_as_vanished() {
        let outcome = classify(Path::new("/gone"), io::Error::from(io::ErrorKind::NotFound)).unwrap();
        match outcome {
            EntryOutcome::Skipped(skipped) => assert_eq!(skipped.reason, SkipReason::Vanished),
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[test]
    fn other_errors_abort() {
        let err = classify(Path::new("/weird"), io::Error::new(io::ErrorKind::Other, "boom")).unwrap_err();
        assert!(matches!(err, Error::UnexpectedWalkFailure { .. }));
        assert!(err.to_string().contains("/weird"));
    }

    #[test]
    fn skip_messages_name_the_path() {
        let denied = SkippedEntry {
            path: PathBuf::from("/srv/secret"),
            reason: SkipReason::PermissionDenied,
        };
        assert_eq!(denied.to_string(), "\"/srv/secret\" - permission denied");

        let vanished = SkippedEntry {
            path: PathBuf::from("/srv/link"),
            reason: SkipReason::Vanished,
        };
        assert_eq!(vanished.to_string(), "\"/srv/link\" - not found (broken link?)");

        let garbled = SkippedEntry {
            path: PathBuf::from("/srv/odd"),
            reason: SkipReason::NonUtf8Name,
        };
        assert_eq!(garbled.to_string(), "\"/srv/odd\" - name is not valid UTF-8");
    }

    #[test]
    fn pre_epoch_times_are_negative() {
        let before = UNIX_EPOCH - Duration::from_millis(1500);
        assert_eq!(unix_seconds(before), -1.5);
        assert_eq!(unix_seconds(UNIX_EPOCH + Duration::from_millis(250)), 0.25);
    }

    #[test]
    fn query_records_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        match query(&file).unwrap() {
            EntryOutcome::Recorded(key, meta) => {
                assert_eq!(key, file.to_string_lossy());
                assert_eq!(meta.kind, EntryKind::File);
            }
            other => panic!("expected record, got {other:?}"),
        }

        match query(dir.path()).unwrap() {
            EntryOutcome::Recorded(_, meta) => assert_eq!(meta.kind, EntryKind::Directory),
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn query_skips_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = query(&dir.path().join("never-existed")).unwrap();
        assert!(matches!(outcome, EntryOutcome::Skipped(SkippedEntry { reason: SkipReason::Vanished, .. })));
    }

    #[cfg(unix)]
    #[test]
    fn query_skips_non_utf8_name_without_touching_disk() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        // never created, so a metadata lookup would report it as vanished
        let path = Path::new("/nonexistent").join(OsStr::from_bytes(b"a\xff"));
        match query(&path).unwrap() {
            EntryOutcome::Skipped(skipped) => {
                assert_eq!(skipped.reason, SkipReason::NonUtf8Name);
                assert_eq!(skipped.path, path);
            }
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[test]
    fn walk_errors_keep_the_failing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = walkdir::WalkDir::new(&missing)
            .into_iter()
            .find_map(|item| item.err())
            .unwrap();

        let (path, io_err) = split_walk_error(dir.path(), err);
        assert_eq!(path, missing);
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }
}
