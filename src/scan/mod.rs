//! Builds a [`Snapshot`] by walking a directory tree.

pub mod walker;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, FixedOffset, Local};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, InputProblem, Result};
use crate::snapshot::{EntryMetadata, Snapshot};
use walker::{EntryOutcome, SkipReason, SkippedEntry};

/// A directory that existed when it was resolved, in canonical absolute form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDir {
    path: PathBuf,
    key: String,
}

impl RootDir {
    pub fn resolve(path: &Path) -> Result<Self> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::InvalidInput {
                    path: path.to_path_buf(),
                    problem: InputProblem::DoesNotExist,
                });
            }
            Err(err) => return Err(Error::io("inspect", path)(err)),
        };

        if !metadata.is_dir() {
            return Err(Error::InvalidInput {
                path: path.to_path_buf(),
                problem: InputProblem::NotADirectory,
            });
        }

        let canonical = fs::canonicalize(path).map_err(Error::io("resolve", path))?;
        let Some(key) = canonical.to_str().map(str::to_owned) else {
            return Err(Error::InvalidInput {
                path: canonical,
                problem: InputProblem::NotUtf8,
            });
        };
        Ok(RootDir { path: canonical, key })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The root as it is written into a snapshot.
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

pub struct BuildResult {
    pub snapshot: Snapshot,
    /// entries left out of the snapshot, already reported as warnings
    pub skipped: Vec<SkippedEntry>,
    pub duration_ms: u128,
}

/// Walk `root` and snapshot it as of now.
pub fn build(root: &RootDir) -> Result<BuildResult> {
    build_at(root, Local::now().fixed_offset())
}

/// One item from the walk: a path to query, or a failure to list a directory
/// together with the path it concerns.
type WalkItem = std::result::Result<PathBuf, (PathBuf, io::Error)>;

/// Entries recorded so far and the ones left out.
#[derive(Debug, Default)]
struct Tally {
    entries: BTreeMap<String, EntryMetadata>,
    skipped: Vec<SkippedEntry>,
}

impl Tally {
    /// Fold one walk item in. Returns the skip reason when the item was left
    /// out, and an error when the build has to stop.
    fn absorb(&mut self, item: WalkItem) -> Result<Option<SkipReason>> {
        let outcome = match item {
            Ok(path) => walker::query(&path)?,
            Err((path, err)) => walker::classify(&path, err)?,
        };

        match outcome {
            EntryOutcome::Recorded(path, metadata) => {
                self.entries.insert(path, metadata);
                Ok(None)
            }
            EntryOutcome::Skipped(entry) => {
                warn!("{entry}");
                let reason = entry.reason;
                self.skipped.push(entry);
                Ok(Some(reason))
            }
        }
    }
}

/// Walk `root`, stamping the snapshot with `taken_at`.
///
/// Permission errors, entries that disappear mid-walk and names that are not
/// valid UTF-8 are skipped with a warning. Anything else aborts the build and
/// no snapshot is returned.
pub fn build_at(root: &RootDir, taken_at: DateTime<FixedOffset>) -> Result<BuildResult> {
    let start = Instant::now();
    let root_path = root.path();
    debug!(root = %root_path.display(), "walking");

    let mut tally = Tally::default();

    // walkdir keeps its own stack of open directories, so depth is not bounded
    // by recursion. links are not descended into.
    let mut walk = WalkDir::new(root_path)
        .min_depth(1)
        .follow_links(false)
        .into_iter();

    while let Some(item) = walk.next() {
        let (item, is_dir) = match item {
            Ok(entry) => {
                let is_dir = entry.file_type().is_dir();
                (Ok(entry.into_path()), is_dir)
            }
            Err(err) => (Err(walker::split_walk_error(root_path, err)), false),
        };

        // everything below a skipped name shares its bad bytes
        if tally.absorb(item)? == Some(SkipReason::NonUtf8Name) && is_dir {
            walk.skip_current_dir();
        }
    }

    let Tally { entries, skipped } = tally;
    let duration_ms = start.elapsed().as_millis();
    debug!(
        entries = entries.len(),
        skipped = skipped.len(),
        duration_ms,
        "walk complete"
    );

    Ok(BuildResult {
        snapshot: Snapshot::new(root.as_str(), taken_at, entries),
        skipped,
        duration_ms,
    })
}
