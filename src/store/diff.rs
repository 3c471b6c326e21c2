//! Snapshot comparison engine.
//!
//! Compares two snapshots of the same root and reports changes:
//! - Matches entries by exact absolute path
//! - An entry is changed when its kind or mtime differs
//! - Renames show up as one removal plus one addition
//!
//! Changes are ordered by their rendered line, so output is stable no matter
//! what order the maps were walked in.

use std::fmt;

use thiserror::Error;

use crate::snapshot::Snapshot;

/// Why two snapshots cannot be compared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Incomparable {
    #[error("Files paths do not match: \"{0}\" and \"{1}\"")]
    PathMismatch(String, String),
    #[error("Scheme versions do not match: \"{0}\" and \"{1}\"")]
    VersionMismatch(i64, i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Changed,
    Removed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Changed => "changed",
            ChangeKind::Removed => "removed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: String,
    pub kind: ChangeKind,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element {} was {}", self.path, self.kind.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// sorted by rendered line
    pub changes: Vec<Change>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.changes.iter().map(|c| c.to_string())
    }
}

/// Check that `from` and `to` describe the same root in the same layout.
pub fn check_comparable(from: &Snapshot, to: &Snapshot) -> Result<(), Incomparable> {
    if from.root() != to.root() {
        return Err(Incomparable::PathMismatch(from.root().to_string(), to.root().to_string()));
    }

    if from.schema_version() != to.schema_version() {
        return Err(Incomparable::VersionMismatch(from.schema_version(), to.schema_version()));
    }

    Ok(())
}

/// Compare two snapshots. Neither input is modified.
pub fn diff(from: &Snapshot, to: &Snapshot) -> Result<DiffResult, Incomparable> {
    check_comparable(from, to)?;

    let mut changes = Vec::new();

    // removed and changed (in 'from')
    for (path, old) in from.entries() {
        match to.get(path) {
            None => changes.push(Change { path: path.clone(), kind: ChangeKind::Removed }),
            Some(new) if new != old => changes.push(Change { path: path.clone(), kind: ChangeKind::Changed }),
            Some(_) => {}
        }
    }

    // added (only in 'to')
    for path in to.entries().keys() {
        if from.get(path).is_none() {
            changes.push(Change { path: path.clone(), kind: ChangeKind::Added });
        }
    }

    // order by the full rendered line, not by path or kind
    changes.sort_by_cached_key(|c| c.to_string());

    Ok(DiffResult { changes })
}
