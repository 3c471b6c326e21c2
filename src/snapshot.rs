//! Snapshot model.
//!
//! A snapshot is a flat map from absolute entry path to the metadata seen at
//! scan time. The tree shape is not kept: diffing only needs presence and
//! per-key equality.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Layout version written to every document. Bump when the document shape changes.
pub const SCHEMA_VERSION: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// seconds since the unix epoch, fractional part preserved
    #[serde(rename = "mtime")]
    pub modified: f64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl EntryMetadata {
    pub fn file(modified: f64) -> Self {
        EntryMetadata { modified, kind: EntryKind::File }
    }

    pub fn directory(modified: f64) -> Self {
        EntryMetadata { modified, kind: EntryKind::Directory }
    }
}

/// Immutable record of a directory tree at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: String,
    taken_at: Option<DateTime<FixedOffset>>,
    schema_version: i64,
    entries: BTreeMap<String, EntryMetadata>,
}

impl Snapshot {
    /// Snapshot in the current layout version.
    pub fn new(
        root: impl Into<String>,
        taken_at: DateTime<FixedOffset>,
        entries: BTreeMap<String, EntryMetadata>,
    ) -> Self {
        Snapshot {
            root: root.into(),
            taken_at: Some(taken_at),
            schema_version: SCHEMA_VERSION,
            entries,
        }
    }

    /// Snapshot with every field given explicitly, as read back from a document.
    pub fn from_parts(
        root: impl Into<String>,
        taken_at: Option<DateTime<FixedOffset>>,
        schema_version: i64,
        entries: BTreeMap<String, EntryMetadata>,
    ) -> Self {
        Snapshot {
            root: root.into(),
            taken_at,
            schema_version,
            entries,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn taken_at(&self) -> Option<&DateTime<FixedOffset>> {
        self.taken_at.as_ref()
    }

    pub fn schema_version(&self) -> i64 {
        self.schema_version
    }

    pub fn entries(&self) -> &BTreeMap<String, EntryMetadata> {
        &self.entries
    }

    pub fn get(&self, path: &str) -> Option<&EntryMetadata> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
