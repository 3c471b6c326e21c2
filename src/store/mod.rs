//! Snapshot documents on disk.
//!
//! A snapshot is persisted as one JSON document:
//! - path: canonical root that was scanned
//! - datetime: when the snapshot was taken (informational)
//! - scheme-version: layout version, a hard gate for diffing
//! - entries: absolute path -> { mtime, type }
//!
//! Reading a document only checks that it is well formed. Whether two
//! snapshots may be compared is decided in [`diff`].

pub mod diff;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{Error, InputProblem, Result};
use crate::snapshot::{EntryMetadata, Snapshot};

const REQUIRED_FIELDS: [&str; 3] = ["path", "scheme-version", "entries"];

#[derive(Serialize)]
struct DocumentOut<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    datetime: Option<String>,
    #[serde(rename = "scheme-version")]
    scheme_version: i64,
    entries: &'a BTreeMap<String, EntryMetadata>,
}

#[derive(Deserialize)]
struct DocumentIn {
    path: String,
    #[serde(default)]
    datetime: Option<String>,
    #[serde(rename = "scheme-version")]
    scheme_version: i64,
    entries: BTreeMap<String, EntryMetadata>,
}

/// Why a document could not be turned into a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    Malformed(String),
    MissingField(&'static str),
}

impl DocumentError {
    /// Attach the file the document came from.
    pub fn at(self, path: &Path) -> Error {
        match self {
            DocumentError::Malformed(detail) => Error::MalformedSnapshot {
                path: path.to_path_buf(),
                detail,
            },
            DocumentError::MissingField(field) => Error::MissingField {
                path: path.to_path_buf(),
                field,
            },
        }
    }
}

/// Serialize `snapshot` as a pretty printed document.
pub fn write_document<W: Write>(snapshot: &Snapshot, writer: W) -> serde_json::Result<()> {
    let document = DocumentOut {
        path: snapshot.root(),
        datetime: snapshot
            .taken_at()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
        scheme_version: snapshot.schema_version(),
        entries: snapshot.entries(),
    };

    let mut serializer = serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)
}

/// Parse a document back into a snapshot.
pub fn parse_document(text: &str) -> std::result::Result<Snapshot, DocumentError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DocumentError::Malformed(e.to_string()))?;

    let Some(object) = value.as_object() else {
        return Err(DocumentError::Malformed("top level value is not an object".to_string()));
    };

    if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
        return Err(DocumentError::MissingField(*field));
    }

    let document: DocumentIn =
        serde_json::from_value(value).map_err(|e| DocumentError::Malformed(e.to_string()))?;

    let taken_at = document
        .datetime
        .as_deref()
        .map(parse_datetime)
        .transpose()?;

    Ok(Snapshot::from_parts(
        document.path,
        taken_at,
        document.scheme_version,
        document.entries,
    ))
}

// accepts rfc 3339 and offset-less iso 8601, the latter read as local time
fn parse_datetime(text: &str) -> std::result::Result<DateTime<FixedOffset>, DocumentError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| DocumentError::Malformed(format!("invalid datetime \"{text}\": {e}")))?;

    Ok(naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .unwrap_or_else(|| naive.and_utc().fixed_offset()))
}

/// Write `snapshot` to `path`, replacing any existing file.
pub fn save(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(Error::io("create", path))?;
    let mut writer = BufWriter::new(file);

    write_document(snapshot, &mut writer)
        .map_err(io::Error::from)
        .and_then(|()| writer.flush())
        .map_err(Error::io("write", path))?;

    debug!(path = %path.display(), entries = snapshot.len(), "snapshot written");
    Ok(())
}

/// Read a snapshot document from `path`.
pub fn load(path: &Path) -> Result<Snapshot> {
    let text = std::fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::InvalidInput {
            path: path.to_path_buf(),
            problem: InputProblem::DoesNotExist,
        },
        _ => Error::io("read", path)(err),
    })?;

    let snapshot = parse_document(&text).map_err(|e| e.at(path))?;
    debug!(path = %path.display(), entries = snapshot.len(), "snapshot loaded");
    Ok(snapshot)
}

/// File name for a snapshot taken at `taken_at`, e.g. `20240301T101500.json`.
pub fn default_filename(taken_at: &DateTime<FixedOffset>) -> PathBuf {
    PathBuf::from(format!("{}.json", taken_at.format("%Y%m%dT%H%M%S")))
}
