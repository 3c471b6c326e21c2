//! dirsnap records a directory tree's metadata as a JSON snapshot and
//! reports what was added, removed or changed between two snapshots.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod scan;
pub mod snapshot;
pub mod store;

pub use error::{Error, Result};
pub use snapshot::{EntryKind, EntryMetadata, Snapshot, SCHEMA_VERSION};
