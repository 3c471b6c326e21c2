//! Text output for the snap and diff commands.

use std::path::Path;

use crate::store::diff::DiffResult;

pub fn render_saved(path: &Path) -> String {
    format!("Snapshot was saved to \"{}\"\n", path.display())
}

/// One line per change, or a single "No changes" line.
pub fn render_diff(result: &DiffResult) -> String {
    if result.is_empty() {
        return String::from("No changes\n");
    }

    let mut output = String::new();
    for line in result.lines() {
        output.push_str(&line);
        output.push('\n');
    }
    output
}
