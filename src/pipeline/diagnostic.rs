//! Pipeline diagnostic dump. Writes each stage's prompt and output to disk.
//!
//! Disabled unless a dump directory is configured (`FINSIGHT_DUMP_DIR` or
//! `--dump-dir`).
//!
//! **Output structure**:
//! ```text
//! {dump_dir}/{run_id}/
//!   00-canonical.json
//!   01-ingest-prompt.txt
//!   01-ingest-output.txt
//!   02-risk-prompt.txt
//!   02-risk-output.txt
//!   03-strategy-prompt.txt
//!   03-strategy-output.txt
//!   sections.json
//! ```
//!
//! Dump failures are logged and swallowed; they never fail a run.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Returns the dump directory for a run, creating it. `None` if creation fails.
pub fn dump_dir_for(base: &Path, run_id: &Uuid) -> Option<PathBuf> {
    let dir = base.join(run_id.to_string());

    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(
            path = %dir.display(),
            error = %e,
            "Diagnostic dump: failed to create directory"
        );
        return None;
    }

    Some(dir)
}

/// File name for a stage artifact, e.g. `02-risk-prompt.txt`.
pub fn stage_artifact(position: usize, stage: &str, artifact: &str) -> String {
    format!("{:02}-{stage}-{artifact}.txt", position + 1)
}

/// Write a JSON artifact (pretty-printed).
pub fn dump_json<T: serde::Serialize>(dir: &Path, filename: &str, value: &T) {
    let path = dir.join(filename);
    match serde_json::to_string_pretty(value) {
        Ok(json) => match std::fs::write(&path, json.as_bytes()) {
            Ok(()) => tracing::debug!(
                path = %path.display(),
                size = json.len(),
                "Diagnostic dump: JSON written"
            ),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Diagnostic dump: failed to write JSON"
            ),
        },
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Diagnostic dump: failed to serialize JSON"
        ),
    }
}

/// Write a text artifact (prompt, stage output).
pub fn dump_text(dir: &Path, filename: &str, text: &str) {
    let path = dir.join(filename);
    match std::fs::write(&path, text.as_bytes()) {
        Ok(()) => tracing::debug!(
            path = %path.display(),
            size = text.len(),
            "Diagnostic dump: text written"
        ),
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Diagnostic dump: failed to write text"
        ),
    }
}
