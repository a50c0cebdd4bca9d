//! On-disk session persistence
//!
//! The credential store itself is in-memory; the CLI writes the session to
//! a JSON file under the data directory so sign-in survives across
//! invocations, and removes it on sign-out or terminal refresh failure.

use anyhow::{Context, Result};
use std::path::Path;
use tally_core::Session;
use tracing::warn;

/// Read a persisted session. A missing file means no session; an
/// unreadable one is discarded rather than blocking sign-in.
pub fn load(path: &Path) -> Option<Session> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read session file");
            return None;
        }
    };

    match serde_json::from_str::<Session>(&contents) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "discarding unparseable session file");
            None
        }
    }
}

/// Persist the session, creating the data directory if needed.
pub fn save(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create data directory {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(session)?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write session file {}", path.display()))
}

/// Remove a persisted session; missing files are fine.
pub fn remove(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
    }
}
