//! Pinned manifest generation
//!
//! Turns the cache tool's line-oriented `list` output into a pinned
//! `requirements.txt` inside the workspace. The listing is parsed
//! defensively: blank lines are skipped and lines that are not exactly
//! `<name> <version>` are dropped with a warning instead of corrupting the
//! manifest. Writing happens line by line after the listing has been fully
//! parsed, so the file never reflects a partial listing; a crash mid-write
//! can still leave a truncated file (accepted, the next run overwrites it).

use crate::error::{BasketscanError, BasketscanResult};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Manifest file name, fixed relative to the workspace root
pub const MANIFEST_NAME: &str = "requirements.txt";

/// One cached package as reported by `basket list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub name: String,
    pub version: String,
}

impl CacheEntry {
    /// Render as a pinned requirement line (without trailing newline)
    pub fn pinned(&self) -> String {
        format!("{}=={}", self.name, self.version)
    }
}

/// Parse raw `basket list` stdout into cache entries, preserving order.
pub fn parse_listing(raw: &str) -> Vec<CacheEntry> {
    let mut entries = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(name), Some(version), None) => entries.push(CacheEntry {
                name: name.to_string(),
                version: version.to_string(),
            }),
            _ => warn!("Skipping malformed cache listing line: {:?}", line),
        }
    }

    entries
}

/// Write the manifest into the workspace, replacing any previous one.
///
/// Returns the manifest path.
pub async fn write_manifest(
    workspace: &Path,
    entries: &[CacheEntry],
) -> BasketscanResult<PathBuf> {
    let path = workspace.join(MANIFEST_NAME);

    if path.exists() {
        info!("{} already exists, deleting", MANIFEST_NAME);
        fs::remove_file(&path)
            .await
            .map_err(|e| BasketscanError::io(format!("removing stale {}", path.display()), e))?;
    }

    let mut file = File::create(&path)
        .await
        .map_err(|e| BasketscanError::io(format!("creating {}", path.display()), e))?;

    for entry in entries {
        let line = format!("{}\n", entry.pinned());
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| BasketscanError::io(format!("writing {}", path.display()), e))?;
    }

    file.flush()
        .await
        .map_err(|e| BasketscanError::io(format!("flushing {}", path.display()), e))?;

    info!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(path)
}
