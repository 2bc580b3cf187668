//! The per-thing `metadata.json` snapshot
//!
//! A manifest holds the thing record and every sub-resource list exactly as
//! fetched on the last complete run. It serves two purposes: a human-readable
//! audit trail, and the only input to change detection on the next run.

use crate::error::Result;
use crate::types::{Comment, Fetched, Make, Thing, ThingFile, ThingImage, ThingSummary};
use crate::utils::write_atomic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the manifest inside a thing's output directory
pub const MANIFEST_FILE: &str = "metadata.json";

/// Durable snapshot of one archived thing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// The core thing record
    pub thing: Fetched<Thing>,
    /// File records, each carrying its on-disk `_safe_name`
    #[serde(default)]
    pub files: Vec<Fetched<ThingFile>>,
    /// Image records, each carrying its on-disk `_safe_name`
    #[serde(default)]
    pub images: Vec<Fetched<ThingImage>>,
    /// Remixes of this thing
    #[serde(default)]
    pub derivatives: Vec<Fetched<ThingSummary>>,
    /// Recorded prints
    #[serde(default)]
    pub makes: Vec<Fetched<Make>>,
    /// Comments
    #[serde(default)]
    pub comments: Vec<Fetched<Comment>>,
}

impl Manifest {
    /// Manifest with only the thing record and empty lists
    #[must_use]
    pub fn new(thing: Fetched<Thing>) -> Self {
        Self {
            thing,
            files: Vec::new(),
            images: Vec::new(),
            derivatives: Vec::new(),
            makes: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Path of the manifest inside `dir`
    #[must_use]
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    /// Read the manifest stored in `dir`
    ///
    /// Returns `None` when there is no manifest or when it cannot be read or
    /// parsed. An unreadable manifest is logged and treated as absent so that
    /// the caller simply archives everything again.
    pub async fn load(dir: &Path) -> Option<Self> {
        let path = Self::path_in(dir);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read existing manifest");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unparseable manifest");
                None
            }
        }
    }

    /// Whether this stored manifest describes the same revision as `fresh`
    ///
    /// Both modification timestamps must be present and byte-for-byte equal.
    #[must_use]
    pub fn is_current(&self, fresh: &Thing) -> bool {
        match (&self.thing.modified, &fresh.modified) {
            (Some(stored), Some(current)) => stored == current,
            _ => false,
        }
    }

    /// Write the manifest into `dir`, replacing any previous one atomically
    pub async fn save(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(&Self::path_in(dir), &json).await
    }
}
