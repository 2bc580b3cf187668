//! Archive orchestration
//!
//! [`Archiver`] turns a thing id into a populated output directory:
//!
//! ```text
//! <output_root>/<sanitized name>/
//!     files/            downloaded files
//!     images/           downloaded images
//!     metadata.json     manifest (see [`Manifest`])
//!     README.md, COMMENTS.md, LICENSE.md
//! ```
//!
//! Only the core thing record is essential. Every other category is fetched
//! independently and degrades to an empty list on failure, and every asset is
//! downloaded independently, so a run that gets past the first request always
//! leaves a complete, well-formed directory behind.
//!
//! Re-runs are incremental: when the stored manifest carries the same
//! `modified` timestamp as the freshly fetched thing, nothing else is fetched.
//! Assets already on disk are never downloaded again unless `force` is set.
//!
//! Two archiver calls must not target the same output directory at the same
//! time.

mod assets;
mod batch;
mod categories;
mod report;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use report::{
    ArchiveReport, AssetFailure, BatchReport, Category, CategoryFailure, ItemFailure,
};

use crate::client::{HttpClient, RemoteClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::render::render_documents;
use crate::retry::with_retry;
use crate::sanitize::{SanitizeMode, sanitize_name};
use crate::types::{Fetched, Thing, ThingId};
use crate::utils::ensure_dir;
use categories::thing_path;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sub-directory for downloaded files
pub const FILES_DIR: &str = "files";

/// Sub-directory for downloaded images
pub const IMAGES_DIR: &str = "images";

/// Archives things (and whole accounts) from a [`RemoteClient`]
#[derive(Clone)]
pub struct Archiver {
    client: Arc<dyn RemoteClient>,
    config: Arc<Config>,
}

impl std::fmt::Debug for Archiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archiver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Archiver {
    /// Create an archiver talking to the API described by `config`
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be built
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::new(&config.api)?;
        Ok(Self {
            client: Arc::new(client),
            config: Arc::new(config),
        })
    }

    /// Create an archiver on top of any [`RemoteClient`]
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn with_client(config: Config, client: Arc<dyn RemoteClient>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// The configuration in use
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Archive one thing under `output_root`
    ///
    /// # Errors
    ///
    /// Fails only when the thing record itself cannot be fetched or decoded, or
    /// when the output directory, manifest or documents cannot be written.
    /// Failures of sub-resource lists and individual downloads are recorded in
    /// the returned [`ArchiveReport`] instead.
    pub async fn archive_thing(
        &self,
        id: &ThingId,
        output_root: &Path,
        force: bool,
    ) -> Result<ArchiveReport> {
        tracing::info!(thing_id = %id, "Fetching thing {id}...");
        let thing = self.fetch_thing(id).await?;
        let name = thing
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("thing_{}", thing.id));
        tracing::info!(thing_id = %thing.id, "Name: {name}");

        let output_dir = output_dir_for(output_root, &thing);
        let files_dir = output_dir.join(FILES_DIR);
        let images_dir = output_dir.join(IMAGES_DIR);
        ensure_dir(&files_dir).await?;
        ensure_dir(&images_dir).await?;

        let mut report = ArchiveReport::new(thing.id.clone(), name, output_dir.clone());

        if !force
            && let Some(existing) = Manifest::load(&output_dir).await
            && existing.is_current(&thing)
        {
            tracing::info!(
                thing_id = %thing.id,
                modified = thing.modified.as_deref().unwrap_or_default(),
                "Thing unchanged since last archive, skipping (use --force to re-fetch)"
            );
            report.unchanged = true;
            return Ok(report);
        }

        let id = thing.id.clone();
        let mut manifest = Manifest::new(thing);

        manifest.files = self
            .fetch_category_or_empty(&id, Category::Files, &mut report)
            .await;
        self.download_files(&mut manifest.files, &files_dir, force, &mut report)
            .await;

        manifest.images = self
            .fetch_category_or_empty(&id, Category::Images, &mut report)
            .await;
        self.download_images(&mut manifest.images, &images_dir, force, &mut report)
            .await;

        manifest.derivatives = self
            .fetch_category_or_empty(&id, Category::Derivatives, &mut report)
            .await;
        manifest.makes = self
            .fetch_category_or_empty(&id, Category::Makes, &mut report)
            .await;
        manifest.comments = self
            .fetch_category_or_empty(&id, Category::Comments, &mut report)
            .await;

        tracing::info!(thing_id = %id, "Saving metadata...");
        manifest.save(&output_dir).await?;

        tracing::info!(thing_id = %id, "Writing README.md, COMMENTS.md and LICENSE.md...");
        render_documents(&manifest, &output_dir).await?;

        tracing::info!(
            thing_id = %id,
            downloaded = report.downloaded,
            skipped = report.skipped_existing,
            failed = report.asset_failures.len(),
            "Thing archived to {}",
            output_dir.display()
        );
        Ok(report)
    }

    async fn fetch_thing(&self, id: &ThingId) -> Result<Fetched<Thing>> {
        let path = thing_path(id);
        let value = with_retry(&self.config.retry, &path, || self.client.fetch_record(&path)).await?;
        Fetched::from_value(value).map_err(|e| Error::InvalidRecord {
            what: "thing".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Name of a thing's output directory
///
/// Derived from the display name, or `thing_<id>` when the name is missing or
/// sanitizes to nothing.
#[must_use]
pub fn directory_name(thing: &Thing) -> String {
    let fallback = || sanitize_name(&format!("thing_{}", thing.id), SanitizeMode::Directory);
    match thing.name() {
        Some(name) => {
            let safe = sanitize_name(name, SanitizeMode::Directory);
            if safe.is_empty() { fallback() } else { safe }
        }
        None => fallback(),
    }
}

/// Output directory a thing would be archived to under `output_root`
#[must_use]
pub fn output_dir_for(output_root: &Path, thing: &Thing) -> PathBuf {
    output_root.join(directory_name(thing))
}
