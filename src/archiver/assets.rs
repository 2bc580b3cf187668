//! Downloading files and images into a thing's output directory

use super::Archiver;
use super::report::{ArchiveReport, AssetFailure, Category};
use crate::retry::with_retry;
use crate::sanitize::{SanitizeMode, ensure_image_extension, sanitize_name};
use crate::types::{Fetched, ThingFile, ThingImage};
use crate::utils::{exists, human_size};
use std::path::Path;

/// Sanitized on-disk name, falling back to `<prefix>_<n>` when nothing is left
pub(crate) fn asset_name(name: Option<&str>, prefix: &str, n: usize, mode: SanitizeMode) -> String {
    let fallback = format!("{prefix}_{n}");
    let safe = sanitize_name(name.filter(|s| !s.is_empty()).unwrap_or(&fallback), mode);
    if safe.is_empty() { fallback } else { safe }
}

impl Archiver {
    /// Download every file into `files_dir`, recording each one's on-disk name
    pub(crate) async fn download_files(
        &self,
        files: &mut [Fetched<ThingFile>],
        files_dir: &Path,
        force: bool,
        report: &mut ArchiveReport,
    ) {
        for (i, file) in files.iter_mut().enumerate() {
            let Some(url) = file.resolved_url().map(str::to_string) else {
                let label = file.name.clone().unwrap_or_else(|| format!("file_{}", i + 1));
                tracing::info!(file = %label, "No download URL");
                report.missing_url += 1;
                continue;
            };

            let safe_name = asset_name(file.name.as_deref(), "file", i + 1, SanitizeMode::Generic);
            file.set_safe_name(safe_name.clone());

            let dest = files_dir.join(&safe_name);
            self.download_asset(Category::Files, &url, &dest, &safe_name, true, force, report)
                .await;
        }
    }

    /// Download every image into `images_dir`, recording each one's on-disk name
    ///
    /// Images come from the CDN and are fetched without the API token.
    pub(crate) async fn download_images(
        &self,
        images: &mut [Fetched<ThingImage>],
        images_dir: &Path,
        force: bool,
        report: &mut ArchiveReport,
    ) {
        for (i, image) in images.iter_mut().enumerate() {
            let Some(url) = image.resolved_url().map(str::to_string) else {
                let label = image.name.clone().unwrap_or_else(|| format!("image_{}", i + 1));
                tracing::info!(image = %label, "No download URL");
                report.missing_url += 1;
                continue;
            };

            let base = asset_name(image.name.as_deref(), "image", i + 1, SanitizeMode::Image);
            let safe_name = ensure_image_extension(&base, &url);
            image.set_safe_name(safe_name.clone());

            let dest = images_dir.join(&safe_name);
            self.download_asset(Category::Images, &url, &dest, &safe_name, false, force, report)
                .await;
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn download_asset(
        &self,
        category: Category,
        url: &str,
        dest: &Path,
        name: &str,
        authenticated: bool,
        force: bool,
        report: &mut ArchiveReport,
    ) {
        if !force && exists(dest).await {
            tracing::info!(%category, "Skipping (exists): {name}");
            report.skipped_existing += 1;
            return;
        }

        tracing::info!(%category, "Downloading: {name}");
        let result = with_retry(&self.config.retry, url, || {
            self.client.download(url, dest, authenticated)
        })
        .await;

        match result {
            Ok(bytes) => {
                tracing::debug!(%category, size = %human_size(bytes), "Downloaded {name}");
                report.downloaded += 1;
            }
            Err(error) => {
                tracing::warn!(%category, error = %error, "Error downloading {name}");
                report.asset_failures.push(AssetFailure {
                    category,
                    name: name.to_string(),
                    error,
                });
            }
        }
    }
}
