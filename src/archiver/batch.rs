//! Archiving every thing published by one account

use super::Archiver;
use super::categories::decode_list;
use super::report::{BatchReport, ItemFailure};
use crate::client::PageRequest;
use crate::error::{Error, Result};
use crate::retry::with_retry;
use crate::types::ThingSummary;
use std::path::Path;
use std::time::Duration;

impl Archiver {
    /// List every thing published by `user`
    ///
    /// Pages of [`ArchiveConfig::page_size`](crate::config::ArchiveConfig::page_size)
    /// entries are requested until a page comes back empty or short. `throttle`
    /// is slept between successive page requests.
    ///
    /// # Errors
    /// Any page that cannot be fetched fails the whole listing.
    pub async fn list_user_things(
        &self,
        user: &str,
        throttle: Duration,
    ) -> Result<Vec<ThingSummary>> {
        let path = format!("/users/{}/things", urlencoding::encode(user));
        let per_page = self.config.archive.page_size;
        let mut things = Vec::new();
        let mut page = 1;

        loop {
            let request = PageRequest { page, per_page };
            let values = with_retry(&self.config.retry, &path, || {
                self.client.fetch_list(&path, Some(request))
            })
            .await?;

            let count = values.len();
            tracing::debug!(user, page, count, "Fetched listing page");
            if count == 0 {
                break;
            }
            things.extend(decode_list::<ThingSummary>("listing", values)?);

            if count < per_page {
                break;
            }
            page += 1;
            tokio::time::sleep(throttle).await;
        }

        Ok(things)
    }

    /// Archive every thing published by `user` under `output_root`
    ///
    /// Things are archived one after another with `throttle` slept between
    /// them (not after the last one). A thing that fails fatally is recorded
    /// in [`BatchReport::failed`] and the batch moves on.
    ///
    /// # Errors
    /// Only a failure to list the account's things is returned as an error.
    pub async fn archive_user(
        &self,
        user: &str,
        output_root: &Path,
        throttle: Duration,
        force: bool,
    ) -> Result<BatchReport> {
        tracing::info!(user, "Fetching things for user: {user}");
        let things = self.list_user_things(user, throttle).await.inspect_err(|e| {
            tracing::error!(user, error = %e, "Error fetching user things");
        })?;

        let mut report = BatchReport::new(user);
        report.attempted = things.len();
        if things.is_empty() {
            tracing::info!(user, "No things found for user: {user}");
            return Ok(report);
        }

        let total = things.len();
        tracing::info!(user, total, "Found {total} things by {user}");

        for (i, summary) in things.into_iter().enumerate() {
            let n = i + 1;
            let Some(id) = summary.id.clone() else {
                let name = summary.display_name().to_string();
                tracing::error!("[{n}/{total}] Listing entry '{name}' has no id, skipping");
                report.failed.push(ItemFailure {
                    id: None,
                    name,
                    error: Error::InvalidRecord {
                        what: "listing".to_string(),
                        reason: "entry has no id".to_string(),
                    },
                });
                continue;
            };
            let name = summary
                .name
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("thing_{id}"));

            tracing::info!(thing_id = %id, "[{n}/{total}] Archiving: {name} (ID: {id})");
            match self.archive_thing(&id, output_root, force).await {
                Ok(archived) => report.archived.push(archived),
                Err(error) => {
                    tracing::error!(thing_id = %id, error = %error, "Error archiving thing {id}");
                    report.failed.push(ItemFailure {
                        id: Some(id),
                        name,
                        error,
                    });
                }
            }

            if n < total {
                tracing::info!("Waiting {:.1}s before next thing...", throttle.as_secs_f64());
                tokio::time::sleep(throttle).await;
            }
        }

        tracing::info!(
            user,
            archived = report.succeeded(),
            attempted = report.attempted,
            "Completed: archived {} of {} things",
            report.succeeded(),
            report.attempted
        );
        Ok(report)
    }
}
