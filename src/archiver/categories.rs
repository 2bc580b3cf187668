//! Fetching the per-thing sub-resource lists

use super::Archiver;
use super::report::{ArchiveReport, Category, CategoryFailure};
use crate::error::{Error, Result};
use crate::retry::with_retry;
use crate::types::ThingId;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// API path of a thing's core record
pub(crate) fn thing_path(id: &ThingId) -> String {
    format!("/things/{}", urlencoding::encode(&id.to_string()))
}

/// API path of one of a thing's sub-resource lists
pub(crate) fn category_path(id: &ThingId, category: Category) -> String {
    format!("{}/{}", thing_path(id), category.endpoint())
}

/// Decode a list of raw records, failing on the first one with the wrong shape
pub(crate) fn decode_list<T: DeserializeOwned>(what: &str, values: Vec<Value>) -> Result<Vec<T>> {
    values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|e| Error::InvalidRecord {
                what: what.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

impl Archiver {
    /// Fetch and decode one category list
    pub(crate) async fn fetch_category<T: DeserializeOwned>(
        &self,
        id: &ThingId,
        category: Category,
    ) -> Result<Vec<T>> {
        let path = category_path(id, category);
        let values = with_retry(&self.config.retry, &path, || {
            self.client.fetch_list(&path, None)
        })
        .await?;
        decode_list(&category.to_string(), values)
    }

    /// Fetch a category, substituting an empty list when it fails
    ///
    /// The failure is logged and recorded on `report`; it never propagates.
    pub(crate) async fn fetch_category_or_empty<T: DeserializeOwned>(
        &self,
        id: &ThingId,
        category: Category,
        report: &mut ArchiveReport,
    ) -> Vec<T> {
        tracing::info!(thing_id = %id, "Fetching {category}...");
        match self.fetch_category(id, category).await {
            Ok(items) => {
                tracing::info!(thing_id = %id, count = items.len(), "Found {} {category}", items.len());
                items
            }
            Err(error) => {
                tracing::warn!(thing_id = %id, error = %error, "Error fetching {category}, archiving none");
                report.category_failures.push(CategoryFailure { category, error });
                Vec::new()
            }
        }
    }
}
