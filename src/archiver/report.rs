//! Outcome records returned by the archiver

use crate::error::Error;
use crate::types::ThingId;
use std::path::PathBuf;

/// A sub-resource category fetched for every thing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Downloadable files
    Files,
    /// Images
    Images,
    /// Remixes of the thing
    Derivatives,
    /// Recorded prints
    Makes,
    /// Comments
    Comments,
}

impl Category {
    /// Every category, in fetch order
    pub const ALL: [Category; 5] = [
        Category::Files,
        Category::Images,
        Category::Derivatives,
        Category::Makes,
        Category::Comments,
    ];

    /// Last path segment of the category's endpoint under `/things/{id}/`
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Category::Files => "files",
            Category::Images => "images",
            Category::Derivatives => "derivatives",
            Category::Makes => "copies",
            Category::Comments => "comments",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Category::Files => "files",
            Category::Images => "images",
            Category::Derivatives => "remixes",
            Category::Makes => "makes",
            Category::Comments => "comments",
        })
    }
}

/// A category whose list could not be fetched and was archived as empty
#[derive(Debug)]
pub struct CategoryFailure {
    /// Which category failed
    pub category: Category,
    /// Why
    pub error: Error,
}

/// A single file or image that could not be downloaded
#[derive(Debug)]
pub struct AssetFailure {
    /// [`Category::Files`] or [`Category::Images`]
    pub category: Category,
    /// On-disk name the asset would have had
    pub name: String,
    /// Why
    pub error: Error,
}

/// Result of archiving one thing
#[derive(Debug)]
pub struct ArchiveReport {
    /// Thing id as returned by the API
    pub thing_id: ThingId,
    /// Display name
    pub name: String,
    /// Directory holding the archive
    pub output_dir: PathBuf,
    /// The stored manifest was current and nothing else was fetched
    pub unchanged: bool,
    /// Categories archived as empty because their fetch failed
    pub category_failures: Vec<CategoryFailure>,
    /// Assets downloaded in this run
    pub downloaded: usize,
    /// Assets left alone because they already existed on disk
    pub skipped_existing: usize,
    /// Assets without any download URL
    pub missing_url: usize,
    /// Assets whose download failed
    pub asset_failures: Vec<AssetFailure>,
}

impl ArchiveReport {
    pub(crate) fn new(thing_id: ThingId, name: String, output_dir: PathBuf) -> Self {
        Self {
            thing_id,
            name,
            output_dir,
            unchanged: false,
            category_failures: Vec::new(),
            downloaded: 0,
            skipped_existing: 0,
            missing_url: 0,
            asset_failures: Vec::new(),
        }
    }

    /// Whether everything that was attempted also succeeded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.category_failures.is_empty() && self.asset_failures.is_empty()
    }

    /// Whether fetching `category` failed in this run
    #[must_use]
    pub fn category_failed(&self, category: Category) -> bool {
        self.category_failures.iter().any(|f| f.category == category)
    }
}

/// A listed thing whose archive failed fatally
#[derive(Debug)]
pub struct ItemFailure {
    /// Thing id, if the listing entry had one
    pub id: Option<ThingId>,
    /// Display name from the listing
    pub name: String,
    /// The fatal error
    pub error: Error,
}

/// Result of archiving every thing of one user
#[derive(Debug)]
pub struct BatchReport {
    /// Account name
    pub user: String,
    /// Number of things found in the listing
    pub attempted: usize,
    /// Things archived (including unchanged ones)
    pub archived: Vec<ArchiveReport>,
    /// Things that could not be archived
    pub failed: Vec<ItemFailure>,
}

impl BatchReport {
    pub(crate) fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            attempted: 0,
            archived: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Number of things archived successfully
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.archived.len()
    }
}
