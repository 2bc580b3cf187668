//! Markdown documents generated from a manifest
//!
//! Every archived thing gets a `README.md` (metadata, description, file and
//! image listings), a `COMMENTS.md` and a `LICENSE.md`. Rendering is pure: the
//! `render_*` functions only read the [`Manifest`] and return text, and
//! [`render_documents`] publishes the results atomically.

mod comments;
mod license;
mod readme;

pub use comments::render_comments;
pub use license::{license_url, render_license};
pub use readme::render_readme;

use crate::error::Result;
use crate::manifest::Manifest;
use crate::utils::write_atomic;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Summary document file name
pub const README_FILE: &str = "README.md";

/// Comment listing file name
pub const COMMENTS_FILE: &str = "COMMENTS.md";

/// License document file name
pub const LICENSE_FILE: &str = "LICENSE.md";

/// Placeholder for missing URLs and timestamps
pub(crate) const NOT_AVAILABLE: &str = "N/A";

/// Title used when the thing has no name
pub(crate) const UNKNOWN_THING: &str = "Unknown Thing";

#[allow(clippy::expect_used)]
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<br\s*/?>").expect("LINE_BREAK: hardcoded regex is valid"));

#[allow(clippy::expect_used)]
static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?p>").expect("PARAGRAPH: hardcoded regex is valid"));

#[allow(clippy::expect_used)]
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("ANY_TAG: hardcoded regex is valid"));

/// Write README.md, COMMENTS.md and LICENSE.md for `manifest` into `dir`
pub async fn render_documents(manifest: &Manifest, dir: &Path) -> Result<()> {
    write_atomic(&dir.join(README_FILE), render_readme(manifest).as_bytes()).await?;
    write_atomic(&dir.join(COMMENTS_FILE), render_comments(manifest).as_bytes()).await?;
    write_atomic(&dir.join(LICENSE_FILE), render_license(&manifest.thing).as_bytes()).await?;
    Ok(())
}

/// Turn HTML from the API into plain text
///
/// Line breaks become newlines, then paragraph tags become newlines, then every
/// other tag is dropped. The order matters: the last pass would otherwise eat
/// the structural tags before they are converted.
///
/// # Examples
///
/// ```
/// use thing_archiver::render::strip_html;
///
/// assert_eq!(strip_html("<p>Print at <b>0.2mm</b><br/>no supports</p>"), "\nPrint at 0.2mm\nno supports\n");
/// ```
#[must_use]
pub fn strip_html(html: &str) -> String {
    let text = LINE_BREAK.replace_all(html, "\n");
    let text = PARAGRAPH.replace_all(&text, "\n");
    ANY_TAG.replace_all(&text, "").into_owned()
}

/// Relative Markdown link target for an archived asset
pub(crate) fn asset_link(dir: &str, safe_name: &str) -> String {
    format!("{dir}/{}", urlencoding::encode(safe_name))
}
