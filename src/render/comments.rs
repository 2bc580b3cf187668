//! COMMENTS.md: every comment on the thing, in API order

use super::{NOT_AVAILABLE, UNKNOWN_THING, strip_html};
use crate::manifest::Manifest;
use crate::types::creator_name;
use std::fmt::{self, Write};

/// Render the comment listing for an archived thing
#[must_use]
pub fn render_comments(manifest: &Manifest) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_comments(&mut out, manifest);
    out
}

fn write_comments(out: &mut String, manifest: &Manifest) -> fmt::Result {
    let thing = &manifest.thing;
    let url = thing
        .public_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .unwrap_or(NOT_AVAILABLE);

    writeln!(out, "# Comments for {}\n", thing.name().unwrap_or(UNKNOWN_THING))?;
    writeln!(out, "**Thing URL:** {url}\n")?;
    writeln!(out, "**Total Comments:** {}\n", manifest.comments.len())?;
    writeln!(out, "---\n")?;

    if manifest.comments.is_empty() {
        return writeln!(out, "No comments yet.");
    }

    for comment in &manifest.comments {
        let author = creator_name(comment.user.as_ref());
        let author_url = comment.user.as_ref().map_or("", |u| u.url());
        let added = comment
            .added
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or("Unknown date");
        let body = strip_html(comment.body.as_deref().unwrap_or(""));

        writeln!(out, "### [{author}]({author_url})")?;
        writeln!(out, "*{added}*\n")?;
        writeln!(out, "{body}\n")?;
        writeln!(out, "---\n")?;
    }
    Ok(())
}
