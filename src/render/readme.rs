//! README.md: the human-readable summary of an archived thing

use super::{NOT_AVAILABLE, UNKNOWN_THING, asset_link, strip_html};
use crate::archiver::{FILES_DIR, IMAGES_DIR};
use crate::manifest::Manifest;
use crate::types::{ThingSummary, creator_name};
use crate::utils::human_size;
use std::fmt::{self, Write};

/// Render the README for an archived thing
#[must_use]
pub fn render_readme(manifest: &Manifest) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_readme(&mut out, manifest);
    out
}

fn write_readme(out: &mut String, manifest: &Manifest) -> fmt::Result {
    let thing = &manifest.thing;
    let title = thing.name().unwrap_or(UNKNOWN_THING);

    writeln!(out, "# {title}\n")?;

    if let Some(cover) = manifest.images.first().and_then(|i| i.safe_name()) {
        let alt = thing.name().unwrap_or("Thing");
        writeln!(out, "![{alt}]({})\n", asset_link(IMAGES_DIR, cover))?;
    }

    writeln!(out, "## Metadata\n")?;
    writeln!(out, "- **Thing ID:** {}", thing.id)?;
    writeln!(out, "- **URL:** {}", or_na(thing.public_url.as_deref()))?;
    if let Some(creator) = &thing.creator {
        writeln!(out, "- **Creator:** [{}]({})", creator.display_name(), creator.url())?;
    }
    writeln!(out, "- **Added:** {}", or_na(thing.added.as_deref()))?;
    writeln!(out, "- **Modified:** {}", or_na(thing.modified.as_deref()))?;
    writeln!(out, "- **License:** {}", thing.license_label())?;
    writeln!(out, "- **Like Count:** {}", thing.like_count.unwrap_or(0))?;
    writeln!(out, "- **Download Count:** {}", thing.download_count.unwrap_or(0))?;
    writeln!(out, "- **View Count:** {}", thing.view_count.unwrap_or(0))?;
    writeln!(out, "- **Collect Count:** {}", thing.collect_count.unwrap_or(0))?;
    writeln!(out, "- **Comment Count:** {}", manifest.comments.len())?;
    writeln!(out, "- **Makes Count:** {}", manifest.makes.len())?;
    writeln!(out, "- **Remix Count:** {}", manifest.derivatives.len())?;
    let tags = thing.tag_names();
    if !tags.is_empty() {
        writeln!(out, "- **Tags:** {}", tags.join(", "))?;
    }
    writeln!(out)?;

    writeln!(out, "## Description\n")?;
    match thing.description.as_deref() {
        Some(description) => writeln!(out, "{}\n", strip_html(description))?,
        None => writeln!(out, "No description available.\n")?,
    }

    if let Some(instructions) = thing.instructions.as_deref().filter(|i| !i.is_empty()) {
        writeln!(out, "## Instructions\n")?;
        writeln!(out, "{}\n", strip_html(instructions))?;
    }

    let ancestors = thing.ancestors();
    if !ancestors.is_empty() {
        writeln!(out, "## Ancestors\n")?;
        writeln!(out, "This thing is a remix of:\n")?;
        write_thing_links(out, ancestors.iter())?;
    }

    if !manifest.derivatives.is_empty() {
        writeln!(out, "## Remixes\n")?;
        writeln!(out, "Things remixed from this:\n")?;
        write_thing_links(out, manifest.derivatives.iter().map(|d| &**d))?;
    }

    writeln!(out, "## Files\n")?;
    if manifest.files.is_empty() {
        writeln!(out, "No files available.")?;
    }
    for file in &manifest.files {
        let name = file.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("unknown");
        let size = human_size(file.size.unwrap_or(0));
        match file.safe_name() {
            Some(safe) => writeln!(out, "- [{name}]({}) ({size})", asset_link(FILES_DIR, safe))?,
            None => writeln!(out, "- {name} ({size}, not downloaded)")?,
        }
    }
    writeln!(out)?;

    writeln!(out, "## Images\n")?;
    if manifest.images.is_empty() {
        writeln!(out, "No images available.")?;
    }
    for image in &manifest.images {
        if let Some(safe) = image.safe_name() {
            let alt = image.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("image");
            writeln!(out, "![{alt}]({})\n", asset_link(IMAGES_DIR, safe))?;
        }
    }

    Ok(())
}

fn write_thing_links<'a>(
    out: &mut String,
    things: impl Iterator<Item = &'a ThingSummary>,
) -> fmt::Result {
    for thing in things {
        writeln!(
            out,
            "- [{}]({}) by {}",
            thing.display_name(),
            thing.public_url.as_deref().unwrap_or(""),
            creator_name(thing.creator.as_ref())
        )?;
    }
    writeln!(out)
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}
