//! LICENSE.md: the license a thing was published under

use super::UNKNOWN_THING;
use crate::types::{Thing, UNKNOWN};
use std::fmt::{self, Write};

/// Thingiverse license labels with a canonical license text
const KNOWN_LICENSES: &[(&str, &str)] = &[
    (
        "Creative Commons - Attribution",
        "https://creativecommons.org/licenses/by/4.0/",
    ),
    (
        "Creative Commons - Attribution - Share Alike",
        "https://creativecommons.org/licenses/by-sa/4.0/",
    ),
    (
        "Creative Commons - Attribution - No Derivatives",
        "https://creativecommons.org/licenses/by-nd/4.0/",
    ),
    (
        "Creative Commons - Attribution - Non-Commercial",
        "https://creativecommons.org/licenses/by-nc/4.0/",
    ),
    (
        "Creative Commons - Attribution - Non-Commercial - Share Alike",
        "https://creativecommons.org/licenses/by-nc-sa/4.0/",
    ),
    (
        "Creative Commons - Attribution - Non-Commercial - No Derivatives",
        "https://creativecommons.org/licenses/by-nc-nd/4.0/",
    ),
    (
        "Creative Commons - Public Domain Dedication",
        "https://creativecommons.org/publicdomain/zero/1.0/",
    ),
    ("GNU - GPL", "https://www.gnu.org/licenses/gpl-3.0.en.html"),
    ("GNU - LGPL", "https://www.gnu.org/licenses/lgpl-3.0.en.html"),
    ("BSD License", "https://opensource.org/licenses/BSD-3-Clause"),
];

/// Canonical URL for a known license label
///
/// # Examples
///
/// ```
/// use thing_archiver::render::license_url;
///
/// assert_eq!(license_url("GNU - GPL"), Some("https://www.gnu.org/licenses/gpl-3.0.en.html"));
/// assert_eq!(license_url("All rights reserved"), None);
/// ```
#[must_use]
pub fn license_url(label: &str) -> Option<&'static str> {
    KNOWN_LICENSES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, url)| *url)
}

/// Render the license document for a thing
#[must_use]
pub fn render_license(thing: &Thing) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_license(&mut out, thing);
    out
}

fn write_license(out: &mut String, thing: &Thing) -> fmt::Result {
    let label = thing.license_label();
    let url = license_url(label);
    let thing_url = thing.public_url.as_deref().unwrap_or("");
    let creator = thing.creator.as_ref();

    writeln!(out, "# License\n")?;
    writeln!(out, "## {}\n", thing.name().unwrap_or(UNKNOWN_THING))?;
    writeln!(out, "**Thing URL:** [{thing_url}]({thing_url})\n")?;
    writeln!(
        out,
        "**Creator:** [{}]({})\n",
        creator.map_or(UNKNOWN, |c| c.display_name()),
        creator.map_or("", |c| c.url())
    )?;
    writeln!(out, "**License:** {label}\n")?;
    if let Some(url) = url {
        writeln!(out, "**License URL:** [{url}]({url})\n")?;
    }
    writeln!(out, "---\n")?;
    writeln!(out, "## License Summary\n")?;

    if label.contains("Creative Commons") {
        writeln!(out, "This work is licensed under a Creative Commons license.\n")?;
        for (needles, right) in CC_RIGHTS {
            if needles.iter().any(|n| label.contains(n)) {
                writeln!(out, "- {right}")?;
            }
        }
        writeln!(out)?;
    } else if label.contains("LGPL") {
        writeln!(out, "This work is licensed under the GNU Lesser General Public License.\n")?;
        writeln!(
            out,
            "You are free to use, modify, and distribute this work. Changes to the work itself must be released under the LGPL, but it may be combined with works under other licenses.\n"
        )?;
    } else if label.contains("GPL") {
        writeln!(out, "This work is licensed under the GNU General Public License.\n")?;
        writeln!(
            out,
            "You are free to use, modify, and distribute this work, but any derivative works must also be released under the GPL.\n"
        )?;
    } else if label.contains("BSD") {
        writeln!(out, "This work is licensed under the BSD License.\n")?;
        writeln!(
            out,
            "You are free to use, modify, and distribute this work with minimal restrictions.\n"
        )?;
    } else if label == UNKNOWN {
        writeln!(out, "No license information was published for this thing.\n")?;
        writeln!(
            out,
            "Assume all rights are reserved by the creator unless the thing page says otherwise."
        )?;
        return Ok(());
    } else {
        writeln!(out, "This work is licensed under \"{label}\".\n")?;
        writeln!(out, "No summary is available for this license; see the thing page for its terms.")?;
        return Ok(());
    }

    match url {
        Some(url) => writeln!(out, "For full license terms, see: {url}"),
        None => writeln!(out, "For full license terms, see the thing page: {thing_url}"),
    }
}

/// Creative Commons rights, each with the label fragments that grant them
const CC_RIGHTS: &[(&[&str], &str)] = &[
    (
        &["Attribution"],
        "**Attribution**: You must give appropriate credit, provide a link to the license, and indicate if changes were made.",
    ),
    (
        &["Non-Commercial", "NonCommercial"],
        "**Non-Commercial**: You may not use the material for commercial purposes.",
    ),
    (
        &["Share Alike", "ShareAlike"],
        "**Share Alike**: If you remix, transform, or build upon the material, you must distribute your contributions under the same license.",
    ),
    (
        &["No Derivatives", "NoDerivatives"],
        "**No Derivatives**: If you remix, transform, or build upon the material, you may not distribute the modified material.",
    ),
    (
        &["Public Domain"],
        "**Public Domain**: The creator has waived all copyright and related rights. You can copy, modify, distribute and perform the work, even for commercial purposes, all without asking permission.",
    ),
];

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::thing_from;
    use serde_json::json;

    fn licensed(label: &str) -> Thing {
        thing_from(json!({
            "id": 1,
            "name": "Cube",
            "public_url": "https://t/1",
            "creator": {"name": "tbuser", "public_url": "https://t/tbuser"},
            "license": label
        }))
    }

    #[test]
    fn every_known_label_has_a_url() {
        for (label, url) in KNOWN_LICENSES {
            assert_eq!(license_url(label), Some(*url));
        }
    }

    #[test]
    fn creative_commons_lists_matching_rights() {
        let text = render_license(&licensed(
            "Creative Commons - Attribution - Non-Commercial - Share Alike",
        ));

        assert!(text.starts_with("# License\n\n## Cube\n\n**Thing URL:** [https://t/1](https://t/1)\n\n"));
        assert!(text.contains("**Creator:** [tbuser](https://t/tbuser)\n"));
        assert!(text.contains(
            "**License URL:** [https://creativecommons.org/licenses/by-nc-sa/4.0/](https://creativecommons.org/licenses/by-nc-sa/4.0/)"
        ));
        assert!(text.contains("- **Attribution**"));
        assert!(text.contains("- **Non-Commercial**"));
        assert!(text.contains("- **Share Alike**"));
        assert!(!text.contains("- **No Derivatives**"));
        assert!(!text.contains("- **Public Domain**"));
        assert!(text.ends_with("For full license terms, see: https://creativecommons.org/licenses/by-nc-sa/4.0/\n"));
    }

    #[test]
    fn public_domain_has_single_right() {
        let text = render_license(&licensed("Creative Commons - Public Domain Dedication"));
        assert!(text.contains("- **Public Domain**"));
        assert!(!text.contains("- **Attribution**"));
    }

    #[test]
    fn gpl_and_lgpl_are_told_apart() {
        let gpl = render_license(&licensed("GNU - GPL"));
        assert!(gpl.contains("GNU General Public License"));

        let lgpl = render_license(&licensed("GNU - LGPL"));
        assert!(lgpl.contains("GNU Lesser General Public License"));
        assert!(lgpl.contains("https://www.gnu.org/licenses/lgpl-3.0.en.html"));
    }

    #[test]
    fn bsd_summary() {
        let text = render_license(&licensed("BSD License"));
        assert!(text.contains("This work is licensed under the BSD License."));
    }

    #[test]
    fn missing_license_renders_unknown() {
        let text = render_license(&thing_from(json!({"id": 1})));
        assert!(text.contains("## Unknown Thing\n"));
        assert!(text.contains("**Creator:** [Unknown]()\n"));
        assert!(text.contains("**License:** Unknown\n"));
        assert!(!text.contains("**License URL:**"));
        assert!(text.contains("No license information was published"));
    }

    #[test]
    fn unrecognized_license_gets_generic_summary() {
        let text = render_license(&licensed("All Rights Reserved"));
        assert!(text.contains("**License:** All Rights Reserved\n"));
        assert!(!text.contains("**License URL:**"));
        assert!(text.contains("No summary is available for this license"));
    }
}
