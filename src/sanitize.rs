//! Filesystem-safe names for archived things, files and images
//!
//! [`sanitize_name`] is total and deterministic: any input string maps to the
//! same output every time, and sanitizing an already sanitized name is a no-op.
//! It may return an empty string; callers substitute their own fallback name.

/// Longest name (in characters) the sanitizer produces
pub const MAX_NAME_LEN: usize = 200;

/// Image extensions accepted as-is on a sanitized image name
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg"];

/// Extension appended when neither the name nor the URL carries an image extension
pub const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

/// Characters illegal on common filesystems
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Punctuation removed entirely from directory and image names
const STRIPPED_PUNCTUATION: &[char] = &[
    '<', '>', ':', '"', '/', '\\', '|', '?', '*', ',', ';', '!', '@', '#', '$', '%', '^', '&',
    '(', ')', '+', '=', '[', ']', '{', '}', '\'', '`', '~',
];

/// How a display string should be turned into an on-disk name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SanitizeMode {
    /// Downloadable files: illegal characters become `_`, case is kept
    Generic,
    /// Per-thing output directory: punctuation stripped, lowercase, `_` for spaces
    Directory,
    /// Image files: same rules as [`SanitizeMode::Directory`]
    Image,
}

/// Map an arbitrary display string to a filesystem-safe name
///
/// # Examples
///
/// ```
/// use thing_archiver::sanitize::{sanitize_name, SanitizeMode};
///
/// assert_eq!(sanitize_name("Calibration Cube (v2)!", SanitizeMode::Directory), "calibration_cube_v2");
/// assert_eq!(sanitize_name("part: A/B.stl", SanitizeMode::Generic), "part_ A_B.stl");
/// ```
#[must_use]
pub fn sanitize_name(name: &str, mode: SanitizeMode) -> String {
    let cleaned: String = match mode {
        SanitizeMode::Generic => name
            .chars()
            .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
            .collect(),
        SanitizeMode::Directory | SanitizeMode::Image => name
            .chars()
            .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
            .map(|c| if c == ' ' { '_' } else { c })
            .collect::<String>()
            .to_lowercase(),
    };

    let trimmed = trim_edges(&cleaned);
    if trimmed.chars().count() <= MAX_NAME_LEN {
        return trimmed.to_string();
    }

    // Cutting can expose a trailing space or dot again
    let truncated: String = trimmed.chars().take(MAX_NAME_LEN).collect();
    trim_edges(&truncated).to_string()
}

fn trim_edges(name: &str) -> &str {
    name.trim_matches(|c| c == ' ' || c == '.')
}

/// Make sure an image name ends in a recognized image extension
///
/// If `safe_name` already carries one of [`IMAGE_EXTENSIONS`] (compared
/// case-insensitively) it is returned unchanged. Otherwise the extension of the
/// download URL's path is appended when it is an image extension, and
/// [`DEFAULT_IMAGE_EXTENSION`] when it is not.
///
/// # Examples
///
/// ```
/// use thing_archiver::sanitize::ensure_image_extension;
///
/// assert_eq!(ensure_image_extension("cover", "https://cdn.example.com/a/b.PNG"), "cover.png");
/// assert_eq!(ensure_image_extension("cover", "https://cdn.example.com/a/b"), "cover.jpg");
/// assert_eq!(ensure_image_extension("cover.webp", "https://cdn.example.com/b.png"), "cover.webp");
/// ```
#[must_use]
pub fn ensure_image_extension(safe_name: &str, download_url: &str) -> String {
    if extension_of(safe_name).is_some_and(|ext| is_image_extension(&ext)) {
        return safe_name.to_string();
    }

    let url_ext = url_path(download_url)
        .and_then(|path| extension_of(&path))
        .filter(|ext| is_image_extension(ext));

    match url_ext {
        Some(ext) => format!("{safe_name}{ext}"),
        None => format!("{safe_name}{DEFAULT_IMAGE_EXTENSION}"),
    }
}

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// Lowercased extension including the dot, taken from the last path segment
///
/// A leading dot (".hidden") is not an extension.
fn extension_of(name: &str) -> Option<String> {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    let dot = file_name.rfind('.')?;
    if dot == 0 {
        return None;
    }
    Some(file_name[dot..].to_lowercase())
}

/// Path component of a URL, falling back to the raw string minus query/fragment
fn url_path(download_url: &str) -> Option<String> {
    match url::Url::parse(download_url) {
        Ok(parsed) => Some(parsed.path().to_string()),
        Err(_) => download_url
            .split(['?', '#'])
            .next()
            .filter(|p| !p.is_empty())
            .map(str::to_string),
    }
}
