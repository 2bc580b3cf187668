//! Core record types for thing-archiver
//!
//! Every record the API returns is kept verbatim in a [`Fetched`] wrapper, so
//! the manifest stays a faithful copy of what was fetched. The archiver reads
//! records through typed views whose display fields decode leniently: a value
//! of an unexpected shape reads as absent instead of rejecting the record.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::ops::Deref;

/// Fallback shown for missing names, creators and licenses
pub const UNKNOWN: &str = "Unknown";

/// Key under which the archiver stores an asset's on-disk name
pub const SAFE_NAME_KEY: &str = "_safe_name";

/// Identifier of a thing (the API uses integers, the CLI accepts any string)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThingId {
    /// Numeric id as returned by the API
    Number(u64),
    /// Any other id form
    Text(String),
}

impl std::fmt::Display for ThingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThingId::Number(n) => write!(f, "{n}"),
            ThingId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ThingId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl std::str::FromStr for ThingId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s.to_string()),
        })
    }
}

/// A remote record exactly as fetched, read through the typed view `T`
///
/// Serializes back to the original JSON object. Nulls, empty lists and fields
/// the view does not model survive unchanged; the only key the archiver ever
/// adds is [`SAFE_NAME_KEY`].
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<T> {
    view: T,
    raw: Map<String, Value>,
}

impl<T: DeserializeOwned> Fetched<T> {
    /// Wrap a raw JSON record
    ///
    /// # Errors
    /// Returns error if `value` is not an object or the view cannot be decoded
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(raw) => {
                let view = serde_json::from_value(Value::Object(raw.clone()))?;
                Ok(Self { view, raw })
            }
            other => Err(serde_json::Error::custom(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }
}

impl<T> Fetched<T> {
    /// The record as fetched, plus any `_safe_name` the archiver set
    #[must_use]
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// On-disk name the archiver gave this asset, if any
    #[must_use]
    pub fn safe_name(&self) -> Option<&str> {
        self.raw.get(SAFE_NAME_KEY).and_then(Value::as_str)
    }

    pub(crate) fn set_safe_name(&mut self, name: impl Into<String>) {
        self.raw
            .insert(SAFE_NAME_KEY.to_string(), Value::String(name.into()));
    }
}

impl<T> Deref for Fetched<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.view
    }
}

impl<T> Serialize for Fetched<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Fetched<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

/// Decode a display field, reading a value of unexpected shape as the default
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// A user reference (thing creator, comment author, maker)
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Creator {
    /// Login name
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Display first name
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    /// Profile page
    #[serde(default, deserialize_with = "lenient")]
    pub public_url: Option<String>,
}

impl Creator {
    /// Name to show: `name`, then `first_name`, then "Unknown"
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty(&self.name)
            .or_else(|| non_empty(&self.first_name))
            .unwrap_or(UNKNOWN)
    }

    /// Profile URL or an empty string
    #[must_use]
    pub fn url(&self) -> &str {
        self.public_url.as_deref().unwrap_or("")
    }
}

/// Display name of an optional creator
#[must_use]
pub fn creator_name(creator: Option<&Creator>) -> &str {
    creator.map_or(UNKNOWN, Creator::display_name)
}

/// A tag attached to a thing
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Tag {
    /// Tag text
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// Short thing record: listing entries, ancestors and derivatives (remixes)
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ThingSummary {
    /// Thing id
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ThingId>,
    /// Display name
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Thing page
    #[serde(default, deserialize_with = "lenient")]
    pub public_url: Option<String>,
    /// Author
    #[serde(default, deserialize_with = "lenient")]
    pub creator: Option<Creator>,
}

impl ThingSummary {
    /// Name or "Unknown"
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty(&self.name).unwrap_or(UNKNOWN)
    }
}

/// The archived item
///
/// Fetched once per run and never modified by the archiver. The thing id is
/// the one field that must decode.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Thing {
    /// Thing id
    pub id: ThingId,
    /// Display name
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Last modification timestamp, compared verbatim for change detection
    #[serde(default, deserialize_with = "lenient")]
    pub modified: Option<String>,
    /// Creation timestamp
    #[serde(default, deserialize_with = "lenient")]
    pub added: Option<String>,
    /// Thing page
    #[serde(default, deserialize_with = "lenient")]
    pub public_url: Option<String>,
    /// Author
    #[serde(default, deserialize_with = "lenient")]
    pub creator: Option<Creator>,
    /// Description (may contain HTML)
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Print/assembly instructions (may contain HTML)
    #[serde(default, deserialize_with = "lenient")]
    pub instructions: Option<String>,
    /// License label (e.g. "Creative Commons - Attribution")
    #[serde(default, deserialize_with = "lenient")]
    pub license: Option<String>,
    /// Number of likes
    #[serde(default, deserialize_with = "lenient")]
    pub like_count: Option<u64>,
    /// Number of downloads
    #[serde(default, deserialize_with = "lenient")]
    pub download_count: Option<u64>,
    /// Number of views
    #[serde(default, deserialize_with = "lenient")]
    pub view_count: Option<u64>,
    /// Number of collections containing the thing
    #[serde(default, deserialize_with = "lenient")]
    pub collect_count: Option<u64>,
    /// Tags
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<Vec<Tag>>,
    /// Things this one was remixed from
    #[serde(default, deserialize_with = "lenient")]
    pub ancestors: Option<Vec<ThingSummary>>,
}

impl Thing {
    /// Display name, if the API returned a non-empty one
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    /// License label or "Unknown"
    #[must_use]
    pub fn license_label(&self) -> &str {
        non_empty(&self.license).unwrap_or(UNKNOWN)
    }

    /// Non-empty tag names in API order
    #[must_use]
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .iter()
            .flatten()
            .filter_map(|tag| non_empty(&tag.name))
            .collect()
    }

    /// Ancestor records (empty when absent)
    #[must_use]
    pub fn ancestors(&self) -> &[ThingSummary] {
        self.ancestors.as_deref().unwrap_or(&[])
    }
}

/// A downloadable file of a thing (STL, SCAD, ...)
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ThingFile {
    /// File id within the thing
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ThingId>,
    /// File name as uploaded
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Size in bytes
    #[serde(default, deserialize_with = "lenient")]
    pub size: Option<u64>,
    /// Direct download URL
    #[serde(default, deserialize_with = "lenient")]
    pub download_url: Option<String>,
    /// Public page of the file
    #[serde(default, deserialize_with = "lenient")]
    pub public_url: Option<String>,
}

impl ThingFile {
    /// URL to download from: `download_url`, falling back to `public_url`
    #[must_use]
    pub fn resolved_url(&self) -> Option<&str> {
        non_empty(&self.download_url).or_else(|| non_empty(&self.public_url))
    }
}

/// One rendition of an image
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ImageSize {
    /// Rendition type ("display", "preview", "thumb")
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    /// Size label ("large", "medium", ...)
    #[serde(default, deserialize_with = "lenient")]
    pub size: Option<String>,
    /// Rendition URL
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// Rendition types in order of preference
pub const IMAGE_SIZE_PREFERENCE: [&str; 3] = ["display", "preview", "thumb"];

/// An image of a thing
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ThingImage {
    /// Image id within the thing
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ThingId>,
    /// Image name as uploaded
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Direct URL, used when no preferred rendition exists
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    /// Available renditions
    #[serde(default, deserialize_with = "lenient")]
    pub sizes: Vec<ImageSize>,
}

impl ThingImage {
    /// URL to download from
    ///
    /// Picks the first rendition of type `display`, then `preview`, then
    /// `thumb`, and falls back to the image's direct `url`.
    #[must_use]
    pub fn resolved_url(&self) -> Option<&str> {
        IMAGE_SIZE_PREFERENCE
            .iter()
            .find_map(|wanted| {
                self.sizes
                    .iter()
                    .filter(|size| size.kind.as_deref() == Some(*wanted))
                    .find_map(|size| non_empty(&size.url))
            })
            .or_else(|| non_empty(&self.url))
    }
}

/// A recorded physical print ("make") of a thing
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Make {
    /// Make id
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ThingId>,
    /// Make page
    #[serde(default, deserialize_with = "lenient")]
    pub public_url: Option<String>,
    /// Who printed it
    #[serde(default, deserialize_with = "lenient")]
    pub maker: Option<Creator>,
    /// When it was posted
    #[serde(default, deserialize_with = "lenient")]
    pub added: Option<String>,
}

/// A comment on a thing
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Comment {
    /// Comment id
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ThingId>,
    /// Comment text (may contain HTML)
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
    /// When it was posted
    #[serde(default, deserialize_with = "lenient")]
    pub added: Option<String>,
    /// Author
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<Creator>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
