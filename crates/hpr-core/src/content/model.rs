//! Content item domain model.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::image::{DEFAULT_IMAGE_MIME, ImagePayload};

/// Backend identifier of a content item.
///
/// Sections disagree on whether ids are numbers or strings, so both are
/// accepted and normalized to text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// A single record of a content section.
///
/// Display fields are kept in backend order so a renderer can show them
/// without knowing the section's schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    /// Gallery items name this field `image_blob`.
    #[serde(default, alias = "image_blob", skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ContentItem {
    /// Creates an item with the given id and no fields.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style image setter.
    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    /// Returns a display field as text.
    ///
    /// Numbers and booleans are rendered; `null`, arrays and objects are not.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Best-effort headline: the first of `title`, `heading`, `name`.
    pub fn headline(&self) -> Option<String> {
        ["title", "heading", "name"]
            .iter()
            .find_map(|field| self.text(field))
    }

    /// The category this item belongs to, when the section is partitioned.
    pub fn category(&self) -> Option<String> {
        self.text("category")
    }

    /// Parses a date field given as `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        let raw = self.text(field)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(&raw).ok().map(|dt| dt.date_naive()))
    }

    /// Displayable image source, if the item carries a non-empty image.
    pub fn image_source(&self) -> Option<String> {
        self.image
            .as_ref()
            .filter(|image| !image.is_empty())
            .map(|image| image.to_data_uri(DEFAULT_IMAGE_MIME))
    }

    /// Images attached as an `images` list, as news articles carry them.
    ///
    /// Entries may be objects with an `image_blob` or `image` field, or bare
    /// payloads. Entries that do not decode and empty payloads are skipped.
    pub fn images(&self) -> Vec<ImagePayload> {
        let Some(Value::Array(entries)) = self.fields.get("images") else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| {
                let payload = match entry {
                    Value::Object(map) => map.get("image_blob").or_else(|| map.get("image"))?,
                    other => other,
                };
                serde_json::from_value::<ImagePayload>(payload.clone()).ok()
            })
            .filter(|image| !image.is_empty())
            .collect()
    }

    /// The item's own image, or else the first of its [`images`](Self::images).
    pub fn cover_source(&self) -> Option<String> {
        self.image_source().or_else(|| {
            self.images()
                .first()
                .map(|image| image.to_data_uri(DEFAULT_IMAGE_MIME))
        })
    }
}
