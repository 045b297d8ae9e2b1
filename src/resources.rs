//! Wire models for the admin API resources.
//!
//! Field names follow the server's camelCase JSON. Resource metadata is
//! stored server-side as a JSON-encoded string and is parsed into a map on
//! read; writeable payloads submit it as a plain object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PeonyAdminError, Result};

/// Arbitrary key-value metadata attached to a resource.
pub type Metadata = serde_json::Map<String, Value>;

/// Codec for the server's string-encoded metadata field. Reads accept a
/// JSON-encoded string, a plain object, or null; writes emit the encoded
/// string form the server stores.
pub mod metadata_codec {
    use super::Metadata;
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        match raw {
            None | Some(Value::Null) => Ok(Metadata::new()),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(Metadata::new()),
            Some(Value::String(text)) => {
                let parsed: Value = serde_json::from_str(&text)
                    .map_err(|e| D::Error::custom(format!("metadata is not valid JSON: {}", e)))?;
                match parsed {
                    Value::Object(map) => Ok(map),
                    _ => Err(D::Error::custom("metadata string does not encode an object")),
                }
            }
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(D::Error::custom("metadata is neither a string nor an object")),
        }
    }

    pub fn serialize<S>(metadata: &Metadata, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = Value::Object(metadata.clone()).to_string();
        serializer.serialize_str(&encoded)
    }
}

/// Publication status of a post or page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    #[default]
    Draft,
}

/// Who can read a post or page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Paid,
}

/// Posts and pages share one resource, discriminated by this type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Post,
    Page,
}

/// Role of an admin user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Member,
    Developer,
    Author,
    Contributor,
}

/// A post or page as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub post_type: PostType,
    #[serde(default)]
    pub authors: Vec<User>,
    #[serde(default)]
    pub tags: Vec<PostTag>,
    #[serde(default, with = "metadata_codec")]
    pub metadata: Metadata,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Display name of the primary author: first/last name when present,
    /// otherwise the author's handle.
    pub fn primary_author_name(&self) -> Option<String> {
        self.authors.first().map(User::display_name)
    }

    /// Title of the primary tag, if the post carries any
    pub fn primary_tag_title(&self) -> Option<&str> {
        self.tags.first().map(|tag| tag.title.as_str())
    }

    /// Snapshot the submittable fields for an update
    pub fn to_writeable(&self) -> PostWriteable {
        PostWriteable {
            status: Some(self.status),
            featured: self.featured,
            visibility: self.visibility,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            content: self.content.clone(),
            handle: self.handle.clone(),
            excerpt: self.excerpt.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Fields the admin may submit when creating or updating a post or page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWriteable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    pub featured: bool,
    pub visibility: Visibility,
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub handle: String,
    pub excerpt: String,
    pub metadata: Metadata,
}

impl PostWriteable {
    /// A title is the only hard requirement for submission
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PeonyAdminError::general("missing post title"));
        }
        Ok(())
    }
}

/// A tag as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTag {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, with = "metadata_codec")]
    pub metadata: Metadata,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PostTag {
    pub fn to_writeable(&self) -> PostTagWriteable {
        PostTagWriteable {
            title: self.title.clone(),
            handle: self.handle.clone(),
            content: self.content.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Fields the admin may submit for a tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTagWriteable {
    pub title: String,
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub metadata: Metadata,
}

impl PostTagWriteable {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PeonyAdminError::general("missing tag title"));
        }
        if !self.handle.is_empty() && !is_valid_handle(&self.handle) {
            return Err(PeonyAdminError::InvalidHandle {
                handle: self.handle.clone(),
            });
        }
        Ok(())
    }
}

/// An admin user as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, with = "metadata_codec")]
    pub metadata: Metadata,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// First and last name when either is present, otherwise the handle
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.handle.clone()
        } else {
            full.to_string()
        }
    }

    /// Whether the user has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn to_writeable(&self) -> UserWriteable {
        UserWriteable {
            handle: self.handle.clone(),
            email: self.email.clone(),
            role: self.role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Fields the admin may submit when updating a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWriteable {
    pub handle: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub metadata: Metadata,
}

impl UserWriteable {
    pub fn validate(&self) -> Result<()> {
        if !is_valid_handle(&self.handle) {
            return Err(PeonyAdminError::InvalidHandle {
                handle: self.handle.clone(),
            });
        }
        Ok(())
    }
}

/// Store-level settings as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default_locale_code: String,
    #[serde(default)]
    pub default_currency_code: String,
    #[serde(default)]
    pub swap_link_template: Option<String>,
    #[serde(default)]
    pub payment_link_template: Option<String>,
    #[serde(default)]
    pub invite_link_template: Option<String>,
    #[serde(default)]
    pub default_stock_location_id: Option<String>,
    #[serde(default)]
    pub default_sales_channel_id: Option<String>,
    #[serde(default, with = "metadata_codec")]
    pub metadata: Metadata,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A handle is a non-empty slug: ASCII alphanumerics, hyphens, and
/// underscores only
pub fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Ordered key/value editing buffer for a resource's metadata.
///
/// Keeps insertion order so the form can be rendered and sorted stably,
/// then collapses back into an object for submission (later duplicates
/// overwrite earlier ones).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataEditor {
    entries: Vec<(String, String)>,
}

impl MetadataEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an editor from a resource's metadata map. Non-string values
    /// are rendered as their JSON text.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let entries = metadata
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a fresh pair with a generated unique key (`new key N`),
    /// returning the key.
    pub fn add_pair(&mut self) -> String {
        let mut counter = 1;
        let mut key = format!("new key {}", counter);
        while self.entries.iter().any(|(existing, _)| existing == &key) {
            counter += 1;
            key = format!("new key {}", counter);
        }
        self.entries.push((key.clone(), "new value".to_string()));
        key
    }

    /// Rename the key at `index`. The rename is applied either way, but a
    /// collision with another entry's key is reported so the caller can
    /// surface it and block submission.
    pub fn rename_key(&mut self, index: usize, new_key: &str) -> Result<()> {
        let collision = self
            .entries
            .iter()
            .enumerate()
            .any(|(i, (key, _))| i != index && key == new_key);

        if let Some(entry) = self.entries.get_mut(index) {
            entry.0 = new_key.to_string();
        }

        if collision {
            return Err(PeonyAdminError::DuplicateMetadataKey {
                key: new_key.to_string(),
            });
        }
        Ok(())
    }

    pub fn set_value(&mut self, index: usize, new_value: &str) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.1 = new_value.to_string();
        }
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
    }

    /// Collapse into a metadata object for submission.
    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        for (key, value) in &self.entries {
            metadata.insert(key.clone(), Value::String(value.clone()));
        }
        metadata
    }
}
