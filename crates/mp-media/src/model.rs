//! Media Item Model
//!
//! The record-owned media item as the backend exposes it to components,
//! plus the filter and commit parameter types the backend contract uses.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use mp_core::RecordKey;
use serde::{Deserialize, Serialize};

/// Stable external identifier of one media item (a UUID string).
pub type MediaUuid = String;

/// Metadata payload captured when a file is committed.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A named derived rendition of a media file (e.g., a thumbnail size).
///
/// Backends that materialize renditions record their file name, size,
/// and MIME type here; older backends only record the name and the
/// original file's attributes apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaConversion {
    /// Conversion name (e.g., "thumb", "preview")
    pub name: String,
    /// File name of the generated rendition, when materialized
    pub file_name: Option<String>,
    /// Size in bytes, when known
    pub size: Option<u64>,
    /// MIME type, when known
    pub mime_type: Option<String>,
}

impl MediaConversion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            size: None,
            mime_type: None,
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// One stored media item attached to a host record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Stable external identifier
    pub uuid: MediaUuid,
    /// Owning record
    pub record: RecordKey,
    /// Display name, when set apart from the file name
    pub name: Option<String>,
    /// Original file name
    pub file_name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type
    pub mime_type: String,
    /// Storage disk holding the file
    pub disk: String,
    /// Named sub-collection within the record's media
    pub collection: Option<String>,
    /// Named group within the collection
    pub group: Option<String>,
    /// Display/sort order within the record's media
    pub order: u32,
    /// Metadata captured at commit time
    pub metadata: Metadata,
    /// Generated renditions
    pub conversions: Vec<MediaConversion>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl MediaItem {
    /// Display name, falling back to the original file name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.file_name)
    }

    /// Find a conversion by name.
    pub fn conversion(&self, name: &str) -> Option<&MediaConversion> {
        self.conversions.iter().find(|c| c.name == name)
    }

    /// Descriptor name for a conversion: the explicit display name wins,
    /// then the rendition's file name, then the original file name.
    pub fn name_for(&self, conversion: Option<&str>) -> &str {
        if let Some(name) = self.name.as_deref() {
            return name;
        }
        conversion
            .and_then(|c| self.conversion(c))
            .and_then(|c| c.file_name.as_deref())
            .unwrap_or(&self.file_name)
    }

    /// Descriptor size, per conversion when recorded.
    pub fn size_for(&self, conversion: Option<&str>) -> u64 {
        conversion
            .and_then(|c| self.conversion(c))
            .and_then(|c| c.size)
            .unwrap_or(self.size)
    }

    /// Descriptor MIME type, per conversion when recorded.
    pub fn mime_type_for(&self, conversion: Option<&str>) -> &str {
        conversion
            .and_then(|c| self.conversion(c))
            .and_then(|c| c.mime_type.as_deref())
            .unwrap_or(&self.mime_type)
    }

    /// Check if this is an image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Collection/group filter for listing a record's media.
///
/// An unset side matches everything; a set side requires an exact match,
/// so items without a collection never match a collection-scoped filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaFilter {
    pub collection: Option<String>,
    pub group: Option<String>,
}

impl MediaFilter {
    /// Match every media item of the record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter from already-resolved component knobs.
    pub fn scoped(collection: Option<String>, group: Option<String>) -> Self {
        Self { collection, group }
    }

    /// Match items in one collection.
    pub fn in_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            group: None,
        }
    }

    /// Restrict to one group within the collection.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn matches(&self, item: &MediaItem) -> bool {
        if let Some(collection) = self.collection.as_deref() {
            if item.collection.as_deref() != Some(collection) {
                return false;
            }
        }
        if let Some(group) = self.group.as_deref() {
            if item.group.as_deref() != Some(group) {
                return false;
            }
        }
        true
    }
}

/// Parameters for committing a staged file into a record's media
/// collection.
#[derive(Debug, Clone, Default)]
pub struct AddMediaParams {
    /// Source file on disk
    pub path: PathBuf,
    /// Target collection
    pub collection: Option<String>,
    /// Target group within the collection
    pub group: Option<String>,
    /// Display name for the new item
    pub name: Option<String>,
    /// Metadata payload stored with the item
    pub metadata: Metadata,
    /// Storage disk; the backend default applies when absent
    pub disk: Option<String>,
}

impl AddMediaParams {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn disk(mut self, disk: impl Into<String>) -> Self {
        self.disk = Some(disk.into());
        self
    }
}
