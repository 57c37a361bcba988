//! Record identity and media capability
//!
//! The host framework hands adapter components a record; components only
//! ever see it through these traits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary key type for host records
pub type Id = i64;

/// Identifies the host record that owns a media collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Record type name (e.g., "Article", "User")
    pub record_type: String,
    /// Record primary key
    pub id: Id,
}

impl RecordKey {
    pub fn new(record_type: impl Into<String>, id: Id) -> Self {
        Self {
            record_type: record_type.into(),
            id,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.record_type, self.id)
    }
}

/// A host record handed to an adapter component.
pub trait Record: Send + Sync {
    /// Stable key for this record.
    fn key(&self) -> RecordKey;

    /// Media capability, when this record type supports attachments.
    ///
    /// Types that attach media return `Some(self)`; everything else keeps
    /// the default. Components treat `None` as "skip", never as an error.
    fn media_capability(&self) -> Option<&dyn MediaAttachable> {
        None
    }

    /// Resolve a named relationship to another record.
    ///
    /// Display components traverse this when configured to show a related
    /// record's media. An unloaded or unknown relationship is `None`.
    fn related(&self, name: &str) -> Option<&dyn Record> {
        let _ = name;
        None
    }
}

/// Capability marker for record types that support media attachment.
///
/// Conformance is the check: a record either implements this and exposes
/// it through [`Record::media_capability`], or its media operations are
/// skipped.
pub trait MediaAttachable: Record {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Article {
        id: Id,
    }

    impl Record for Article {
        fn key(&self) -> RecordKey {
            RecordKey::new("Article", self.id)
        }

        fn media_capability(&self) -> Option<&dyn MediaAttachable> {
            Some(self)
        }
    }

    impl MediaAttachable for Article {}

    struct Tag {
        id: Id,
    }

    impl Record for Tag {
        fn key(&self) -> RecordKey {
            RecordKey::new("Tag", self.id)
        }
    }

    #[test]
    fn test_record_key_display() {
        let key = RecordKey::new("Article", 42);
        assert_eq!(key.to_string(), "Article#42");
    }

    #[test]
    fn test_capability_conformance() {
        let article = Article { id: 1 };
        let tag = Tag { id: 2 };

        assert!(article.media_capability().is_some());
        assert!(tag.media_capability().is_none());
    }

    #[test]
    fn test_capability_exposes_record_key() {
        let article = Article { id: 7 };
        let attachable = article.media_capability().unwrap();
        assert_eq!(attachable.key(), RecordKey::new("Article", 7));
    }

    #[test]
    fn test_related_defaults_to_none() {
        let article = Article { id: 1 };
        assert!(article.related("author").is_none());
    }
}
