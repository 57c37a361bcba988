//! Image Entry Component
//!
//! Read-only image display for detail views: a stored identifier in,
//! a display URL out.

use std::fmt;
use std::sync::Arc;

use mp_core::{ConfigValue, Record, Visibility};
use mp_media::{MediaBackend, MediaResult, MediaUuid};

use crate::binding::MediaBinding;

/// Read-only image entry bound to a record's media collection.
pub struct ImageEntry {
    name: String,
    binding: MediaBinding,
}

impl fmt::Debug for ImageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ImageEntry {
    pub fn new(name: impl Into<String>, backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            name: name.into(),
            binding: MediaBinding::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection(mut self, collection: impl Into<ConfigValue<String>>) -> Self {
        self.binding.collection = Some(collection.into());
        self
    }

    pub fn group(mut self, group: impl Into<ConfigValue<String>>) -> Self {
        self.binding.group = Some(group.into());
        self
    }

    /// Conversion used for display URLs.
    pub fn conversion(mut self, conversion: impl Into<ConfigValue<String>>) -> Self {
        self.binding.conversion = Some(conversion.into());
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.binding.visibility = visibility;
        self
    }

    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    /// Display the media of a related record instead of the row's own.
    pub fn relationship(mut self, name: impl Into<String>) -> Self {
        self.binding.relationship = Some(name.into());
        self
    }

    /// Resolve the display URL for one stored identifier; `None` renders
    /// as an empty entry.
    pub async fn image_url(
        &self,
        record: Option<&dyn Record>,
        uuid: &str,
    ) -> MediaResult<Option<String>> {
        self.binding.image_url(record, uuid).await
    }

    /// Ordered identifiers of the record's media for this entry.
    pub async fn state(&self, record: &dyn Record) -> MediaResult<Vec<MediaUuid>> {
        self.binding.state(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mp_core::{Id, MediaAttachable, RecordKey};
    use mp_media::{AddMediaParams, MemoryMediaBackend};

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

    struct Post {
        id: Id,
        author: Article,
    }

    impl Record for Post {
        fn key(&self) -> RecordKey {
            RecordKey::new("Post", self.id)
        }

        fn related(&self, name: &str) -> Option<&dyn Record> {
            (name == "author").then_some(&self.author as &dyn Record)
        }
    }

    async fn attach(
        backend: &MemoryMediaBackend,
        record: &RecordKey,
        name: &str,
        collection: &str,
    ) -> MediaUuid {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, b"image bytes").unwrap();
        backend
            .add_media(record, AddMediaParams::new(&path).collection(collection))
            .await
            .unwrap()
            .uuid
    }

    fn entry(backend: &Arc<MemoryMediaBackend>) -> ImageEntry {
        ImageEntry::new("cover", Arc::clone(backend) as Arc<dyn MediaBackend>)
    }

    #[tokio::test]
    async fn test_image_url_resolves_conversion() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let uuid = attach(&backend, &article.key(), "cover.jpg", "gallery").await;

        let url = entry(&backend)
            .conversion("thumb")
            .image_url(Some(&article), &uuid)
            .await
            .unwrap()
            .unwrap();

        // No thumb rendition was generated, so the original resolves.
        assert!(url.ends_with("cover.jpg"));
    }

    #[tokio::test]
    async fn test_image_url_absent_cases() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let entry = entry(&backend);

        assert!(entry.image_url(None, "uuid-a").await.unwrap().is_none());
        assert!(entry
            .image_url(Some(&article), "uuid-a")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_image_url_traverses_relationship() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let post = Post {
            id: 9,
            author: Article { id: 1 },
        };
        let uuid = attach(&backend, &post.author.key(), "avatar.png", "avatar").await;

        let related = entry(&backend).relationship("author");
        let url = related.image_url(Some(&post), &uuid).await.unwrap();
        assert!(url.is_some());

        // An unknown relationship renders empty.
        let unknown = entry(&backend).relationship("editor");
        assert!(unknown.image_url(Some(&post), &uuid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_private_entry_degrades_to_public_url() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let uuid = attach(&backend, &article.key(), "cover.jpg", "gallery").await;

        let url = entry(&backend)
            .private()
            .image_url(Some(&article), &uuid)
            .await
            .unwrap()
            .unwrap();

        assert!(!url.contains("?expires="));
    }

    #[tokio::test]
    async fn test_state_filters_and_orders() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let a = attach(&backend, &article.key(), "a.jpg", "gallery").await;
        let b = attach(&backend, &article.key(), "b.jpg", "gallery").await;
        attach(&backend, &article.key(), "avatar.jpg", "avatar").await;

        let gallery = entry(&backend).collection("gallery");
        assert_eq!(gallery.state(&article).await.unwrap(), vec![a.clone(), b.clone()]);

        // Persisted order drives the listing.
        backend.reorder(&[b.clone(), a.clone()]).await.unwrap();
        assert_eq!(gallery.state(&article).await.unwrap(), vec![b, a]);
    }

    #[tokio::test]
    async fn test_state_without_capability_is_empty() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let post = Post {
            id: 1,
            author: Article { id: 1 },
        };

        assert!(entry(&backend).state(&post).await.unwrap().is_empty());
    }
}
