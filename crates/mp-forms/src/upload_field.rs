//! Upload Field Component
//!
//! Binds a single/multi file-picker form field to a record's media
//! collection: state loads from the relation when the form opens, staged
//! uploads commit on save, removals delete, and drag-reorder persists
//! through the backend.

use std::fmt;
use std::sync::Arc;

use mp_core::{
    ConfigValue, MediaAttachable, PanelConfig, Record, ResolveContext, TemporaryFile, Visibility,
};
use mp_media::{
    resolve_display_url, AddMediaParams, MediaBackend, MediaFilter, MediaResult, MediaUuid,
    Metadata,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::state::{FieldEntry, FieldState};

/// Display descriptor for an already-committed file, consumed by the
/// picker's preview pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub url: String,
}

/// Outcome of committing one staged upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Committed; the state entry becomes the issued identifier.
    Stored(MediaUuid),
    /// The record cannot attach media; the upload stays a plain file.
    Untouched,
    /// The staged file vanished; the entry is dropped.
    Skipped,
}

/// File upload form component bound to a media collection.
pub struct UploadField {
    name: String,
    multiple: bool,
    visibility: Visibility,
    collection: Option<ConfigValue<String>>,
    group: Option<ConfigValue<String>>,
    disk: Option<ConfigValue<String>>,
    conversion: Option<ConfigValue<String>>,
    media_name: Option<ConfigValue<String>>,
    metadata: Option<ConfigValue<Metadata>>,
    panel: PanelConfig,
    backend: Arc<dyn MediaBackend>,
}

impl fmt::Debug for UploadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadField")
            .field("name", &self.name)
            .field("multiple", &self.multiple)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

impl UploadField {
    pub fn new(name: impl Into<String>, backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            name: name.into(),
            multiple: false,
            visibility: Visibility::default(),
            collection: None,
            group: None,
            disk: None,
            conversion: None,
            media_name: None,
            metadata: None,
            panel: PanelConfig::default(),
            backend,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Serve previews through signed URLs when the disk supports them.
    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    pub fn collection(mut self, collection: impl Into<ConfigValue<String>>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn group(mut self, group: impl Into<ConfigValue<String>>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn disk(mut self, disk: impl Into<ConfigValue<String>>) -> Self {
        self.disk = Some(disk.into());
        self
    }

    /// Conversion used for preview URLs.
    pub fn conversion(mut self, conversion: impl Into<ConfigValue<String>>) -> Self {
        self.conversion = Some(conversion.into());
        self
    }

    /// Display name for newly committed media; resolvers see the staged
    /// upload through the context.
    pub fn media_name(mut self, media_name: ConfigValue<String>) -> Self {
        self.media_name = Some(media_name);
        self
    }

    /// Metadata payload stored with newly committed media.
    pub fn metadata(mut self, metadata: ConfigValue<Metadata>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn panel_config(mut self, panel: PanelConfig) -> Self {
        self.panel = panel;
        self
    }

    fn collection_for(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        self.collection.as_ref().map(|knob| knob.get(ctx))
    }

    fn group_for(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        self.group.as_ref().map(|knob| knob.get(ctx))
    }

    fn conversion_for(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        self.conversion.as_ref().map(|knob| knob.get(ctx))
    }

    /// Disk for new media: the field knob, then the panel default, then
    /// whatever the backend falls back to.
    fn disk_for(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        self.disk
            .as_ref()
            .map(|knob| knob.get(ctx))
            .or_else(|| self.panel.default_disk.clone())
    }

    fn media_filter(&self, ctx: &ResolveContext<'_>) -> MediaFilter {
        MediaFilter::scoped(self.collection_for(ctx), self.group_for(ctx))
    }

    /// Load field state from the record's media relation.
    ///
    /// Single-valued fields keep only the first attached item.
    #[instrument(skip(self, record), fields(field = %self.name))]
    pub async fn load_state(&self, record: &dyn Record) -> MediaResult<FieldState> {
        let Some(attachable) = record.media_capability() else {
            return Ok(FieldState::new());
        };

        let key = attachable.key();
        let ctx = ResolveContext::for_record(&key);
        let mut media = self
            .backend
            .media_for(&key, &self.media_filter(&ctx))
            .await?;

        if !self.multiple {
            media.truncate(1);
        }

        Ok(FieldState::from_uuids(
            media.into_iter().map(|item| item.uuid),
        ))
    }

    /// Rebuild incoming state, resetting anything malformed to empty.
    pub fn hydrate(&self, raw: &serde_json::Value) -> FieldState {
        FieldState::hydrate(raw)
    }

    /// Descriptor for one stored identifier.
    ///
    /// An absent record, a record without the media capability, or an
    /// identifier with no matching media all read as `None`; the host
    /// renders an empty slot.
    pub async fn uploaded_file(
        &self,
        record: Option<&dyn Record>,
        uuid: &str,
    ) -> MediaResult<Option<UploadedFile>> {
        let Some(attachable) = record.and_then(|record| record.media_capability()) else {
            return Ok(None);
        };

        let key = attachable.key();
        let Some(item) = self.backend.find_media(&key, uuid).await? else {
            return Ok(None);
        };

        let ctx = ResolveContext::for_record(&key);
        let conversion = self.conversion_for(&ctx);
        let url = resolve_display_url(
            self.backend.as_ref(),
            &item,
            self.visibility,
            conversion.as_deref(),
        )
        .await?;

        Ok(Some(UploadedFile {
            name: item.name_for(conversion.as_deref()).to_string(),
            size: item.size_for(conversion.as_deref()),
            mime_type: item.mime_type_for(conversion.as_deref()).to_string(),
            url,
        }))
    }

    /// Flush the field on form save.
    ///
    /// Two phases: first delete every attached item whose identifier is
    /// gone from the submitted state, then commit staged uploads in
    /// place. Saving a state equal to what is attached changes nothing.
    #[instrument(skip(self, record, state), fields(field = %self.name))]
    pub async fn save(
        &self,
        record: Option<&dyn Record>,
        state: FieldState,
    ) -> MediaResult<FieldState> {
        let attachable = record.and_then(|record| record.media_capability());

        if let Some(attachable) = attachable {
            self.delete_abandoned_files(attachable, &state).await?;
        }

        let mut saved = FieldState::new();
        for entry in state.into_entries() {
            match entry {
                FieldEntry::Stored(uuid) => saved.push_stored(uuid),
                FieldEntry::Pending(file) => {
                    match self.save_uploaded_file(attachable, &file).await? {
                        SaveOutcome::Stored(uuid) => saved.push_stored(uuid),
                        SaveOutcome::Untouched => saved.push_pending(file),
                        SaveOutcome::Skipped => {}
                    }
                }
            }
        }

        Ok(saved)
    }

    /// Commit one staged upload under the configured collection, group,
    /// disk, name, and metadata.
    pub async fn save_uploaded_file(
        &self,
        attachable: Option<&dyn MediaAttachable>,
        file: &TemporaryFile,
    ) -> MediaResult<SaveOutcome> {
        let Some(attachable) = attachable else {
            return Ok(SaveOutcome::Untouched);
        };

        if !file.exists().await {
            debug!(key = file.key(), "staged upload no longer on disk, dropping");
            return Ok(SaveOutcome::Skipped);
        }

        let key = attachable.key();
        let ctx = ResolveContext::for_record(&key).with_file(file);

        let mut params = AddMediaParams::new(file.path());
        params.collection = self.collection_for(&ctx);
        params.group = self.group_for(&ctx);
        params.name = self.media_name.as_ref().map(|knob| knob.get(&ctx));
        params.metadata = self
            .metadata
            .as_ref()
            .map(|knob| knob.get(&ctx))
            .unwrap_or_default();
        params.disk = self.disk_for(&ctx);

        let item = self.backend.add_media(&key, params).await?;
        info!(uuid = %item.uuid, record = %key, "Staged upload committed");

        Ok(SaveOutcome::Stored(item.uuid))
    }

    /// Delete attached media whose identifiers are absent from the
    /// submitted state.
    pub async fn delete_abandoned_files(
        &self,
        attachable: &dyn MediaAttachable,
        state: &FieldState,
    ) -> MediaResult<()> {
        let key = attachable.key();
        let ctx = ResolveContext::for_record(&key);
        let media = self
            .backend
            .media_for(&key, &self.media_filter(&ctx))
            .await?;

        for item in media {
            if !state.contains(&item.uuid) {
                info!(uuid = %item.uuid, record = %key, "Deleting abandoned media");
                self.backend.delete_media(&item.uuid).await?;
            }
        }

        Ok(())
    }

    /// Persist a drag-reorder, ignoring empty entries.
    #[instrument(skip(self, submitted), fields(field = %self.name))]
    pub async fn reorder(&self, submitted: &[String]) -> MediaResult<()> {
        let uuids: Vec<MediaUuid> = submitted
            .iter()
            .filter(|uuid| !uuid.is_empty())
            .cloned()
            .collect();

        self.backend.reorder(&uuids).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use mp_core::{Id, RecordKey};
    use mp_media::MemoryMediaBackend;
    use serde_json::json;

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

    fn staged_file(name: &str) -> (tempfile::TempDir, TemporaryFile) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"image bytes").unwrap();
        (dir, TemporaryFile::new(format!("tmp-{name}"), path, name))
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

    fn field(backend: &Arc<MemoryMediaBackend>) -> UploadField {
        UploadField::new("attachments", Arc::clone(backend) as Arc<dyn MediaBackend>)
            .multiple(true)
            .collection("gallery")
    }

    #[tokio::test]
    async fn test_load_state_orders_and_filters() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let a = attach(&backend, &article.key(), "a.jpg", "gallery").await;
        let b = attach(&backend, &article.key(), "b.jpg", "gallery").await;
        attach(&backend, &article.key(), "avatar.jpg", "avatar").await;

        let state = field(&backend).load_state(&article).await.unwrap();

        assert_eq!(state.stored_uuids(), vec![a.as_str(), b.as_str()]);
    }

    #[tokio::test]
    async fn test_load_state_single_value_keeps_first() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let a = attach(&backend, &article.key(), "a.jpg", "gallery").await;
        attach(&backend, &article.key(), "b.jpg", "gallery").await;

        let single = field(&backend).multiple(false);
        let state = single.load_state(&article).await.unwrap();

        assert_eq!(state.stored_uuids(), vec![a.as_str()]);
    }

    #[tokio::test]
    async fn test_load_state_without_capability_is_empty() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let tag = Tag { id: 1 };

        let state = field(&backend).load_state(&tag).await.unwrap();

        assert!(state.is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_resets_malformed_state() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let field = field(&backend);

        assert_eq!(
            field.hydrate(&json!(["uuid-a"])).stored_uuids(),
            vec!["uuid-a"]
        );
        assert!(field.hydrate(&json!("uuid-a")).is_empty());
    }

    #[tokio::test]
    async fn test_uploaded_file_descriptor() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let uuid = attach(&backend, &article.key(), "cover.jpg", "gallery").await;

        let descriptor = field(&backend)
            .uploaded_file(Some(&article), &uuid)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(descriptor.name, "cover.jpg");
        assert_eq!(descriptor.size, 11);
        assert_eq!(descriptor.mime_type, "image/jpeg");
        assert!(descriptor.url.contains(&uuid));
    }

    #[tokio::test]
    async fn test_uploaded_file_absent_cases() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let tag = Tag { id: 1 };
        let field = field(&backend);

        assert!(field.uploaded_file(None, "uuid-a").await.unwrap().is_none());
        assert!(field
            .uploaded_file(Some(&tag), "uuid-a")
            .await
            .unwrap()
            .is_none());
        assert!(field
            .uploaded_file(Some(&article), "uuid-a")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_private_preview_degrades_to_public_url() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let uuid = attach(&backend, &article.key(), "cover.jpg", "gallery").await;

        let descriptor = field(&backend)
            .private()
            .uploaded_file(Some(&article), &uuid)
            .await
            .unwrap()
            .unwrap();

        assert!(!descriptor.url.contains("?expires="));
    }

    #[tokio::test]
    async fn test_save_deletes_abandoned_and_keeps_submitted() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let a = attach(&backend, &article.key(), "a.jpg", "gallery").await;
        let b = attach(&backend, &article.key(), "b.jpg", "gallery").await;

        let submitted = FieldState::from_uuids([b.as_str()]);
        let saved = field(&backend)
            .save(Some(&article), submitted)
            .await
            .unwrap();

        assert_eq!(saved.stored_uuids(), vec![b.as_str()]);
        let remaining = backend
            .media_for(&article.key(), &MediaFilter::all())
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].uuid, b);
        assert!(backend
            .find_media(&article.key(), &a)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_save_is_idempotent_on_unchanged_state() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let a = attach(&backend, &article.key(), "a.jpg", "gallery").await;
        let b = attach(&backend, &article.key(), "b.jpg", "gallery").await;

        let field = field(&backend);
        let state = field.load_state(&article).await.unwrap();
        let saved = field.save(Some(&article), state).await.unwrap();

        assert_eq!(saved.stored_uuids(), vec![a.as_str(), b.as_str()]);
        assert_eq!(
            backend
                .media_for(&article.key(), &MediaFilter::all())
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_save_commits_staged_uploads_in_place() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let existing = attach(&backend, &article.key(), "a.jpg", "gallery").await;
        let (_dir, staged) = staged_file("new.png");

        let mut submitted = FieldState::from_uuids([existing.as_str()]);
        submitted.push_pending(staged);

        let saved = field(&backend)
            .group("press")
            .disk("s3")
            .save(Some(&article), submitted)
            .await
            .unwrap();

        let uuids = saved.stored_uuids();
        assert_eq!(uuids.len(), 2);
        assert_eq!(uuids[0], existing);

        let committed = backend
            .find_media(&article.key(), uuids[1])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(committed.file_name, "new.png");
        assert_eq!(committed.collection.as_deref(), Some("gallery"));
        assert_eq!(committed.group.as_deref(), Some("press"));
        assert_eq!(committed.disk, "s3");
    }

    #[tokio::test]
    async fn test_save_resolves_late_bound_name_and_metadata() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 7 };
        let (_dir, staged) = staged_file("shot.png");

        let mut submitted = FieldState::new();
        submitted.push_pending(staged);

        let named = field(&backend)
            .media_name(ConfigValue::resolver(|ctx: &ResolveContext<'_>| {
                ctx.file()
                    .map(|file| format!("upload {}", file.client_name()))
                    .unwrap_or_default()
            }))
            .metadata(ConfigValue::resolver(|ctx: &ResolveContext<'_>| {
                let mut metadata = Metadata::new();
                if let Some(record) = ctx.record() {
                    metadata.insert("record_id".to_string(), json!(record.id));
                }
                metadata
            }));

        let saved = named.save(Some(&article), submitted).await.unwrap();
        let uuid = saved.stored_uuids()[0].to_string();

        let committed = backend
            .find_media(&article.key(), &uuid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(committed.name.as_deref(), Some("upload shot.png"));
        assert_eq!(committed.metadata.get("record_id"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn test_save_without_capability_leaves_upload_untouched() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let tag = Tag { id: 1 };
        let (_dir, staged) = staged_file("plain.txt");

        let mut submitted = FieldState::new();
        submitted.push_pending(staged.clone());

        let saved = field(&backend).save(Some(&tag), submitted).await.unwrap();

        assert_eq!(saved.len(), 1);
        assert!(
            matches!(&saved.entries()[0], FieldEntry::Pending(file) if *file == staged)
        );
    }

    #[tokio::test]
    async fn test_save_drops_vanished_uploads() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let dir = tempfile::tempdir().unwrap();
        let gone = TemporaryFile::new("tmp-gone", dir.path().join("gone.png"), "gone.png");

        let mut submitted = FieldState::new();
        submitted.push_pending(gone);

        let saved = field(&backend).save(Some(&article), submitted).await.unwrap();

        assert!(saved.is_empty());
        assert!(backend
            .media_for(&article.key(), &MediaFilter::all())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_reorder_skips_empty_entries() {
        let backend = Arc::new(MemoryMediaBackend::new());
        let article = Article { id: 1 };
        let a = attach(&backend, &article.key(), "a.jpg", "gallery").await;
        let b = attach(&backend, &article.key(), "b.jpg", "gallery").await;

        field(&backend)
            .reorder(&[b.clone(), String::new(), a.clone()])
            .await
            .unwrap();

        let listed = backend
            .media_for(&article.key(), &MediaFilter::all())
            .await
            .unwrap();
        let uuids: Vec<&str> = listed.iter().map(|item| item.uuid.as_str()).collect();
        assert_eq!(uuids, vec![b.as_str(), a.as_str()]);
    }
}
