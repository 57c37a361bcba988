//! In-memory media backend
//!
//! Backs component tests and small deployments. Files are read once at
//! commit time for their attributes; no blob storage is kept.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use mp_core::RecordKey;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::{MediaBackend, MediaResult, SigningUnsupported};
use crate::config::MediaConfig;
use crate::model::{AddMediaParams, MediaFilter, MediaItem, MediaUuid};

/// In-memory [`MediaBackend`] implementation.
pub struct MemoryMediaBackend {
    media: RwLock<Vec<MediaItem>>,
    config: MediaConfig,
    /// Whether the simulated disk driver can mint signed URLs.
    signing: bool,
}

impl Default for MemoryMediaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMediaBackend {
    /// Backend on a disk that cannot sign URLs.
    pub fn new() -> Self {
        Self::with_config(MediaConfig::default())
    }

    pub fn with_config(config: MediaConfig) -> Self {
        Self {
            media: RwLock::new(Vec::new()),
            config,
            signing: false,
        }
    }

    /// Enable signed URL support on the simulated disk.
    pub fn with_signing(mut self) -> Self {
        self.signing = true;
        self
    }

    fn url_path(item: &MediaItem, conversion: Option<&str>) -> String {
        // A requested but ungenerated conversion resolves to the original.
        match conversion.and_then(|name| item.conversion(name)) {
            Some(conv) => {
                let file = conv
                    .file_name
                    .clone()
                    .unwrap_or_else(|| format!("{}-{}", conv.name, item.file_name));
                format!("/storage/{}/{}/conversions/{}", item.disk, item.uuid, file)
            }
            None => format!("/storage/{}/{}/{}", item.disk, item.uuid, item.file_name),
        }
    }
}

#[async_trait]
impl MediaBackend for MemoryMediaBackend {
    async fn media_for(
        &self,
        record: &RecordKey,
        filter: &MediaFilter,
    ) -> MediaResult<Vec<MediaItem>> {
        let media = self.media.read().await;
        let mut matching: Vec<MediaItem> = media
            .iter()
            .filter(|item| &item.record == record && filter.matches(item))
            .cloned()
            .collect();
        matching.sort_by_key(|item| item.order);
        Ok(matching)
    }

    async fn add_media(
        &self,
        record: &RecordKey,
        params: AddMediaParams,
    ) -> MediaResult<MediaItem> {
        let file_meta = tokio::fs::metadata(&params.path).await?;
        let file_name = params
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();

        let mut media = self.media.write().await;
        let order = media
            .iter()
            .filter(|item| &item.record == record)
            .map(|item| item.order)
            .max()
            .map_or(0, |max| max + 1);

        let now = Utc::now();
        let item = MediaItem {
            uuid: Uuid::new_v4().to_string(),
            record: record.clone(),
            name: params.name,
            file_name,
            size: file_meta.len(),
            mime_type,
            disk: params.disk.unwrap_or_else(|| self.config.disk.clone()),
            collection: params.collection,
            group: params.group,
            order,
            metadata: params.metadata,
            conversions: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        media.push(item.clone());

        info!(uuid = %item.uuid, record = %record, "Media committed");

        Ok(item)
    }

    async fn delete_media(&self, uuid: &str) -> MediaResult<()> {
        let mut media = self.media.write().await;
        media.retain(|item| item.uuid != uuid);
        debug!(uuid = uuid, "Media deleted");
        Ok(())
    }

    async fn reorder(&self, uuids: &[MediaUuid]) -> MediaResult<()> {
        let mut media = self.media.write().await;
        for (position, uuid) in uuids.iter().enumerate() {
            if let Some(item) = media.iter_mut().find(|item| &item.uuid == uuid) {
                item.order = position as u32;
                item.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn public_url(&self, item: &MediaItem, conversion: Option<&str>) -> MediaResult<String> {
        Ok(Self::url_path(item, conversion))
    }

    async fn signed_url(
        &self,
        item: &MediaItem,
        conversion: Option<&str>,
        expires_in: Duration,
    ) -> Result<String, SigningUnsupported> {
        if !self.signing {
            return Err(SigningUnsupported);
        }

        Ok(format!(
            "{}?expires={}",
            Self::url_path(item, conversion),
            expires_in.as_secs()
        ))
    }
}
