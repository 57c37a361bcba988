//! Media Backend Contract
//!
//! The seam between the panel components and the installed media
//! library. Each library version implements [`MediaBackend`] once; the
//! components never fork on the version.

use std::time::Duration;

use async_trait::async_trait;
use mp_core::RecordKey;
use thiserror::Error;

use crate::model::{AddMediaParams, MediaFilter, MediaItem, MediaUuid};

/// Backend errors
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media not found: {0}")]
    NotFound(MediaUuid),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Media backend error: {0}")]
    Backend(String),
}

pub type MediaResult<T> = Result<T, MediaError>;

/// The storage disk cannot mint time-limited URLs.
///
/// Advisory by design: callers fall back to the public URL and the
/// condition never surfaces past the resolution site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("storage disk does not support signed URLs")]
pub struct SigningUnsupported;

/// Record-centric media library operations.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// List a record's media matching the filter, in persisted order.
    async fn media_for(
        &self,
        record: &RecordKey,
        filter: &MediaFilter,
    ) -> MediaResult<Vec<MediaItem>>;

    /// Find one media item on a record by identifier.
    async fn find_media(&self, record: &RecordKey, uuid: &str) -> MediaResult<Option<MediaItem>> {
        let media = self.media_for(record, &MediaFilter::all()).await?;
        Ok(media.into_iter().find(|item| item.uuid == uuid))
    }

    /// Commit a staged file into a record's media collection.
    ///
    /// The backend issues the identifier and appends the item at the end
    /// of the record's display order.
    async fn add_media(
        &self,
        record: &RecordKey,
        params: AddMediaParams,
    ) -> MediaResult<MediaItem>;

    /// Delete one media item. Deleting an unknown identifier is a no-op.
    async fn delete_media(&self, uuid: &str) -> MediaResult<()>;

    /// Persist a new total order, keyed by identifier. Items not listed
    /// keep their current position relative to each other.
    async fn reorder(&self, uuids: &[MediaUuid]) -> MediaResult<()>;

    /// Public URL for the original file or a named conversion.
    async fn public_url(&self, item: &MediaItem, conversion: Option<&str>) -> MediaResult<String>;

    /// Time-limited URL for private disks.
    ///
    /// Backends whose disk driver cannot sign return
    /// [`SigningUnsupported`]; any internal signing failure is reported
    /// the same way, since the caller's only recourse is the public
    /// fallback either way.
    async fn signed_url(
        &self,
        item: &MediaItem,
        conversion: Option<&str>,
        expires_in: Duration,
    ) -> Result<String, SigningUnsupported>;
}
