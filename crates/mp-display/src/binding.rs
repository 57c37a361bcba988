//! Shared media resolution for read-only image components
//!
//! The entry and column variants differ only in their host surface; both
//! resolve URLs and state through this binding.

use std::sync::Arc;

use mp_core::{ConfigValue, Record, ResolveContext, Visibility};
use mp_media::{
    resolve_display_url, MediaBackend, MediaFilter, MediaResult, MediaUuid,
};

pub(crate) struct MediaBinding {
    pub visibility: Visibility,
    pub relationship: Option<String>,
    pub collection: Option<ConfigValue<String>>,
    pub group: Option<ConfigValue<String>>,
    pub conversion: Option<ConfigValue<String>>,
    pub backend: Arc<dyn MediaBackend>,
}

impl MediaBinding {
    pub fn new(backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            visibility: Visibility::default(),
            relationship: None,
            collection: None,
            group: None,
            conversion: None,
            backend,
        }
    }

    /// The record whose media this component displays: the row's own, or
    /// the related record's when a relationship is configured.
    fn target<'a>(&self, record: &'a dyn Record) -> Option<&'a dyn Record> {
        match self.relationship.as_deref() {
            Some(name) => record.related(name),
            None => Some(record),
        }
    }

    /// Resolve the display URL for one stored identifier.
    ///
    /// Absent record, missing capability, or unknown identifier all read
    /// as `None`; the host renders an empty cell.
    pub async fn image_url(
        &self,
        record: Option<&dyn Record>,
        uuid: &str,
    ) -> MediaResult<Option<String>> {
        let Some(target) = record.and_then(|record| self.target(record)) else {
            return Ok(None);
        };
        let Some(attachable) = target.media_capability() else {
            return Ok(None);
        };

        let key = attachable.key();
        let Some(item) = self.backend.find_media(&key, uuid).await? else {
            return Ok(None);
        };

        let ctx = ResolveContext::for_record(&key);
        let conversion = self.conversion.as_ref().map(|knob| knob.get(&ctx));
        let url = resolve_display_url(
            self.backend.as_ref(),
            &item,
            self.visibility,
            conversion.as_deref(),
        )
        .await?;

        Ok(Some(url))
    }

    /// Ordered identifiers of the record's media matching the configured
    /// collection and group.
    pub async fn state(&self, record: &dyn Record) -> MediaResult<Vec<MediaUuid>> {
        let Some(attachable) = record.media_capability() else {
            return Ok(Vec::new());
        };

        let key = attachable.key();
        let ctx = ResolveContext::for_record(&key);
        let filter = MediaFilter::scoped(
            self.collection.as_ref().map(|knob| knob.get(&ctx)),
            self.group.as_ref().map(|knob| knob.get(&ctx)),
        );

        let media = self.backend.media_for(&key, &filter).await?;
        Ok(media.into_iter().map(|item| item.uuid).collect())
    }
}
