//! Image Column Component
//!
//! Tabular image display: one cell per row resolving a stored identifier
//! to a URL, plus the eager-loading directive that keeps a visible column
//! from issuing one media query per row.

use std::fmt;
use std::sync::Arc;

use mp_core::{ConfigValue, Record, ResolveContext, Visibility};
use mp_media::{MediaBackend, MediaResult, MediaUuid};
use tracing::debug;

use crate::binding::MediaBinding;
use crate::eager::{EagerLoad, RecordQuery};

/// Image column bound to a record's media collection.
pub struct ImageColumn {
    name: String,
    hidden: bool,
    binding: MediaBinding,
}

impl fmt::Debug for ImageColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageColumn")
            .field("name", &self.name)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl ImageColumn {
    pub fn new(name: impl Into<String>, backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            name: name.into(),
            hidden: false,
            binding: MediaBinding::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn collection(mut self, collection: impl Into<ConfigValue<String>>) -> Self {
        self.binding.collection = Some(collection.into());
        self
    }

    pub fn group(mut self, group: impl Into<ConfigValue<String>>) -> Self {
        self.binding.group = Some(group.into());
        self
    }

    /// Conversion used for cell URLs.
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

    /// Resolve the display URL for one cell; `None` renders empty.
    pub async fn image_url(
        &self,
        record: Option<&dyn Record>,
        uuid: &str,
    ) -> MediaResult<Option<String>> {
        self.binding.image_url(record, uuid).await
    }

    /// Ordered identifiers of the row's media for this column.
    pub async fn state(&self, record: &dyn Record) -> MediaResult<Vec<MediaUuid>> {
        self.binding.state(record).await
    }

    /// Eager-load directive for the current render.
    ///
    /// A hidden column produces none: its cells never resolve, so
    /// preloading would be pure overhead.
    pub fn eager_load(&self) -> Option<EagerLoad> {
        if self.hidden {
            return None;
        }

        let ctx = ResolveContext::new();
        Some(EagerLoad {
            relationship: self.binding.relationship.clone(),
            collection: self.binding.collection.as_ref().map(|knob| knob.get(&ctx)),
        })
    }

    /// Annotate the host row query when the column is visible.
    pub fn apply_eager_loading(&self, query: &mut dyn RecordQuery) {
        if let Some(load) = self.eager_load() {
            debug!(column = %self.name, ?load, "Preloading media relation");
            query.preload_media(load);
        }
    }
}
