//! Upload Field State
//!
//! The host framework keeps a file field's state as an ordered mapping
//! whose keys and values are both the media identifier (an ordered set in
//! map clothing). While a form is being edited the same sequence also
//! carries staged uploads, which save later replaces with issued
//! identifiers.

use mp_core::TemporaryFile;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One entry in a field's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEntry {
    /// Committed media, keyed by its identifier.
    Stored(String),
    /// Staged upload awaiting commit.
    Pending(TemporaryFile),
}

impl FieldEntry {
    /// The host-side state key of this entry.
    pub fn key(&self) -> &str {
        match self {
            Self::Stored(uuid) => uuid,
            Self::Pending(file) => file.key(),
        }
    }
}

/// Ordered state of one upload field on one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    entries: Vec<FieldEntry>,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding the given identifiers, in order.
    pub fn from_uuids<I, S>(uuids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: uuids
                .into_iter()
                .map(|uuid| FieldEntry::Stored(uuid.into()))
                .collect(),
        }
    }

    /// Rebuild state from the raw value the host hydrates the field with.
    ///
    /// Arrays of identifier strings and identifier-keyed objects load in
    /// order (hosts submit arrays; object keys read in map iteration
    /// order). Anything else is malformed persisted state and resets to
    /// empty.
    pub fn hydrate(raw: &serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Array(values) => Self::from_uuids(
                values
                    .iter()
                    .filter_map(|value| value.as_str())
                    .map(String::from),
            ),
            serde_json::Value::Object(map) => Self::from_uuids(map.keys().cloned()),
            _ => Self::new(),
        }
    }

    pub fn push_stored(&mut self, uuid: impl Into<String>) {
        self.entries.push(FieldEntry::Stored(uuid.into()));
    }

    pub fn push_pending(&mut self, file: TemporaryFile) {
        self.entries.push(FieldEntry::Pending(file));
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FieldEntry> {
        self.entries
    }

    /// Identifiers of committed media, in order.
    pub fn stored_uuids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                FieldEntry::Stored(uuid) => Some(uuid.as_str()),
                FieldEntry::Pending(_) => None,
            })
            .collect()
    }

    /// Whether any entry carries this state key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key() == key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for FieldState {
    /// The host's redundant ordered-set encoding: each entry's state key
    /// appears as both key and value, in entry order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.key(), entry.key())?;
        }
        map.end()
    }
}
