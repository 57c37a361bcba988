//! Late-bound configuration values
//!
//! Component knobs (collection, disk, conversion, ...) are either fixed
//! at build time or computed per operation from the current record and
//! upload. [`ConfigValue`] makes the two cases explicit; components
//! resolve each knob once per operation with [`ConfigValue::get`].

use std::fmt;
use std::sync::Arc;

use crate::record::RecordKey;
use crate::upload::TemporaryFile;

/// Context handed to late-bound configuration resolvers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveContext<'a> {
    record: Option<&'a RecordKey>,
    file: Option<&'a TemporaryFile>,
}

impl<'a> ResolveContext<'a> {
    /// Context with no record or upload in scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for an operation on one record.
    pub fn for_record(record: &'a RecordKey) -> Self {
        Self {
            record: Some(record),
            file: None,
        }
    }

    /// Attach the upload currently being processed.
    pub fn with_file(mut self, file: &'a TemporaryFile) -> Self {
        self.file = Some(file);
        self
    }

    pub fn record(&self) -> Option<&'a RecordKey> {
        self.record
    }

    pub fn file(&self) -> Option<&'a TemporaryFile> {
        self.file
    }
}

/// A configuration knob: a fixed value, or a function of the operation
/// context evaluated at resolution time.
pub enum ConfigValue<T> {
    Literal(T),
    Resolver(Arc<dyn Fn(&ResolveContext<'_>) -> T + Send + Sync>),
}

impl<T> ConfigValue<T> {
    pub fn literal(value: T) -> Self {
        Self::Literal(value)
    }

    pub fn resolver<F>(resolve: F) -> Self
    where
        F: Fn(&ResolveContext<'_>) -> T + Send + Sync + 'static,
    {
        Self::Resolver(Arc::new(resolve))
    }
}

impl<T: Clone> ConfigValue<T> {
    /// Resolve the knob for one operation.
    pub fn get(&self, ctx: &ResolveContext<'_>) -> T {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Resolver(resolve) => resolve(ctx),
        }
    }
}

impl<T: Clone> Clone for ConfigValue<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(value.clone()),
            Self::Resolver(resolve) => Self::Resolver(Arc::clone(resolve)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ConfigValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl From<String> for ConfigValue<String> {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for ConfigValue<String> {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}
