//! # mp-display
//!
//! Read-only image components for MediaPanel RS.
//!
//! - [`ImageEntry`] for detail views
//! - [`ImageColumn`] for tables, with per-page eager loading of the
//!   media relation

mod binding;

pub mod column;
pub mod eager;
pub mod entry;

pub use column::ImageColumn;
pub use eager::{EagerLoad, RecordQuery};
pub use entry::ImageEntry;
