//! # mp-media
//!
//! Media backend contract for MediaPanel RS.
//!
//! ## Features
//!
//! - Record-centric media model (collections, groups, conversions)
//! - [`MediaBackend`] trait implemented once per installed media library
//! - Shared display URL policy with signed-URL fallback
//! - In-memory backend for tests and small deployments
//!
//! ## Example
//!
//! ```rust,ignore
//! use mp_media::{AddMediaParams, MediaBackend, MediaFilter, MemoryMediaBackend};
//! use mp_core::RecordKey;
//!
//! let backend = MemoryMediaBackend::new();
//! let record = RecordKey::new("Article", 1);
//!
//! let item = backend
//!     .add_media(&record, AddMediaParams::new("/tmp/staged/cover.jpg").collection("gallery"))
//!     .await?;
//!
//! let gallery = backend
//!     .media_for(&record, &MediaFilter::in_collection("gallery"))
//!     .await?;
//! ```

pub mod backend;
pub mod config;
pub mod memory;
pub mod model;
pub mod url;

pub use backend::{MediaBackend, MediaError, MediaResult, SigningUnsupported};
pub use config::MediaConfig;
pub use memory::MemoryMediaBackend;
pub use model::{
    AddMediaParams, MediaConversion, MediaFilter, MediaItem, MediaUuid, Metadata,
};
pub use url::{resolve_display_url, SIGNED_URL_TTL};
