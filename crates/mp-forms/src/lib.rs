//! # mp-forms
//!
//! Upload field component for MediaPanel RS.
//!
//! Binds the host panel's file-picker field to a record's media
//! collection through any [`mp_media::MediaBackend`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mp_forms::UploadField;
//! use mp_media::MemoryMediaBackend;
//!
//! let backend = Arc::new(MemoryMediaBackend::new());
//! let field = UploadField::new("attachments", backend)
//!     .multiple(true)
//!     .collection("gallery")
//!     .conversion("thumb");
//!
//! let state = field.load_state(&article).await?;
//! let state = field.save(Some(&article), state).await?;
//! ```

pub mod state;
pub mod upload_field;

pub use state::{FieldEntry, FieldState};
pub use upload_field::{SaveOutcome, UploadField, UploadedFile};
