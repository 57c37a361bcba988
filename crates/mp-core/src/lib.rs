//! # mp-core
//!
//! Core types and traits for MediaPanel RS.
//!
//! This crate provides the building blocks shared by every component
//! crate:
//! - Record identity and the media-attachment capability seam
//! - Late-bound configuration values
//! - Temporary upload handles
//! - Panel configuration

pub mod config;
pub mod record;
pub mod types;
pub mod upload;
pub mod value;

pub use config::PanelConfig;
pub use record::{Id, MediaAttachable, Record, RecordKey};
pub use types::Visibility;
pub use upload::TemporaryFile;
pub use value::{ConfigValue, ResolveContext};
