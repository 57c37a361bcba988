//! Temporary upload handles
//!
//! The host framework stages uploads on local disk while a form is being
//! edited. Adapter components see each staged upload as a
//! [`TemporaryFile`] until save commits it into the media library.

use std::path::{Path, PathBuf};

use tracing::debug;

/// An uploaded file that has not yet been committed to the media library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryFile {
    /// State key the host framework assigned to this upload.
    key: String,
    /// Location of the staged file on disk.
    path: PathBuf,
    /// File name as supplied by the client.
    client_name: String,
}

impl TemporaryFile {
    pub fn new(
        key: impl Into<String>,
        path: impl Into<PathBuf>,
        client_name: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            client_name: client_name.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Whether the staged file is still present on disk.
    ///
    /// An IO failure during the check reads as absent; staging areas are
    /// routinely swept out from under long-lived form sessions.
    pub async fn exists(&self) -> bool {
        match tokio::fs::try_exists(&self.path).await {
            Ok(present) => present,
            Err(error) => {
                debug!(path = ?self.path, %error, "existence check failed, treating upload as gone");
                false
            }
        }
    }
}
