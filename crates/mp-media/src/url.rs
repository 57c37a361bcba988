//! Display URL Resolution
//!
//! The one URL policy every component shares.

use std::time::Duration;

use mp_core::Visibility;
use tracing::debug;

use crate::backend::{MediaBackend, MediaResult, SigningUnsupported};
use crate::model::MediaItem;

/// Validity window for signed URLs handed to the browser.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(5 * 60);

/// Resolve the URL a component displays for a media item.
///
/// Private media first attempts a signed URL with [`SIGNED_URL_TTL`]; a
/// disk that cannot sign degrades to the public resolver for the same
/// conversion. Public media always resolves the public URL.
pub async fn resolve_display_url(
    backend: &dyn MediaBackend,
    item: &MediaItem,
    visibility: Visibility,
    conversion: Option<&str>,
) -> MediaResult<String> {
    if visibility.is_private() {
        match backend.signed_url(item, conversion, SIGNED_URL_TTL).await {
            Ok(url) => return Ok(url),
            Err(SigningUnsupported) => {
                debug!(uuid = %item.uuid, "disk cannot sign URLs, serving public URL");
            }
        }
    }

    backend.public_url(item, conversion).await
}
