//! Panel-level configuration
//!
//! Settings the host admin panel exposes that media components read.

use serde::{Deserialize, Serialize};

/// Host panel settings consumed by the media components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Default filesystem disk for newly committed media, used when a
    /// field does not configure one. The media backend's own default
    /// applies when this is unset too.
    pub default_disk: Option<String>,
}

impl PanelConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(disk) = std::env::var("MEDIAPANEL_DEFAULT_DISK") {
            config.default_disk = Some(disk);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PanelConfig::default();
        assert!(config.default_disk.is_none());
    }
}
