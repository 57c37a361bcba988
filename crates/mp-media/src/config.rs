//! Media backend configuration

use serde::{Deserialize, Serialize};

/// Backend-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Disk used when neither the field nor the panel names one.
    pub disk: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            disk: "public".to_string(),
        }
    }
}

impl MediaConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(disk) = std::env::var("MEDIAPANEL_MEDIA_DISK") {
            config.disk = disk;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(MediaConfig::default().disk, "public");
    }
}
