//! Shared component types

use serde::{Deserialize, Serialize};

/// Storage visibility of a field or column's media.
///
/// Private media is served through time-limited signed URLs when the disk
/// supports them; public media always resolves to the plain URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_public() {
        assert_eq!(Visibility::default(), Visibility::Public);
        assert!(!Visibility::default().is_private());
        assert!(Visibility::Private.is_private());
    }
}
