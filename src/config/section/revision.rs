//! `[revision]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [revision]
//! endpoint = "https://api.github.com/repos/mrdoob/three.js/releases"
//! cdn = "https://unpkg.com"   # Serves three@0.<n>.0
//! fallback = 160              # Used when the release list can't be fetched
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};

use crate::deps::DEFAULT_CDN;

/// Release list endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/repos/mrdoob/three.js/releases";

/// Revision catalog and CDN settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionConfig {
    /// Release list URL (GitHub releases JSON).
    pub endpoint: String,

    /// Package CDN base URL.
    pub cdn: String,

    /// Revision used when the catalog fetch fails.
    pub fallback: u32,

    /// Catalog request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            cdn: DEFAULT_CDN.into(),
            fallback: 160,
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_revision_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.revision.cdn, "https://unpkg.com");
        assert_eq!(config.revision.fallback, 160);
        assert_eq!(config.revision.timeout_secs, 10);
        assert!(config.revision.endpoint.ends_with("/releases"));
    }

    #[test]
    fn test_revision_config_override() {
        let config = test_parse_config("[revision]\ncdn = \"https://cdn.jsdelivr.net/npm\"\nfallback = 150");

        assert_eq!(config.revision.cdn, "https://cdn.jsdelivr.net/npm");
        assert_eq!(config.revision.fallback, 150);
    }
}
