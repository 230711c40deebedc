//! Release catalog, fetched once at startup.
//!
//! The endpoint returns GitHub release objects, newest first:
//!
//! ```json
//! [{ "tag_name": "r160", ... }, { "tag_name": "r159", ... }]
//! ```
//!
//! Input order is kept as-is. A failed fetch never leaves the playground
//! without a revision: [`load_or_fallback`] reports the failure and falls back
//! to the configured revision.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::Revision;
use crate::config::section::RevisionConfig;
use crate::{debug, log};

/// Why the release catalog could not be built.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("endpoint answered {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed release list: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("release list contains no `r<number>` tags")]
    Empty,
}

/// Ordered revisions, most recent first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCatalog {
    revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

impl VersionCatalog {
    pub fn new(revisions: Vec<Revision>) -> Result<Self, CatalogError> {
        if revisions.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { revisions })
    }

    /// Single-entry catalog used when the release list is unavailable.
    pub fn fallback(revision: Revision) -> Self {
        Self {
            revisions: vec![revision],
        }
    }

    /// Parse the release list body.
    pub fn from_releases_json(body: &str) -> Result<Self, CatalogError> {
        let releases: Vec<Release> = serde_json::from_str(body)?;
        let revisions = releases
            .iter()
            .filter_map(|release| {
                let revision = Revision::from_tag(&release.tag_name);
                if revision.is_none() {
                    debug!("catalog"; "skipping tag {}", release.tag_name);
                }
                revision
            })
            .collect();
        Self::new(revisions)
    }

    pub fn latest(&self) -> Revision {
        self.revisions[0]
    }

    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    pub fn contains(&self, revision: Revision) -> bool {
        self.revisions.contains(&revision)
    }
}

/// Fetch the release list from `endpoint`.
pub async fn fetch(endpoint: &str, timeout: Duration) -> Result<VersionCatalog, CatalogError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("threepen/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?;

    let response = client
        .get(endpoint)
        .header("Accept", "application/vnd.github+json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status(status));
    }

    let body = response.text().await?;
    VersionCatalog::from_releases_json(&body)
}

/// Fetch the catalog, or report the failure and fall back to one revision.
pub async fn load_or_fallback(config: &RevisionConfig) -> VersionCatalog {
    let timeout = Duration::from_secs(config.timeout_secs);
    match fetch(&config.endpoint, timeout).await {
        Ok(catalog) => {
            debug!("catalog"; "{} revisions, latest {}", catalog.revisions().len(), catalog.latest());
            catalog
        }
        Err(e) => {
            let fallback = Revision(config.fallback);
            log!("error"; "release catalog unavailable ({}), using {}", e, fallback);
            VersionCatalog::fallback(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_input_order() {
        let body = r#"[{"tag_name":"r150"},{"tag_name":"r149"},{"tag_name":"r148"}]"#;
        let catalog = VersionCatalog::from_releases_json(body).unwrap();

        assert_eq!(
            catalog.revisions(),
            &[Revision(150), Revision(149), Revision(148)]
        );
        assert_eq!(catalog.latest(), Revision(150));
    }

    #[test]
    fn test_parse_skips_foreign_tags() {
        let body = r#"[
            {"tag_name":"r160","name":"r160","draft":false},
            {"tag_name":"v1.0.0"},
            {"tag_name":"r159"}
        ]"#;
        let catalog = VersionCatalog::from_releases_json(body).unwrap();
        assert_eq!(catalog.revisions(), &[Revision(160), Revision(159)]);
    }

    #[test]
    fn test_parse_does_not_sort() {
        let body = r#"[{"tag_name":"r148"},{"tag_name":"r150"}]"#;
        let catalog = VersionCatalog::from_releases_json(body).unwrap();
        assert_eq!(catalog.latest(), Revision(148));
    }

    #[test]
    fn test_parse_rejects_malformed_body() {
        assert!(matches!(
            VersionCatalog::from_releases_json(r#"{"message":"API rate limit exceeded"}"#),
            Err(CatalogError::Decode(_))
        ));
        assert!(matches!(
            VersionCatalog::from_releases_json("not json"),
            Err(CatalogError::Decode(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_list() {
        assert!(matches!(
            VersionCatalog::from_releases_json("[]"),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            VersionCatalog::from_releases_json(r#"[{"tag_name":"nightly"}]"#),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn test_fallback_is_single_entry() {
        let catalog = VersionCatalog::fallback(Revision(160));
        assert_eq!(catalog.revisions(), &[Revision(160)]);
        assert!(catalog.contains(Revision(160)));
        assert!(!catalog.contains(Revision(159)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let config = RevisionConfig {
            endpoint: "http://127.0.0.1:9/releases".into(),
            timeout_secs: 1,
            fallback: 155,
            ..RevisionConfig::default()
        };
        let catalog = load_or_fallback(&config).await;
        assert_eq!(catalog.latest(), Revision(155));
    }
}
