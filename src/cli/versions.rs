//! `threepen versions` - list published revisions.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::{PlaygroundConfig, RevisionConfig};
use crate::deps::{VersionCatalog, catalog};

/// Run a catalog future on a throwaway runtime.
pub(crate) fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    Ok(rt.block_on(future))
}

/// Fetch the catalog, failing loudly instead of falling back.
fn fetch_strict(config: &RevisionConfig) -> Result<VersionCatalog> {
    let timeout = Duration::from_secs(config.timeout_secs);
    block_on(catalog::fetch(&config.endpoint, timeout))?
        .with_context(|| format!("Failed to fetch release catalog from {}", config.endpoint))
}

/// Print the catalog as `r<n>` lines, most recent first.
pub fn list_versions(config: &PlaygroundConfig, limit: Option<usize>) -> Result<()> {
    let catalog = fetch_strict(&config.revision)?;
    for line in format_versions(&catalog, limit) {
        println!("{line}");
    }
    Ok(())
}

fn format_versions(catalog: &VersionCatalog, limit: Option<usize>) -> Vec<String> {
    catalog
        .revisions()
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::Revision;

    fn catalog() -> VersionCatalog {
        VersionCatalog::new(vec![Revision(150), Revision(149), Revision(148)]).unwrap()
    }

    #[test]
    fn test_format_versions() {
        assert_eq!(format_versions(&catalog(), None), ["r150", "r149", "r148"]);
        assert_eq!(format_versions(&catalog(), Some(2)), ["r150", "r149"]);
        assert!(format_versions(&catalog(), Some(0)).is_empty());
    }

    #[test]
    fn test_fetch_strict_reports_failure() {
        let config = RevisionConfig {
            endpoint: "http://127.0.0.1:9/releases".into(),
            timeout_secs: 1,
            ..RevisionConfig::default()
        };
        let err = fetch_strict(&config).unwrap_err();
        assert!(format!("{err:#}").contains("127.0.0.1:9"));
    }
}
