//! `threepen compose` - one-shot composition of a sketch.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::versions::block_on;
use crate::compose::{Chrome, ComposedDocument, compose};
use crate::config::PlaygroundConfig;
use crate::deps::{DependencyResolver, Revision, VersionCatalog, VersionSelector, catalog};
use crate::log;

/// Compose the configured sketch and print it, or write it to `output`.
pub fn compose_sketch(config: &PlaygroundConfig, output: Option<&Path>) -> Result<()> {
    let entry = config.entry_path();
    let source = fs::read_to_string(&entry)
        .with_context(|| format!("Failed to read sketch {}", entry.display()))?;

    let catalog = match config.pinned_revision {
        // Nothing to pick from: skip the network
        Some(n) => VersionCatalog::fallback(Revision(n)),
        None => block_on(catalog::load_or_fallback(&config.revision))?,
    };
    let (revision, doc) = compose_with(config, &source, catalog);

    match output {
        Some(path) => {
            fs::write(path, doc.as_str())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log!("compose"; "{} ({}) -> {}", config.entry_name(), revision, path.display());
        }
        None => print!("{}", doc.as_str()),
    }
    Ok(())
}

fn compose_with(
    config: &PlaygroundConfig,
    source: &str,
    catalog: VersionCatalog,
) -> (Revision, ComposedDocument) {
    let resolver = DependencyResolver::new(&config.revision.cdn, catalog);
    let revision = resolver.revision(VersionSelector::Latest);
    let deps = resolver.resolve(VersionSelector::Exact(revision));
    let doc = compose(source, &deps, &Chrome::from_config(&config.preview));
    (revision, doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compose_pinned_writes_document() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.js"), "console.log('cube');").unwrap();
        let out = dir.path().join("out.html");

        let config = PlaygroundConfig {
            root: dir.path().to_path_buf(),
            pinned_revision: Some(148),
            ..PlaygroundConfig::default()
        };
        compose_sketch(&config, Some(&out)).unwrap();

        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("console.log('cube');"));
        assert!(html.contains("https://unpkg.com/three@0.148.0/build/three.module.js"));
    }

    #[test]
    fn test_compose_uses_configured_cdn() {
        let mut config = PlaygroundConfig::default();
        config.revision.cdn = "https://cdn.jsdelivr.net/npm/".into();

        let (revision, doc) = compose_with(&config, "", VersionCatalog::fallback(Revision(150)));
        assert_eq!(revision, Revision(150));
        assert!(
            doc.as_str()
                .contains("https://cdn.jsdelivr.net/npm/three@0.150.0/examples/jsm/")
        );
    }

    #[test]
    fn test_compose_missing_sketch_is_error() {
        let dir = TempDir::new().unwrap();
        let config = PlaygroundConfig {
            root: dir.path().to_path_buf(),
            pinned_revision: Some(150),
            ..PlaygroundConfig::default()
        };
        let err = compose_sketch(&config, None).unwrap_err();
        assert!(err.to_string().contains("main.js"));
    }
}
