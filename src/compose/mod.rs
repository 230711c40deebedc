//! Document compositor.
//!
//! Wraps sketch source and a dependency map into a standalone HTML document:
//!
//! ```text
//! <head>  fault shim  → posts {type:"error", data:[...]} to parent
//! <body>  import-map polyfill
//!         <script type="importmap">  {"imports": {...}}
//!         <script type="module">     source, verbatim
//! ```
//!
//! The source is not validated. Syntax or runtime faults surface through the
//! shim and the error relay, never as a compose error.

use std::fmt;
use std::sync::Arc;

use crate::deps::DependencyMap;
use crate::embed::{PREVIEW_HTML, PreviewVars};
use crate::utils::hash::ContentHash;

/// Document chrome that does not depend on the sketch.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub title: String,
    pub polyfill: String,
}

impl Default for Chrome {
    fn default() -> Self {
        let defaults = crate::config::PreviewConfig::default();
        Self {
            title: defaults.title,
            polyfill: defaults.polyfill,
        }
    }
}

impl Chrome {
    pub fn from_config(config: &crate::config::PreviewConfig) -> Self {
        Self {
            title: config.title.clone(),
            polyfill: config.polyfill.clone(),
        }
    }
}

/// A complete preview document. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ComposedDocument {
    html: Arc<str>,
}

impl ComposedDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Shared handle to the bytes, for serving without copying.
    pub fn shared(&self) -> Arc<str> {
        Arc::clone(&self.html)
    }

    pub fn hash(&self) -> ContentHash {
        ContentHash::of(self.html.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

impl fmt::Debug for ComposedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedDocument")
            .field("len", &self.html.len())
            .finish()
    }
}

/// Build the preview document for `source` against `deps`.
pub fn compose(source: &str, deps: &DependencyMap, chrome: &Chrome) -> ComposedDocument {
    let import_map = deps.to_import_map();
    let html = PREVIEW_HTML.render(&PreviewVars {
        title: &chrome.title,
        polyfill: &chrome.polyfill,
        import_map: &import_map,
        source,
    });

    ComposedDocument { html: html.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::{DEFAULT_CDN, DependencyResolver, Revision, VersionCatalog, VersionSelector};

    fn deps(n: u32) -> DependencyMap {
        let catalog = VersionCatalog::new(vec![Revision(n)]).unwrap();
        DependencyResolver::new(DEFAULT_CDN, catalog).resolve(VersionSelector::Latest)
    }

    #[test]
    fn test_compose_is_deterministic() {
        let chrome = Chrome::default();
        let source = "import * as THREE from \"three\";\nnew THREE.Scene();";

        let a = compose(source, &deps(150), &chrome);
        let b = compose(source, &deps(150), &chrome);

        assert_eq!(a.as_str(), b.as_str());
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_compose_differs_by_revision() {
        let chrome = Chrome::default();
        let a = compose("", &deps(150), &chrome);
        let b = compose("", &deps(149), &chrome);
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_section_order() {
        let doc = compose("console.log(1)", &deps(150), &Chrome::default());
        let html = doc.as_str();

        let shim = html.find("window.addEventListener(\"error\"").unwrap();
        let polyfill = html.find("es-module-shims").unwrap();
        let import_map = html.find("<script type=\"importmap\">").unwrap();
        let module = html.find("<script type=\"module\">").unwrap();
        let source = html.find("console.log(1)").unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(shim < polyfill);
        assert!(polyfill < import_map);
        assert!(import_map < module);
        assert!(module < source);
    }

    #[test]
    fn test_import_map_embedded() {
        let doc = compose("", &deps(150), &Chrome::default());
        assert!(
            doc.as_str()
                .contains("\"three\": \"https://unpkg.com/three@0.150.0/build/three.module.js\"")
        );
    }

    #[test]
    fn test_shim_posts_cumulative_batch_to_parent() {
        let doc = compose("", &deps(150), &Chrome::default());
        let html = doc.as_str();

        assert!(html.contains("errors.push(event.message)"));
        assert!(html.contains("const sandbox = location.pathname;"));
        assert!(
            html.contains("parent.postMessage({ type: \"error\", data: errors, sandbox }, \"*\")")
        );
    }

    #[test]
    fn test_invalid_source_passes_through() {
        let source = "const = ;; }{ undefinedCall(";
        let doc = compose(source, &deps(150), &Chrome::default());
        assert!(doc.as_str().contains(source));
    }

    #[test]
    fn test_source_markers_not_expanded() {
        let source = "const s = \"__TITLE__ __IMPORT_MAP__\";";
        let doc = compose(source, &deps(150), &Chrome::default());
        assert!(doc.as_str().contains(source));
    }

    #[test]
    fn test_title_escaped() {
        let chrome = Chrome {
            title: "<cube>".into(),
            ..Chrome::default()
        };
        let doc = compose("", &deps(150), &chrome);
        assert!(doc.as_str().contains("<title>&lt;cube&gt;</title>"));
    }
}
