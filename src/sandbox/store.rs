//! Ephemeral locator store.
//!
//! Plays the role of a blob URL registry: every render allocates a fresh
//! `/preview/<generation>-<hash>.html` locator, the HTTP server resolves it,
//! and the renderer revokes it once superseded.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::compose::ComposedDocument;

/// URL prefix of preview documents.
pub const PREVIEW_PREFIX: &str = "/preview/";

/// A dereferenceable preview URL path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared locator table. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    inner: Arc<RwLock<FxHashMap<String, Arc<str>>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `doc` under a new locator.
    pub fn allocate(&self, generation: u64, doc: &ComposedDocument) -> Locator {
        let path = format!("{PREVIEW_PREFIX}{generation}-{}.html", doc.hash().short(12));
        self.inner.write().insert(path.clone(), doc.shared());
        Locator(path)
    }

    /// Release a locator. Returns whether it was live.
    pub fn revoke(&self, locator: &Locator) -> bool {
        self.inner.write().remove(locator.as_str()).is_some()
    }

    /// Look up a request path (query string ignored).
    pub fn resolve(&self, path: &str) -> Option<Arc<str>> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.inner.read().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{Chrome, compose};
    use crate::deps::DependencyMap;

    fn doc(source: &str) -> ComposedDocument {
        compose(source, &DependencyMap::new(), &Chrome::default())
    }

    #[test]
    fn test_allocate_and_resolve() {
        let store = DocumentStore::new();
        let d = doc("a");
        let locator = store.allocate(1, &d);

        assert!(locator.as_str().starts_with("/preview/1-"));
        assert!(locator.as_str().ends_with(".html"));
        assert_eq!(store.resolve(locator.as_str()).as_deref(), Some(d.as_str()));
        assert_eq!(
            store.resolve(&format!("{}?t=1", locator)).as_deref(),
            Some(d.as_str())
        );
    }

    #[test]
    fn test_same_document_distinct_generations() {
        let store = DocumentStore::new();
        let d = doc("a");
        let first = store.allocate(1, &d);
        let second = store.allocate(2, &d);

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_revoke() {
        let store = DocumentStore::new();
        let locator = store.allocate(1, &doc("a"));

        assert!(store.revoke(&locator));
        assert!(!store.revoke(&locator));
        assert!(store.resolve(locator.as_str()).is_none());
        assert!(store.is_empty());
    }
}
