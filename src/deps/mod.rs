//! Dependency resolution for the preview document.
//!
//! Maps a revision selector to the import-map bindings a sketch needs:
//!
//! ```text
//! three          -> {cdn}/three@0.{n}.0/build/three.module.js
//! three/addons/  -> {cdn}/three@0.{n}.0/examples/jsm/
//! three/         -> {cdn}/three@0.{n}.0/
//! ```
//!
//! Resolution is string formatting only. The network is touched once, at
//! startup, by [`catalog`].

pub mod catalog;

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub use catalog::VersionCatalog;

/// Default package CDN.
pub const DEFAULT_CDN: &str = "https://unpkg.com";

/// A three.js revision number (`r160` → `160`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(pub u32);

impl Revision {
    /// Parse a release tag of the form `r<digits>`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let digits = tag.strip_prefix('r')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self)
    }

    /// npm package version for this revision.
    pub fn package_version(self) -> String {
        format!("0.{}.0", self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Which revision to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    /// First entry of the catalog.
    Latest,
    Exact(Revision),
}

/// Ordered `module name -> url` bindings, serialized as an import map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyMap {
    imports: Vec<(String, String)>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `url`. An existing binding keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        let name = name.into();
        let url = url.into();
        match self.imports.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = url,
            None => self.imports.push((name, url)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, url)| url.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.imports.iter().map(|(n, u)| (n.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Render as `{"imports": {...}}` with four-space indentation.
    pub fn to_import_map(&self) -> String {
        use serde_json::ser::{PrettyFormatter, Serializer as JsonSerializer};

        let mut out = Vec::new();
        let mut ser = JsonSerializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        // Serializing string pairs into a Vec cannot fail.
        if self.serialize(&mut ser).is_err() {
            return String::from("{\"imports\": {}}");
        }
        String::from_utf8(out).unwrap_or_default()
    }
}

struct Imports<'a>(&'a [(String, String)]);

impl Serialize for Imports<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, url) in self.0 {
            map.serialize_entry(name, url)?;
        }
        map.end()
    }
}

impl Serialize for DependencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("imports", &Imports(&self.imports))?;
        map.end()
    }
}

/// Resolves selectors to dependency maps against a fixed CDN and catalog.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    cdn: String,
    catalog: VersionCatalog,
}

impl DependencyResolver {
    pub fn new(cdn: &str, catalog: VersionCatalog) -> Self {
        Self {
            cdn: cdn.trim_end_matches('/').to_string(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }

    /// Concrete revision a selector points at.
    pub fn revision(&self, selector: VersionSelector) -> Revision {
        match selector {
            VersionSelector::Latest => self.catalog.latest(),
            VersionSelector::Exact(rev) => rev,
        }
    }

    pub fn resolve(&self, selector: VersionSelector) -> DependencyMap {
        let base = format!(
            "{}/three@{}/",
            self.cdn,
            self.revision(selector).package_version()
        );

        let mut map = DependencyMap::new();
        map.insert("three", format!("{base}build/three.module.js"));
        map.insert("three/addons/", format!("{base}examples/jsm/"));
        map.insert("three/", base);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(revisions: &[u32]) -> DependencyResolver {
        let catalog = VersionCatalog::new(revisions.iter().copied().map(Revision).collect())
            .expect("non-empty catalog");
        DependencyResolver::new(DEFAULT_CDN, catalog)
    }

    #[test]
    fn test_revision_from_tag() {
        assert_eq!(Revision::from_tag("r150"), Some(Revision(150)));
        assert_eq!(Revision::from_tag("r"), None);
        assert_eq!(Revision::from_tag("150"), None);
        assert_eq!(Revision::from_tag("r150-beta"), None);
        assert_eq!(Revision::from_tag("r+1"), None);
    }

    #[test]
    fn test_revision_display_and_package_version() {
        assert_eq!(Revision(148).to_string(), "r148");
        assert_eq!(Revision(148).package_version(), "0.148.0");
    }

    #[test]
    fn test_latest_resolves_first_catalog_entry() {
        let resolver = resolver(&[150, 149, 148]);
        let map = resolver.resolve(VersionSelector::Latest);

        assert_eq!(
            map.get("three"),
            Some("https://unpkg.com/three@0.150.0/build/three.module.js")
        );
    }

    #[test]
    fn test_three_bindings_differ_only_in_suffix() {
        let resolver = resolver(&[150]);
        for n in [1, 99, 148, 160] {
            let map = resolver.resolve(VersionSelector::Exact(Revision(n)));
            let version = format!("0.{n}.0");
            let base = format!("https://unpkg.com/three@{version}/");

            assert_eq!(map.len(), 3);
            for (_, url) in map.iter() {
                assert!(url.contains(&version));
                assert!(url.starts_with(&base));
            }
            let suffixes: Vec<_> = map.iter().map(|(_, url)| &url[base.len()..]).collect();
            assert_eq!(suffixes, ["build/three.module.js", "examples/jsm/", ""]);
        }
    }

    #[test]
    fn test_binding_order_is_stable() {
        let map = resolver(&[150]).resolve(VersionSelector::Latest);
        let names: Vec<_> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["three", "three/addons/", "three/"]);
    }

    #[test]
    fn test_cdn_trailing_slash_normalized() {
        let catalog = VersionCatalog::new(vec![Revision(150)]).unwrap();
        let resolver = DependencyResolver::new("https://cdn.example.com/", catalog);
        let map = resolver.resolve(VersionSelector::Latest);
        assert_eq!(map.get("three/"), Some("https://cdn.example.com/three@0.150.0/"));
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut map = DependencyMap::new();
        map.insert("three", "a");
        map.insert("other", "b");
        map.insert("three", "c");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("three"), Some("c"));
        assert_eq!(map.iter().next(), Some(("three", "c")));
    }

    #[test]
    fn test_import_map_json() {
        let map = resolver(&[150]).resolve(VersionSelector::Latest);
        let json = map.to_import_map();

        assert!(json.starts_with("{\n    \"imports\": {\n        \"three\": "));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed["imports"]["three/addons/"],
            "https://unpkg.com/three@0.150.0/examples/jsm/"
        );
    }
}
