//! Embedded static resources.
//!
//! - `PREVIEW_HTML` - the sandboxed preview document (fault shim + import map + module)
//! - `HOST_HTML` - the host page (frame, revision picker, error surface, host link)
//! - `STARTER_JS` - scene written when the sketch file does not exist yet
//!
//! # Usage
//!
//! ```ignore
//! use embed::{HOST_HTML, HostVars};
//!
//! let html = HOST_HTML.render(&HostVars { title: "preview", entry: "main.js", ws_port: 35729 });
//! ```

mod template;

pub use template::{Template, TemplateVars, substitute};

use crate::utils::html::{escape, escape_attr};

/// Variables for the preview document.
///
/// `import_map` and `source` are embedded verbatim.
pub struct PreviewVars<'a> {
    pub title: &'a str,
    pub polyfill: &'a str,
    pub import_map: &'a str,
    pub source: &'a str,
}

impl TemplateVars for PreviewVars<'_> {
    fn apply(&self, content: &str) -> String {
        let title = escape(self.title);
        let polyfill = escape_attr(self.polyfill);
        substitute(
            content,
            &[
                ("__TITLE__", title.as_ref()),
                ("__POLYFILL__", polyfill.as_ref()),
                ("__IMPORT_MAP__", self.import_map),
                ("__SOURCE__", self.source),
            ],
        )
    }
}

/// Sandboxed preview document.
pub const PREVIEW_HTML: Template<PreviewVars<'static>> =
    Template::new(include_str!("assets/preview.html"));

/// Variables for the host page.
pub struct HostVars<'a> {
    pub title: &'a str,
    pub entry: &'a str,
    pub ws_port: u16,
}

impl TemplateVars for HostVars<'_> {
    fn apply(&self, content: &str) -> String {
        let title = escape_attr(self.title);
        let entry = escape(self.entry);
        let port = self.ws_port.to_string();
        substitute(
            content,
            &[
                ("__TITLE__", title.as_ref()),
                ("__ENTRY__", entry.as_ref()),
                ("__WS_PORT__", port.as_str()),
            ],
        )
    }
}

/// Host page served at `/`.
pub const HOST_HTML: Template<HostVars<'static>> = Template::new(include_str!("assets/host.html"));

/// Starter scene for new sketches.
pub const STARTER_JS: &str = include_str!("assets/starter.js");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_page_injects_port_and_entry() {
        let html = HOST_HTML.render(&HostVars {
            title: "preview",
            entry: "<cube>.js",
            ws_port: 35730,
        });

        assert!(html.contains("location.hostname}:35730"));
        assert!(html.contains("&lt;cube&gt;.js"));
        assert!(!html.contains("__WS_PORT__"));
        assert!(html.contains(r#"sandbox="allow-scripts""#));
    }

    #[test]
    fn test_host_relays_document_locator() {
        let html = HOST_HTML.render(&HostVars {
            title: "preview",
            entry: "main.js",
            ws_port: 35729,
        });

        assert!(html.contains("send({ type: \"relay\", sandbox, message: data })"));
        assert!(!html.contains("sandbox: iframe.getAttribute(\"src\")"));
    }

    #[test]
    fn test_starter_imports_three() {
        assert!(STARTER_JS.starts_with("import * as THREE from \"three\""));
        assert!(STARTER_JS.contains("three/addons/"));
    }
}
