//! Template types for typed variable injection.

use std::marker::PhantomData;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }

    pub const fn content(&self) -> &'static str {
        self.content
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Replace `__NAME__` markers in a single left-to-right pass.
///
/// Substituted values are never rescanned, so a value containing another
/// marker (user source, for instance) is emitted as-is.
pub fn substitute(content: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(content.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = content;

    loop {
        let next = vars
            .iter()
            .filter_map(|(marker, value)| rest.find(marker).map(|at| (at, *marker, *value)))
            .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, marker, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + marker.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_all_markers() {
        let out = substitute("<a>__X__</a><b>__Y__</b>__X__", &[("__X__", "1"), ("__Y__", "2")]);
        assert_eq!(out, "<a>1</a><b>2</b>1");
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        let out = substitute("__A__|__B__", &[("__A__", "__B__"), ("__B__", "b")]);
        assert_eq!(out, "__B__|b");
    }

    #[test]
    fn test_substitute_without_markers() {
        assert_eq!(substitute("plain", &[("__X__", "1")]), "plain");
    }
}
