//! Pluralization utilities.

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// - `plural_count(1, "fault")` -> `"1 fault"`
/// - `plural_count(3, "fault")` -> `"3 faults"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "fault"), "0 faults");
        assert_eq!(plural_count(1, "fault"), "1 fault");
        assert_eq!(plural_count(2, "fault"), "2 faults");
    }
}
