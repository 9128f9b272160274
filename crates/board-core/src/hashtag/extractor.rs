//! Hashtag extraction from free text

use super::model::HashtagName;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// A marker followed by one or more characters that are neither whitespace
/// nor another marker. `##tag` matches once, as `#tag`.
fn hashtag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#([^\s#]+)").expect("hashtag pattern is valid"))
}

/// Extract the set of normalized hashtag names referenced by `content`.
///
/// Never fails: blank or tag-free text gives the empty set.
pub fn extract(content: &str) -> BTreeSet<HashtagName> {
    if content.trim().is_empty() {
        return BTreeSet::new();
    }

    hashtag_pattern()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| HashtagName::from_token(m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(content: &str) -> Vec<String> {
        extract(content).into_iter().map(HashtagName::into_string).collect()
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(names("Loving #java and #java today"), vec!["java"]);
    }

    #[test]
    fn test_double_marker_yields_single_token() {
        assert_eq!(names("##spring"), vec!["spring"]);
    }

    #[test]
    fn test_bare_marker_is_not_a_match() {
        assert!(extract("# heading and a lonely # here").is_empty());
        assert!(extract("#").is_empty());
    }

    #[test]
    fn test_blank_input() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t").is_empty());
    }

    #[test]
    fn test_multiple_tags() {
        assert_eq!(
            names("#rust #Spring\n#java-17 plain text"),
            vec!["java-17", "rust", "spring"]
        );
    }

    #[test]
    fn test_adjacent_tags_split_on_marker() {
        assert_eq!(names("#a#b#c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(names("#Rust #RUST #rust"), vec!["rust"]);
    }

    #[test]
    fn test_unicode_tags() {
        assert_eq!(names("오늘은 #스프링 공부"), vec!["스프링"]);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let content = "#b #a #c #a";
        assert_eq!(extract(content), extract(content));
    }
}
