//! String normalization for user-entered lists (ingredients, cuisines, tags).

use std::collections::HashSet;

/// Trim, lowercase, drop empties, and deduplicate, keeping the position of
/// each value's first occurrence.
pub fn normalize_string_array<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    dedup_preserving_order(items.iter().map(|s| s.as_ref().trim().to_lowercase()))
}

/// Like [`normalize_string_array`], and also collapses internal runs of
/// whitespace so `"Quick   Dinner"` and `"quick dinner"` are one tag.
pub fn normalize_tags<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    dedup_preserving_order(items.iter().map(|s| {
        s.as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }))
}

/// Order-insensitive equality after normalization.
pub fn string_sets_equal<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> bool {
    let left: HashSet<String> = normalize_string_array(a).into_iter().collect();
    let right: HashSet<String> = normalize_string_array(b).into_iter().collect();
    left == right
}

/// Trim optional free text; blank becomes `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn dedup_preserving_order(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(
            normalize_string_array(&["  Garlic ", "ONION"]),
            vec!["garlic", "onion"]
        );
    }

    #[test]
    fn dedups_keeping_first_occurrence_order() {
        assert_eq!(
            normalize_string_array(&["Cilantro", "olives", " cilantro", "Olives", "tofu"]),
            vec!["cilantro", "olives", "tofu"]
        );
    }

    #[test]
    fn drops_blank_entries() {
        assert_eq!(normalize_string_array(&["", "   ", "kale"]), vec!["kale"]);
        assert!(normalize_string_array::<&str>(&[]).is_empty());
    }

    #[test]
    fn tags_collapse_internal_whitespace() {
        assert_eq!(
            normalize_tags(&["Quick   Dinner", "quick dinner", " Vegan\t"]),
            vec!["quick dinner", "vegan"]
        );
    }

    #[test]
    fn set_equality_ignores_order_case_and_whitespace() {
        assert!(string_sets_equal(&["Thai", "italian"], &[" ITALIAN", "thai "]));
        assert!(string_sets_equal(&["thai", "Thai"], &["thai"]));
        assert!(!string_sets_equal(&["thai"], &["thai", "greek"]));
    }

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(normalize_optional_text(Some("  ".into())), None);
        assert_eq!(normalize_optional_text(Some(" hi ".into())), Some("hi".into()));
        assert_eq!(normalize_optional_text(None), None);
    }
}
