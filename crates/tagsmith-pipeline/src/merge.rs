//! Tag-set merging: case-insensitive, order-preserving deduplicating union.

use std::collections::HashSet;

/// Splits a comma-delimited catalog tag string into lowercase-trimmed
/// tokens, dropping empties.
#[must_use]
pub fn parse_tag_string(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Union of the existing tag string and the generated tags: existing tags
/// first, then generated tags not already present, deduplicated by
/// case-insensitive equality while preserving first-seen order.
///
/// Pure, and idempotent under re-application:
/// `merge_tags(&render_tags(&merge_tags(e, g)), g) == merge_tags(e, g)`.
#[must_use]
pub fn merge_tags(existing: &str, generated: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    let existing_tokens = parse_tag_string(existing);
    let generated_tokens = generated.iter().map(|t| t.trim().to_lowercase());

    for tag in existing_tokens.into_iter().chain(generated_tokens) {
        if !tag.is_empty() && seen.insert(tag.clone()) {
            merged.push(tag);
        }
    }

    merged
}

/// Renders an ordered tag set in the catalog's comma-and-space format.
#[must_use]
pub fn render_tags(tags: &[String]) -> String {
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| (*t).to_owned()).collect()
    }

    #[test]
    fn parse_tag_string_lowercases_and_trims() {
        assert_eq!(
            parse_tag_string("Red,  Cotton , SUMMER"),
            owned(&["red", "cotton", "summer"])
        );
    }

    #[test]
    fn parse_tag_string_empty_input() {
        assert!(parse_tag_string("").is_empty());
        assert!(parse_tag_string(" , ,").is_empty());
    }

    #[test]
    fn merge_dedups_case_insensitively_preserving_order() {
        let merged = merge_tags("Red, Cotton", &owned(&["red", "summer"]));
        assert_eq!(merged, owned(&["red", "cotton", "summer"]));
    }

    #[test]
    fn merge_keeps_existing_tags_first() {
        let merged = merge_tags("winter, wool", &owned(&["scarf", "wool"]));
        assert_eq!(merged, owned(&["winter", "wool", "scarf"]));
    }

    #[test]
    fn merge_with_empty_existing_string() {
        let merged = merge_tags("", &owned(&["red", "summer"]));
        assert_eq!(merged, owned(&["red", "summer"]));
    }

    #[test]
    fn merge_with_no_generated_tags() {
        let merged = merge_tags("Red, Cotton", &[]);
        assert_eq!(merged, owned(&["red", "cotton"]));
    }

    #[test]
    fn merge_normalizes_generated_entries_too() {
        let merged = merge_tags("red", &owned(&[" RED ", "Summer"]));
        assert_eq!(merged, owned(&["red", "summer"]));
    }

    #[test]
    fn merge_is_idempotent_under_reapplication() {
        let generated = owned(&["red", "summer", "beach wear"]);
        let first = merge_tags("Red, Cotton", &generated);
        let second = merge_tags(&render_tags(&first), &generated);
        assert_eq!(first, second, "re-merging must never grow the set");
    }

    #[test]
    fn render_joins_with_comma_and_space() {
        assert_eq!(render_tags(&owned(&["red", "cotton"])), "red, cotton");
        assert_eq!(render_tags(&[]), "");
    }
}
