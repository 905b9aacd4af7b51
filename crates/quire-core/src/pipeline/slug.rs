//! Slug normalization: turns a free-form title into a URL-safe identifier.

use std::sync::LazyLock;

use regex::Regex;

const SEPARATOR: &str = "-";

/// One or more characters outside the slug alphabet.
static DISALLOWED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9\-_\p{Arabic}]+").expect("disallowed-run pattern compiles")
});

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("separator-run pattern compiles"));

static SLUG_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9\-_\p{Arabic}]+$").expect("slug format pattern compiles")
});

/// Normalize `raw` into a slug.
///
/// Runs of characters outside ASCII letters, digits, `-`, `_` and the Arabic
/// script become a single `-`, repeated separators collapse, and a leading or
/// trailing separator is dropped. Input with nothing usable yields `""`.
pub fn normalize(raw: &str) -> String {
    let replaced = DISALLOWED_RUN.replace_all(raw, SEPARATOR);
    let collapsed = SEPARATOR_RUN.replace_all(&replaced, SEPARATOR).into_owned();

    let trimmed = collapsed.strip_prefix(SEPARATOR).unwrap_or(&collapsed);
    let trimmed = trimmed.strip_suffix(SEPARATOR).unwrap_or(trimmed);
    trimmed.to_string()
}

/// Whether `slug` is non-empty and made only of slug characters.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_FORMAT.is_match(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize("Hello World!"), "Hello-World");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ???"), "");
    }

    #[test]
    fn test_normalize_collapses_existing_separators() {
        assert_eq!(normalize("a -- b"), "a-b");
        assert_eq!(normalize("--lead and trail--"), "lead-and-trail");
    }

    #[test]
    fn test_normalize_keeps_underscores_and_case() {
        assert_eq!(normalize("snake_case Title"), "snake_case-Title");
        assert_eq!(normalize("__x__"), "__x__");
    }

    #[test]
    fn test_normalize_keeps_arabic() {
        assert_eq!(normalize("مرحبا بالعالم"), "مرحبا-بالعالم");
    }

    #[test]
    fn test_normalize_drops_other_scripts() {
        assert_eq!(normalize("Café crème"), "Caf-cr-me");
        assert_eq!(normalize("日本語"), "");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world_2024"));
        assert!(is_valid_slug("مرحبا"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("hello world"));
        assert!(!is_valid_slug("bad/slug"));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "\\PC{0,40}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalized_output_matches_slug_format(raw in "\\PC{0,40}") {
            let slug = normalize(&raw);
            prop_assert!(slug.is_empty() || is_valid_slug(&slug));
            prop_assert!(!slug.contains("--"));
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        }
    }
}
