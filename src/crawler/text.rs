//! Small text and markup helpers shared by the extractors

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d*").expect("static regex"));
static GROUPED_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d,]*").expect("static regex"));

/// Compiles a selector known at compile time
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Concatenates an element's text nodes, each trimmed, skipping blank ones
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Number of characters (not bytes) in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Keeps at most `limit` characters of `text`
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Case-insensitive substring test against the element's `class` attribute
pub fn class_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element
        .value()
        .attr("class")
        .map(|class| class.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// First element under `scope` matching `tags` whose class contains any of `needles`
pub fn find_by_class<'a>(
    scope: ElementRef<'a>,
    tags: &Selector,
    needles: &[&str],
) -> Option<ElementRef<'a>> {
    scope
        .select(tags)
        .find(|e| needles.iter().any(|n| class_contains(*e, n)))
}

/// Document-wide variant of [`find_by_class`]
pub fn find_in_document<'a>(
    document: &'a Html,
    tags: &Selector,
    needles: &[&str],
) -> Option<ElementRef<'a>> {
    document
        .select(tags)
        .find(|e| needles.iter().any(|n| class_contains(*e, n)))
}

/// First decimal number (`12`, `4.5`) appearing in `text`
pub fn first_decimal(text: &str) -> Option<f64> {
    DECIMAL.find(text)?.as_str().parse().ok()
}

/// First comma-grouped integer (`1,234,567`) appearing in `text`
pub fn first_grouped_integer(text: &str) -> Option<u64> {
    GROUPED_INTEGER
        .find(text)?
        .as_str()
        .replace(',', "")
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripped_text() {
        let html = Html::parse_fragment("<div>  Hello <b> brave </b>\n world </div>");
        let div = html.select(&selector("div")).next().unwrap();
        assert_eq!(stripped_text(div), "Hellobraveworld");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "ééééé";
        assert_eq!(truncate_chars(text, 3), "ééé");
        assert_eq!(char_len(text), 5);
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_class_contains_is_case_insensitive() {
        let html = Html::parse_fragment(r#"<div class="Game-Features wide"></div>"#);
        let div = html.select(&selector("div")).next().unwrap();
        assert!(class_contains(div, "feature"));
        assert!(!class_contains(div, "review"));
    }

    #[test]
    fn test_first_decimal() {
        assert_eq!(first_decimal("Rated 4.5 / 5"), Some(4.5));
        assert_eq!(first_decimal("9 stars"), Some(9.0));
        assert_eq!(first_decimal("no rating"), None);
    }

    #[test]
    fn test_first_grouped_integer() {
        assert_eq!(first_grouped_integer("Played 1,234,567 times"), Some(1_234_567));
        assert_eq!(first_grouped_integer("Hello, played 42 times"), Some(42));
        assert_eq!(first_grouped_integer("no plays"), None);
    }
}
