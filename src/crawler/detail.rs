//! Detail page extraction
//!
//! Every field is located by an ordered list of independent strategies.
//! Each strategy is a plain function from the parsed document to an optional
//! value; [`resolve_first`] applies them in order and stops at the first hit.
//! A field no strategy can find stays `None` in [`DetailFields`].

use crate::crawler::text::{
    char_len, class_contains, find_by_class, find_in_document, first_decimal,
    first_grouped_integer, selector, stripped_text, truncate_chars,
};
use crate::model::{
    DetailFields, Review, ANONYMOUS_AUTHOR, COMMENT_LIMIT, COMMENT_MIN_LEN, CONTROLS_LIMIT,
    CONTROLS_MIN_LEN, DESCRIPTION_LIMIT, MAX_FEATURES, MAX_REVIEWS, MAX_TAGS,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// One way of locating a field on a detail page
pub type Strategy<T> = fn(&Html) -> Option<T>;

/// Applies `strategies` in order and returns the first value found
pub fn resolve_first<T>(document: &Html, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(document))
}

static GAME_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector("div.game-description"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector("div.description"));
static GAME_INFO: Lazy<Selector> = Lazy::new(|| selector("section.game-info"));
static GAME_DESCRIPTION_BEM: Lazy<Selector> = Lazy::new(|| selector("div.game__description"));
static ITEMPROP_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"div[itemprop="description"]"#));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));

static SECTIONS: Lazy<Selector> = Lazy::new(|| selector("div, section"));
static LISTS: Lazy<Selector> = Lazy::new(|| selector("ul, ol"));
static LIST_ITEM: Lazy<Selector> = Lazy::new(|| selector("li"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));

static TAG_LINKS: Lazy<Selector> = Lazy::new(|| selector("a"));
static TAG_SPANS: Lazy<Selector> = Lazy::new(|| selector("span"));
static REL_TAGS: Lazy<Selector> = Lazy::new(|| selector(r#"a[rel~="tag"], span[rel~="tag"]"#));

static RATING_HOLDERS: Lazy<Selector> = Lazy::new(|| selector("span, div"));
static REVIEW_ITEMS: Lazy<Selector> = Lazy::new(|| selector("div, article, li"));
static AUTHOR_HOLDERS: Lazy<Selector> = Lazy::new(|| selector("span, div, a"));
static COMMENT_HOLDERS: Lazy<Selector> = Lazy::new(|| selector("p, div, span"));

const FEATURE_KEYWORDS: &[&str] = &["feature", "highlight", "gameplay", "key point"];
const CONTROL_KEYWORDS: &[&str] = &["control", "how to play", "instruction", "keyboard", "mouse"];
const CONTROL_BLOCKS: &[&str] = &["div", "section", "article", "p", "h2", "h3"];

const DESCRIPTION_STRATEGIES: &[Strategy<String>] = &[
    description_from_game_description,
    description_from_description,
    description_from_game_info,
    description_from_game_description_bem,
    description_from_itemprop,
    description_from_meta,
];

const FEATURE_STRATEGIES: &[Strategy<Vec<String>>] =
    &[features_from_keyword_section, features_from_info_lists];

const TAG_STRATEGIES: &[Strategy<Vec<String>>] =
    &[tags_from_links, tags_from_spans, tags_from_rel];

const CATEGORY_STRATEGIES: &[Strategy<String>] = &[category_from_span, category_from_link];

/// Extracts the descriptive fields of a game detail page
///
/// Never fails: each field falls back independently.
pub fn extract_detail(html: &str) -> DetailFields {
    let document = Html::parse_document(html);
    let reviews = extract_reviews(&document);

    DetailFields {
        description: resolve_first(&document, DESCRIPTION_STRATEGIES)
            .map(|d| truncate_chars(&d, DESCRIPTION_LIMIT)),
        features: resolve_first(&document, FEATURE_STRATEGIES).map(|mut features| {
            features.truncate(MAX_FEATURES);
            features
        }),
        controls: extract_controls(&document),
        tags: resolve_first(&document, TAG_STRATEGIES).map(|tags| dedup_tags(tags, MAX_TAGS)),
        category: resolve_first(&document, CATEGORY_STRATEGIES),
        play_count: extract_play_count(&document),
        review_count: reviews.as_ref().map_or(0, |r| r.raw_count),
        average_rating: reviews.as_ref().and_then(|r| r.average_rating),
        reviews: reviews.map(|r| r.reviews),
    }
}

// ===== Description =====

/// Reads a description candidate: up to two paragraphs, else the whole text
fn block_description(document: &Html, candidate: &Selector) -> Option<String> {
    let element = document.select(candidate).next()?;

    let paragraphs: Vec<String> = element.select(&PARAGRAPH).map(stripped_text).collect();
    let text = if paragraphs.is_empty() {
        stripped_text(element)
    } else {
        paragraphs
            .into_iter()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ")
    };

    non_empty(text)
}

fn description_from_game_description(document: &Html) -> Option<String> {
    block_description(document, &GAME_DESCRIPTION)
}

fn description_from_description(document: &Html) -> Option<String> {
    block_description(document, &DESCRIPTION)
}

fn description_from_game_info(document: &Html) -> Option<String> {
    block_description(document, &GAME_INFO)
}

fn description_from_game_description_bem(document: &Html) -> Option<String> {
    block_description(document, &GAME_DESCRIPTION_BEM)
}

fn description_from_itemprop(document: &Html) -> Option<String> {
    block_description(document, &ITEMPROP_DESCRIPTION)
}

fn description_from_meta(document: &Html) -> Option<String> {
    let meta = document.select(&META_DESCRIPTION).next()?;
    non_empty(meta.value().attr("content")?.trim().to_string())
}

// ===== Features =====

/// Items of every list inside the first section whose class names a feature keyword
///
/// Only the first keyword with a matching section is consulted.
fn features_from_keyword_section(document: &Html) -> Option<Vec<String>> {
    let section = FEATURE_KEYWORDS
        .iter()
        .find_map(|keyword| find_in_document(document, &SECTIONS, &[*keyword]))?;

    let features: Vec<String> = section
        .select(&LISTS)
        .flat_map(|list| list.select(&LIST_ITEM).take(MAX_FEATURES).map(stripped_text))
        .collect();

    non_empty_vec(features)
}

/// Short lists (2 to 12 items) among the first two lists of an "info" section
fn features_from_info_lists(document: &Html) -> Option<Vec<String>> {
    let section = find_in_document(document, &SECTIONS, &["info"])?;

    let mut features = Vec::new();
    for list in section.select(&LISTS).take(2) {
        let items: Vec<ElementRef<'_>> = list.select(&LIST_ITEM).collect();
        if (2..=12).contains(&items.len()) {
            features.extend(items.into_iter().take(MAX_FEATURES).map(stripped_text));
        }
    }

    non_empty_vec(features)
}

// ===== Controls =====

/// Controls text near the first keyword that yields more than 20 characters
fn extract_controls(document: &Html) -> Option<String> {
    CONTROL_KEYWORDS
        .iter()
        .find_map(|keyword| controls_near_keyword(document, keyword))
}

/// Finds the first text node mentioning `keyword`, climbs to its nearest
/// block ancestor and reads the first paragraph, div or list that follows
/// that block's opening tag.
fn controls_near_keyword(document: &Html, keyword: &str) -> Option<String> {
    let text_node = document.tree.root().descendants().find(|node| {
        node.value()
            .as_text()
            .map_or(false, |text| text.to_lowercase().contains(keyword))
    })?;

    let block = text_node
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| CONTROL_BLOCKS.contains(&e.value().name()))?;

    let controls = match following_content(document, block) {
        Some(next) if next.value().name() == "ul" => next
            .select(&LIST_ITEM)
            .map(stripped_text)
            .collect::<Vec<_>>()
            .join(" | "),
        Some(next) => stripped_text(next),
        None => stripped_text(block),
    };

    (char_len(&controls) > CONTROLS_MIN_LEN).then(|| truncate_chars(&controls, CONTROLS_LIMIT))
}

/// First `p`, `div` or `ul` after `anchor` in document order, its own children included
fn following_content<'a>(document: &'a Html, anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
    document
        .tree
        .root()
        .descendants()
        .skip_while(|node| *node != *anchor)
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|e| matches!(e.value().name(), "p" | "div" | "ul"))
}

// ===== Tags and category =====

fn tag_texts<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Option<Vec<String>> {
    let found: Vec<ElementRef<'a>> = elements.take(MAX_TAGS).collect();
    if found.is_empty() {
        return None;
    }
    Some(found.into_iter().map(stripped_text).collect())
}

fn tags_from_links(document: &Html) -> Option<Vec<String>> {
    tag_texts(document.select(&TAG_LINKS).filter(|e| class_contains(*e, "tag")))
}

fn tags_from_spans(document: &Html) -> Option<Vec<String>> {
    tag_texts(document.select(&TAG_SPANS).filter(|e| class_contains(*e, "tag")))
}

fn tags_from_rel(document: &Html) -> Option<Vec<String>> {
    tag_texts(document.select(&REL_TAGS))
}

/// Drops blank and repeated tags, keeping at most `limit`
fn dedup_tags(tags: Vec<String>, limit: usize) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !tag.is_empty() && !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique.truncate(limit);
    unique
}

fn category_from_span(document: &Html) -> Option<String> {
    find_in_document(document, &TAG_SPANS, &["category"]).map(stripped_text)
}

fn category_from_link(document: &Html) -> Option<String> {
    find_in_document(document, &TAG_LINKS, &["category"]).map(stripped_text)
}

// ===== Play count =====

/// Number in the first text node that mentions "play" and contains a digit
fn extract_play_count(document: &Html) -> Option<u64> {
    let text = document.tree.root().descendants().find_map(|node| {
        let text = node.value().as_text()?;
        let mentions_play = text.to_lowercase().contains("play");
        let has_digit = text.chars().any(|c| c.is_ascii_digit());
        (mentions_play && has_digit).then(|| text.to_string())
    })?;

    first_grouped_integer(&text)
}

// ===== Reviews =====

struct ReviewSummary {
    reviews: Vec<Review>,
    raw_count: usize,
    average_rating: Option<f64>,
}

fn extract_reviews(document: &Html) -> Option<ReviewSummary> {
    let section = find_in_document(document, &SECTIONS, &["review"])?;

    let average_rating = find_by_class(section, &RATING_HOLDERS, &["rating"])
        .and_then(|e| first_decimal(&stripped_text(e)));

    let items: Vec<ElementRef<'_>> = section
        .select(&REVIEW_ITEMS)
        .filter(|e| class_contains(*e, "comment") || class_contains(*e, "review-item"))
        .collect();

    let mut reviews: Vec<Review> = items.iter().filter_map(|item| parse_review(*item)).collect();
    reviews.truncate(MAX_REVIEWS);

    Some(ReviewSummary {
        reviews,
        raw_count: items.len(),
        average_rating,
    })
}

/// Reads one review element; `None` when its comment is too short to keep
fn parse_review(item: ElementRef<'_>) -> Option<Review> {
    let comment_element = find_by_class(item, &COMMENT_HOLDERS, &["text", "comment", "content"])
        .or_else(|| item.select(&PARAGRAPH).next())
        .unwrap_or(item);

    let comment = stripped_text(comment_element);
    if char_len(&comment) <= COMMENT_MIN_LEN {
        return None;
    }

    let author = find_by_class(item, &AUTHOR_HOLDERS, &["author", "user"])
        .map(stripped_text)
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string());

    let rating = find_by_class(item, &RATING_HOLDERS, &["rating"])
        .and_then(|e| first_decimal(&stripped_text(e)));

    Some(Review {
        author,
        comment: truncate_chars(&comment, COMMENT_LIMIT),
        rating,
    })
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn non_empty_vec(items: Vec<String>) -> Option<Vec<String>> {
    (!items.is_empty()).then_some(items)
}
