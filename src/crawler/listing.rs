//! Listing page extraction
//!
//! Turns one category listing page into [`GameSummary`] records, one per
//! game card. Cards are processed independently: a card without a link is
//! skipped silently, a card that fails to extract is logged and skipped.

use crate::crawler::text::{selector, stripped_text};
use crate::model::GameSummary;
use crate::url::{last_path_segment, resolve_url};
use crate::UrlError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static CARD: Lazy<Selector> = Lazy::new(|| selector("div.card.card_topic"));
static CARD_LINK: Lazy<Selector> = Lazy::new(|| selector("a.card__inner"));
static CARD_TITLE: Lazy<Selector> = Lazy::new(|| selector("span.card__title"));
static LAZY_IMAGE: Lazy<Selector> = Lazy::new(|| selector(r#"img[loading="lazy"]"#));
static THUMB: Lazy<Selector> = Lazy::new(|| selector("div.card__thumb"));
static RATING: Lazy<Selector> = Lazy::new(|| selector("div.card__rating"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
static STATUS: Lazy<Selector> = Lazy::new(|| selector("div.GameLabel_container"));

static BACKGROUND_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"background-image:\s*url\(['"]?(.*?)['"]?\)"#).expect("static regex")
});

/// Extracts every game card on a listing page
///
/// # Arguments
///
/// * `html` - The listing page markup
/// * `base_url` - Site root used to make links and images absolute
///
/// # Returns
///
/// Summaries in card order. Never fails as a whole.
pub fn extract_listing(html: &str, base_url: &Url) -> Vec<GameSummary> {
    let document = Html::parse_document(html);
    let cards: Vec<ElementRef<'_>> = document.select(&CARD).collect();
    tracing::debug!("Found {} game cards", cards.len());

    let mut games = Vec::with_capacity(cards.len());
    for card in cards {
        match extract_card(card, base_url) {
            Ok(Some(game)) => games.push(game),
            Ok(None) => tracing::debug!("Skipping card without a game link"),
            Err(e) => tracing::warn!("Error extracting game card: {}", e),
        }
    }

    games
}

/// Extracts one card; `Ok(None)` when the card has no game link
fn extract_card(card: ElementRef<'_>, base_url: &Url) -> Result<Option<GameSummary>, UrlError> {
    let Some(link) = card.select(&CARD_LINK).next() else {
        return Ok(None);
    };

    let href = link.value().attr("href").unwrap_or_default();
    let Some(url) = resolve_url(base_url, href)? else {
        return Ok(None);
    };

    let mut name = link
        .value()
        .attr("aria-label")
        .unwrap_or_default()
        .trim()
        .to_string();
    if name.is_empty() {
        name = card
            .select(&CARD_TITLE)
            .next()
            .map(trimmed_text)
            .unwrap_or_default();
    }

    let thumbnail = match extract_thumbnail(card) {
        Some(src) => resolve_url(base_url, &src)?
            .map(String::from)
            .unwrap_or_default(),
        None => String::new(),
    };

    Ok(Some(GameSummary {
        id: last_path_segment(&url),
        name,
        url: url.into(),
        thumbnail,
        rating: extract_rating(card),
        status: extract_status(card),
    }))
}

/// Picks the card image: deferred `data-src`, then `src`, then the thumb's
/// inline `background-image`. Inline data placeholders are never returned.
pub fn extract_thumbnail(card: ElementRef<'_>) -> Option<String> {
    let usable = |value: &str| {
        let value = value.trim();
        (!value.is_empty() && !is_inline_placeholder(value)).then(|| value.to_string())
    };

    if let Some(img) = card.select(&LAZY_IMAGE).next() {
        let attrs = img.value();
        if let Some(src) = attrs.attr("data-src").and_then(usable) {
            return Some(src);
        }
        if let Some(src) = attrs.attr("src").and_then(usable) {
            return Some(src);
        }
    }

    card.select(&THUMB)
        .next()
        .and_then(|thumb| thumb.value().attr("style"))
        .and_then(|style| BACKGROUND_IMAGE.captures(style))
        .and_then(|caps| caps.get(1))
        .and_then(|m| usable(m.as_str()))
}

fn is_inline_placeholder(value: &str) -> bool {
    value.to_ascii_lowercase().starts_with("data:")
}

/// Parses the last span of the rating container; `None` unless it is a finite number
fn extract_rating(card: ElementRef<'_>) -> Option<f64> {
    let container = card.select(&RATING).next()?;
    let last = container.select(&SPAN).last()?;
    stripped_text(last)
        .parse::<f64>()
        .ok()
        .filter(|rating| rating.is_finite())
}

fn extract_status(card: ElementRef<'_>) -> String {
    card.select(&STATUS)
        .next()
        .map(trimmed_text)
        .unwrap_or_default()
}

/// Joined text of an element, trimmed at the ends only
fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
