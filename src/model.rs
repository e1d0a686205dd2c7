//! Game records produced by the extraction pipeline
//!
//! [`GameSummary`] comes from a listing card. [`GameDetail`] extends it with
//! the detail page fields and the embeddability verdict; every field has a
//! defined default so serialized records always share one shape.

use serde::{Deserialize, Serialize};

/// Maximum description length, in characters
pub const DESCRIPTION_LIMIT: usize = 400;

/// Maximum controls text length, in characters
pub const CONTROLS_LIMIT: usize = 300;

/// Controls text must be longer than this to be kept
pub const CONTROLS_MIN_LEN: usize = 20;

/// Maximum review comment length, in characters
pub const COMMENT_LIMIT: usize = 250;

/// Review comments must be longer than this to be kept
pub const COMMENT_MIN_LEN: usize = 15;

pub const MAX_FEATURES: usize = 6;
pub const MAX_TAGS: usize = 8;
pub const MAX_REVIEWS: usize = 5;

/// Author recorded when a review carries no author
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Lightweight summary extracted from one listing card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Trailing path segment of the detail URL (may be empty)
    pub id: String,

    /// Display name, empty when not extractable
    pub name: String,

    /// Absolute detail page URL
    pub url: String,

    /// Absolute thumbnail URL, empty when no image was found
    pub thumbnail: String,

    /// Listing card rating; `None` when absent or unparseable
    pub rating: Option<f64>,

    /// Badge label such as `HOT` or `NEW`, empty when absent
    pub status: String,
}

/// One user review from a game's detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// Fields read from a detail page, before defaults are materialized
///
/// `None` means the field's markup was not found; `Some` with an empty value
/// means it was found but held nothing usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub controls: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub play_count: Option<u64>,
    pub reviews: Option<Vec<Review>>,
    pub review_count: usize,
    pub average_rating: Option<f64>,
}

/// Embeddability verdict for one game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embeddability {
    pub is_embeddable: bool,
    pub iframe_src: Option<String>,
    pub iframe_html: Option<String>,
}

impl Embeddability {
    /// Verdict for a game that must not be embedded
    pub fn rejected() -> Self {
        Self::default()
    }

    /// Verdict for an embeddable game served from `embed_url`
    pub fn embeddable(embed_url: &str) -> Self {
        Self {
            is_embeddable: true,
            iframe_src: Some(embed_url.to_string()),
            iframe_html: Some(iframe_snippet(embed_url)),
        }
    }
}

/// Canonical fixed-size iframe markup for an embed URL
pub fn iframe_snippet(embed_url: &str) -> String {
    format!(
        r#"<iframe src="{}" width="1280" height="720" scrolling="none" frameborder="0"></iframe>"#,
        embed_url
    )
}

/// Fully enriched game record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub summary: GameSummary,

    pub iframe_src: Option<String>,
    pub iframe_html: Option<String>,
    pub is_embeddable: bool,

    pub description: String,
    pub features: Vec<String>,
    pub controls: String,
    pub tags: Vec<String>,
    pub category: String,
    pub play_count: u64,
    pub reviews: Vec<Review>,
    pub review_count: usize,
    pub average_rating: Option<f64>,
}

impl From<GameSummary> for GameDetail {
    fn from(summary: GameSummary) -> Self {
        Self {
            summary,
            ..Self::default()
        }
    }
}

impl GameDetail {
    /// Merges detail page fields, substituting each missing field's default
    pub fn apply_details(&mut self, fields: DetailFields) {
        self.description = fields.description.unwrap_or_default();
        self.features = fields.features.unwrap_or_default();
        self.controls = fields.controls.unwrap_or_default();
        self.tags = fields.tags.unwrap_or_default();
        self.category = fields.category.unwrap_or_default();
        self.play_count = fields.play_count.unwrap_or_default();
        self.reviews = fields.reviews.unwrap_or_default();
        self.review_count = fields.review_count;
        self.average_rating = fields.average_rating;
    }

    /// Records the embeddability verdict
    pub fn apply_embeddability(&mut self, verdict: Embeddability) {
        self.is_embeddable = verdict.is_embeddable;
        self.iframe_src = verdict.iframe_src;
        self.iframe_html = verdict.iframe_html;
    }

    pub fn name(&self) -> &str {
        &self.summary.name
    }
}
