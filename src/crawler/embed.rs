//! Embeddability classification
//!
//! A game is embeddable when its embed page shows signs of a locally hosted
//! runtime (a canvas, an engine, a graphics API or a game framework) and does
//! not wrap a third-party iframe. The third-party check always wins.

use crate::crawler::text::selector;
use crate::model::Embeddability;
use crate::url::{is_same_site, resolve_url};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static CANVAS: Lazy<Selector> = Lazy::new(|| selector("canvas"));
static IFRAME: Lazy<Selector> = Lazy::new(|| selector("iframe[src]"));

/// Marker of the Unity web runtime
const ENGINE_MARKER: &str = "unity";

/// Marker of a WebGL rendering context
const GRAPHICS_MARKER: &str = "webgl";

/// Marker of the Phaser HTML5 framework
const FRAMEWORK_MARKER: &str = "phaser";

/// Raw signals read from an embed page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedSignals {
    pub canvas: bool,
    pub engine_runtime: bool,
    pub graphics_api: bool,
    pub game_framework: bool,
    pub third_party_iframe: bool,
}

impl EmbedSignals {
    /// True when any local-asset signal is present
    pub fn is_local_game(&self) -> bool {
        self.canvas || self.engine_runtime || self.graphics_api || self.game_framework
    }
}

/// The embeddability rule: a local game with no third-party iframe
pub fn decide(signals: EmbedSignals) -> bool {
    signals.is_local_game() && !signals.third_party_iframe
}

/// Reads all signals from an embed page
///
/// # Arguments
///
/// * `html` - The embed page markup
/// * `embed_url` - The embed page's own URL; relative iframe sources resolve against it
/// * `site` - The site root whose host counts as first-party
pub fn detect_signals(html: &str, embed_url: &Url, site: &Url) -> EmbedSignals {
    let document = Html::parse_document(html);
    let markup = document.html().to_lowercase();

    EmbedSignals {
        canvas: document.select(&CANVAS).next().is_some(),
        engine_runtime: markup.contains(ENGINE_MARKER),
        graphics_api: markup.contains(GRAPHICS_MARKER),
        game_framework: markup.contains(FRAMEWORK_MARKER),
        third_party_iframe: has_third_party_iframe(&document, embed_url, site),
    }
}

/// True if any iframe points at an HTTP(S) host other than the site's own
fn has_third_party_iframe(document: &Html, embed_url: &Url, site: &Url) -> bool {
    document
        .select(&IFRAME)
        .filter_map(|iframe| iframe.value().attr("src"))
        .filter_map(|src| match resolve_url(embed_url, src) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Ignoring unparseable iframe src '{}': {}", src, e);
                None
            }
        })
        .any(|url| !is_same_site(&url, site))
}

/// Classifies an embed page and builds the embed reference when allowed
pub fn classify(html: &str, embed_url: &Url, site: &Url) -> Embeddability {
    let signals = detect_signals(html, embed_url, site);
    tracing::debug!("Embed signals for {}: {:?}", embed_url, signals);

    if decide(signals) {
        Embeddability::embeddable(embed_url.as_str())
    } else {
        Embeddability::rejected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://1games.io/").unwrap()
    }

    fn embed_url() -> Url {
        Url::parse("https://1games.io/game/neon-rider/").unwrap()
    }

    #[test]
    fn test_decide_truth_table() {
        for bits in 0u8..32 {
            let signals = EmbedSignals {
                canvas: bits & 1 != 0,
                engine_runtime: bits & 2 != 0,
                graphics_api: bits & 4 != 0,
                game_framework: bits & 8 != 0,
                third_party_iframe: bits & 16 != 0,
            };

            let expected = (bits & 0b1111) != 0 && (bits & 16) == 0;
            assert_eq!(decide(signals), expected, "signals: {:?}", signals);
        }
    }

    #[test]
    fn test_canvas_without_iframe_is_embeddable() {
        let html = "<html><body><canvas id=\"game\"></canvas></body></html>";
        let verdict = classify(html, &embed_url(), &site());

        assert!(verdict.is_embeddable);
        assert_eq!(
            verdict.iframe_src.as_deref(),
            Some("https://1games.io/game/neon-rider/")
        );
        assert_eq!(
            verdict.iframe_html.as_deref(),
            Some(r#"<iframe src="https://1games.io/game/neon-rider/" width="1280" height="720" scrolling="none" frameborder="0"></iframe>"#)
        );
    }

    #[test]
    fn test_third_party_iframe_overrides_canvas() {
        let html = r#"<html><body>
            <canvas></canvas>
            <iframe src="https://otherhost.example/game"></iframe>
        </body></html>"#;
        let verdict = classify(html, &embed_url(), &site());

        assert!(!verdict.is_embeddable);
        assert!(verdict.iframe_src.is_none());
        assert!(verdict.iframe_html.is_none());
    }

    #[test]
    fn test_first_party_iframe_is_allowed() {
        let html = r#"<html><body>
            <script src="/js/UnityLoader.js"></script>
            <iframe src="/game/neon-rider/frame.html"></iframe>
            <iframe src="https://1games.io/ads"></iframe>
        </body></html>"#;
        let signals = detect_signals(html, &embed_url(), &site());

        assert!(signals.engine_runtime);
        assert!(!signals.third_party_iframe);
        assert!(decide(signals));
    }

    #[test]
    fn test_marker_strings_are_case_insensitive() {
        let webgl = detect_signals(
            "<script>var gl = canvas.getContext('WebGL');</script>",
            &embed_url(),
            &site(),
        );
        assert!(webgl.graphics_api);

        let phaser = detect_signals(
            r#"<script src="/lib/Phaser.min.js"></script>"#,
            &embed_url(),
            &site(),
        );
        assert!(phaser.game_framework);
    }

    #[test]
    fn test_plain_page_is_not_embeddable() {
        let html = "<html><body><p>Redirecting you to the game...</p></body></html>";
        let verdict = classify(html, &embed_url(), &site());
        assert_eq!(verdict, Embeddability::rejected());
    }

    #[test]
    fn test_classification_is_deterministic() {
        let html = r#"<canvas></canvas><iframe src="https://cdn.other.example/x"></iframe>"#;
        let first = classify(html, &embed_url(), &site());
        for _ in 0..5 {
            assert_eq!(classify(html, &embed_url(), &site()), first);
        }
    }
}
