//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the game portal and run
//! listing, detail and embed extraction end-to-end.

use embed_scout::config::Config;
use embed_scout::crawler::{build_http_client, Fetcher, Harvester, Sleeper};
use embed_scout::output::{load_report, JsonOutputHandler};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records every requested pause without waiting
#[derive(Clone, Default)]
struct InstantSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl InstantSleeper {
    fn calls(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }
}

impl Sleeper for InstantSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.calls.lock().unwrap().push(duration);
        std::future::ready(())
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output_dir: &std::path::Path) -> Config {
    Config {
        base_url: base_url.to_string(),
        categories: vec!["action".to_string()],
        max_pages: 2,
        rate_limit_seconds: 0.5,
        scrape_iframes: true,
        retry_attempts: 2,
        timeout_seconds: 5,
        games_per_page: 20,
        output_dir: output_dir.to_path_buf(),
        ..Config::default()
    }
}

fn card(slug: &str, name: &str, rating: &str) -> String {
    format!(
        r#"<div class="card card_topic">
             <a class="card__inner" href="/{slug}" aria-label="{name}">
               <img loading="lazy" src="data:image/gif;base64,R0lGOD" data-src="/img/{slug}.png">
             </a>
             <div class="card__rating"><span class="icon"></span><span>{rating}</span></div>
             <div class="GameLabel_container">HOT</div>
           </div>"#
    )
}

fn detail_page(title: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
           <div class="game-description"><p>{title} is a fast arcade game.</p><p>Beat every level.</p></div>
           <div class="features"><ul><li>Twelve levels</li><li>Online leaderboard</li></ul></div>
           <div><h3>Controls</h3></div>
           <p>Use the arrow keys to steer and space to jump over gaps.</p>
           <a class="tag" href="/t/arcade">Arcade</a><a class="tag" href="/t/racing">Racing</a>
           <span class="category">Action</span>
           <div class="stats">Played 12,345 times</div>
           <div class="reviews">
             <span class="rating">4.6</span>
             <div class="comment"><span class="author">Mika</span><p class="text">Loved the neon visuals a lot.</p></div>
             <div class="comment"><p>ok</p></div>
           </div>
           </body></html>"#
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_keeps_only_embeddable_games() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/action.games"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><body>{}{}</body></html>",
            card("neon-rider", "Neon Rider", "4.5"),
            card("wrapped-game", "Wrapped Game", "4.9"),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/action.games"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><body>{}</body></html>",
            card("cave-run", "Cave Run", "3.9"),
        )))
        .mount(&server)
        .await;

    for (slug, title) in [
        ("neon-rider", "Neon Rider"),
        ("wrapped-game", "Wrapped Game"),
        ("cave-run", "Cave Run"),
    ] {
        mount_html(&server, &format!("/{}", slug), detail_page(title)).await;
    }

    mount_html(
        &server,
        "/game/neon-rider/",
        r#"<html><body><canvas id="unity-canvas"></canvas><script src="/Build/UnityLoader.js"></script></body></html>"#.to_string(),
    )
    .await;
    mount_html(
        &server,
        "/game/wrapped-game/",
        r#"<html><body><canvas></canvas><iframe src="https://otherhost.example/game"></iframe></body></html>"#.to_string(),
    )
    .await;
    mount_html(
        &server,
        "/game/cave-run/",
        r#"<html><body><script>new Phaser.Game(config);</script></body></html>"#.to_string(),
    )
    .await;

    let config = create_test_config(&server.uri(), output.path());
    let sleeper = InstantSleeper::default();
    let harvester = Harvester::with_sleeper(config.clone(), sleeper.clone()).unwrap();
    let sink = JsonOutputHandler::new(config.output_dir.clone());

    let results = harvester
        .run_categories(&config.categories, &sink)
        .await
        .unwrap();

    let games = &results["action"];
    let names: Vec<&str> = games.iter().map(|g| g.name()).collect();
    assert_eq!(names, vec!["Neon Rider", "Cave Run"]);

    let neon = &games[0];
    let embed = format!("{}/game/neon-rider/", server.uri());
    assert!(neon.is_embeddable);
    assert_eq!(neon.iframe_src.as_deref(), Some(embed.as_str()));
    assert_eq!(
        neon.iframe_html.as_deref(),
        Some(
            format!(
                r#"<iframe src="{}" width="1280" height="720" scrolling="none" frameborder="0"></iframe>"#,
                embed
            )
            .as_str()
        )
    );
    assert_eq!(neon.summary.thumbnail, format!("{}/img/neon-rider.png", server.uri()));
    assert_eq!(neon.summary.rating, Some(4.5));
    assert_eq!(neon.summary.status, "HOT");
    assert_eq!(
        neon.description,
        "Neon Rider is a fast arcade game. Beat every level."
    );
    assert_eq!(neon.features, vec!["Twelve levels", "Online leaderboard"]);
    assert!(neon.controls.starts_with("Use the arrow keys"));
    assert_eq!(neon.category, "Action");
    assert_eq!(neon.play_count, 12_345);
    assert_eq!(neon.review_count, 2);
    assert_eq!(neon.reviews.len(), 1);
    assert_eq!(neon.reviews[0].author, "Mika");
    assert_eq!(neon.average_rating, Some(4.6));

    // 1 pause between the two listing pages, 2 between the three games
    assert_eq!(sleeper.calls(), vec![Duration::from_millis(500); 3]);

    let report = load_report(&output.path().join("action_games.json")).unwrap();
    assert_eq!(report.category, "action");
    assert_eq!(report.total_games, 2);
    assert_eq!(report.statistics.with_description, 2);
    assert_eq!(report.statistics.total_reviews, 2);
    assert_eq!(report.games[1].name(), "Cave Run");
    assert_eq!(report.games[0].iframe_src, neon.iframe_src);
}

#[tokio::test]
async fn test_listing_only_mode_skips_detail_pages() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/puzzle.games",
        format!(
            "<html><body>{}{}</body></html>",
            card("block-drop", "Block Drop", "4.0"),
            card("tile-ô", "Tile Ô", "n/a"),
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/block-drop"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        scrape_iframes: false,
        max_pages: 1,
        ..create_test_config(&server.uri(), output.path())
    };
    let harvester = Harvester::with_sleeper(config, InstantSleeper::default()).unwrap();

    let games = harvester.scrape_category("puzzle", None).await.unwrap();

    assert_eq!(games.len(), 2);
    assert!(games.iter().all(|g| !g.is_embeddable && g.iframe_src.is_none()));
    assert_eq!(games[1].summary.rating, None);
    assert_eq!(games[1].name(), "Tile Ô");
    assert!(games.iter().all(|g| g.summary.url.starts_with("http://")));
}

#[tokio::test]
async fn test_failing_game_is_excluded_not_fatal() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_html(
        &server,
        "/shooting.games",
        format!(
            "<html><body>{}{}</body></html>",
            card("broken", "Broken", "5.0"),
            card("sky-ace", "Sky Ace", "4.2"),
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_html(&server, "/sky-ace", detail_page("Sky Ace")).await;
    mount_html(
        &server,
        "/game/sky-ace/",
        "<html><body><script>gl = c.getContext('webgl2');</script></body></html>".to_string(),
    )
    .await;

    let config = Config {
        max_pages: 1,
        ..create_test_config(&server.uri(), output.path())
    };
    let sleeper = InstantSleeper::default();
    let harvester = Harvester::with_sleeper(config, sleeper.clone()).unwrap();

    let games = harvester.scrape_category("shooting", None).await.unwrap();

    assert_eq!(games.len(), 1);
    assert_eq!(games[0].name(), "Sky Ace");
    // 1s backoff for the broken detail page, 0.5s between the two games
    assert_eq!(
        sleeper.calls(),
        vec![Duration::from_secs(1), Duration::from_millis(500)]
    );
}

#[tokio::test]
async fn test_fetch_fails_twice_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_html(&server, "/flaky", "<html>finally</html>".to_string()).await;

    let config = Config::default();
    let sleeper = InstantSleeper::default();
    let fetcher = Fetcher::new(build_http_client(&config).unwrap(), sleeper.clone(), 3);

    let url = Url::parse(&format!("{}/flaky", server.uri())).unwrap();
    let body = fetcher.fetch(&url).await.into_body();

    assert_eq!(body.as_deref(), Some("<html>finally</html>"));
    assert_eq!(
        sleeper.calls(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn test_explicit_output_path() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    mount_html(
        &server,
        "/racing.games",
        format!("<html><body>{}</body></html>", card("drift", "Drift", "4.1")),
    )
    .await;

    let config = Config {
        categories: vec!["racing".to_string()],
        scrape_iframes: false,
        max_pages: 1,
        ..create_test_config(&server.uri(), output.path())
    };
    let explicit = output.path().join("exports").join("racing.json");
    let sink = JsonOutputHandler::new(config.output_dir.clone())
        .with_explicit_path(Some(explicit.clone()));
    let harvester = Harvester::with_sleeper(config.clone(), InstantSleeper::default()).unwrap();

    harvester
        .run_categories(&config.categories, &sink)
        .await
        .unwrap();

    assert!(explicit.exists());
    assert!(!output.path().join("racing_games.json").exists());
    assert_eq!(load_report(&explicit).unwrap().games[0].name(), "Drift");
}
