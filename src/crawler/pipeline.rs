//! Category pipeline - main harvest orchestration logic
//!
//! This module drives the whole run, strictly sequentially:
//! - Paginating a category's listing pages
//! - Enriching each game with its detail page and embed page
//! - Dropping games that cannot be embedded
//! - Handing each finished category to the output layer
//!
//! Every outbound request is separated from the previous one by the
//! configured rate limit, applied through a [`Throttle`].

use crate::config::Config;
use crate::crawler::detail::extract_detail;
use crate::crawler::embed::classify;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::listing::extract_listing;
use crate::crawler::throttle::{Sleeper, Throttle, TokioSleeper};
use crate::model::{GameDetail, GameSummary};
use crate::output::OutputHandler;
use crate::state::PipelineState;
use crate::url::{embed_url, listing_url, parse_site_url};
use crate::ScrapeError;
use std::collections::BTreeMap;
use url::Url;

/// Owns the per-run collaborators shared by every category
pub struct Harvester<S = TokioSleeper> {
    config: Config,
    base_url: Url,
    fetcher: Fetcher<S>,
    throttle: Throttle<S>,
    top: Option<usize>,
}

impl Harvester<TokioSleeper> {
    /// Creates a harvester that waits on the tokio timer
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(ScrapeError)` - Bad base URL or HTTP client failure
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<S: Sleeper + Clone> Harvester<S> {
    /// Creates a harvester whose waits go through `sleeper`
    pub fn with_sleeper(config: Config, sleeper: S) -> Result<Self, ScrapeError> {
        let base_url = parse_site_url(&config.base_url)?;
        let client = build_http_client(&config)?;
        let fetcher = Fetcher::new(client, sleeper.clone(), config.retry_attempts);
        let throttle = Throttle::new(sleeper, config.rate_limit());

        Ok(Self {
            config,
            base_url,
            fetcher,
            throttle,
            top: None,
        })
    }

    /// Keeps only the `n` best-rated games of each category written by
    /// [`Harvester::run_categories`], however many categories it is given
    pub fn with_top(mut self, n: Option<usize>) -> Self {
        self.top = n;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Starts a pipeline for one category
    pub fn pipeline(&self, category: &str) -> CategoryPipeline<'_, S> {
        CategoryPipeline {
            harvester: self,
            category: category.to_string(),
            state: PipelineState::PendingPages,
        }
    }

    /// Scrapes one category
    ///
    /// # Arguments
    ///
    /// * `category` - Category slug, e.g. `action`
    /// * `max_pages` - Listing pages to fetch; the configured value when `None`
    ///
    /// # Returns
    ///
    /// Embeddable games when details are enabled, otherwise every listed
    /// game with default detail fields.
    pub async fn scrape_category(
        &self,
        category: &str,
        max_pages: Option<u32>,
    ) -> Result<Vec<GameDetail>, ScrapeError> {
        self.pipeline(category).run(max_pages).await
    }

    /// Runs every category in order, writing each one as soon as it completes
    ///
    /// # Arguments
    ///
    /// * `categories` - Category slugs, processed in the given order
    /// * `sink` - Receives each category's games before the next one starts
    ///
    /// # Returns
    ///
    /// Category name to the games written for it
    pub async fn run_categories(
        &self,
        categories: &[String],
        sink: &dyn OutputHandler,
    ) -> Result<BTreeMap<String, Vec<GameDetail>>, ScrapeError> {
        let mut results = BTreeMap::new();
        let total = categories.len();

        for (index, category) in categories.iter().enumerate() {
            tracing::info!("[{}/{}] Category: {}", index + 1, total, category);

            let mut games = self.scrape_category(category, None).await?;
            if let Some(n) = self.top {
                games = top_rated(&games, n);
            }

            let path = sink.write_category(category, &games)?;
            tracing::info!(
                "Saved {} games for '{}' to {}",
                games.len(),
                category,
                path.display()
            );
            results.insert(category.clone(), games);

            self.throttle.pause_between(index, total).await;
        }

        Ok(results)
    }
}

/// One category's walk through `PendingPages -> FetchingListing -> FetchingDetails -> Done`
pub struct CategoryPipeline<'h, S> {
    harvester: &'h Harvester<S>,
    category: String,
    state: PipelineState,
}

impl<'h, S: Sleeper + Clone> CategoryPipeline<'h, S> {
    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    fn transition(&mut self, to: PipelineState) -> Result<(), ScrapeError> {
        if !self.state.can_transition_to(to) {
            return Err(ScrapeError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::trace!("Pipeline '{}': {} -> {}", self.category, self.state, to);
        self.state = to;
        Ok(())
    }

    /// Runs the pipeline to completion
    pub async fn run(mut self, max_pages: Option<u32>) -> Result<Vec<GameDetail>, ScrapeError> {
        let pages = max_pages.unwrap_or(self.harvester.config.max_pages);
        tracing::info!("Scraping category '{}' ({} pages)", self.category, pages);

        let summaries = self.fetch_listings(pages).await?;
        tracing::info!(
            "Found {} games in category '{}'",
            summaries.len(),
            self.category
        );

        if summaries.is_empty() || !self.harvester.config.scrape_iframes {
            self.transition(PipelineState::Done)?;
            return Ok(summaries.into_iter().map(GameDetail::from).collect());
        }

        self.transition(PipelineState::FetchingDetails)?;
        let games = self.fetch_details(summaries).await;
        self.transition(PipelineState::Done)?;

        Ok(games)
    }

    /// Fetches listing pages `1..=pages`; a failed page contributes nothing
    async fn fetch_listings(&mut self, pages: u32) -> Result<Vec<GameSummary>, ScrapeError> {
        let harvester = self.harvester;
        let total = pages as usize;
        let mut summaries = Vec::new();

        for (index, page) in (1..=pages).enumerate() {
            self.transition(PipelineState::FetchingListing)?;

            let url = listing_url(
                &harvester.base_url,
                &self.category,
                page,
                harvester.config.games_per_page,
            )?;
            tracing::info!("Fetching page {}: {}", page, url);

            match harvester.fetcher.fetch(&url).await.into_body() {
                Some(body) => {
                    let games = extract_listing(&body, &harvester.base_url);
                    tracing::info!("Found {} games on page {}", games.len(), page);
                    summaries.extend(games);
                }
                None => tracing::warn!("Skipping page {} of '{}'", page, self.category),
            }

            harvester.throttle.pause_between(index, total).await;
        }

        Ok(summaries)
    }

    /// Enriches every game and keeps only the embeddable ones
    async fn fetch_details(&mut self, summaries: Vec<GameSummary>) -> Vec<GameDetail> {
        let total = summaries.len();
        let mut embeddable = Vec::new();
        let mut rejected = 0usize;

        for (index, summary) in summaries.into_iter().enumerate() {
            let name = summary.name.clone();
            tracing::info!("[{}/{}] Processing: {}", index + 1, total, name);

            match self.process_game(summary).await {
                Ok(game) if game.is_embeddable => {
                    tracing::info!("Embeddable: {}", game.name());
                    embeddable.push(game);
                }
                Ok(game) => {
                    tracing::warn!("Not embeddable: {}", game.name());
                    rejected += 1;
                }
                Err(e) => {
                    tracing::error!("Error processing game {}: {}", name, e);
                    rejected += 1;
                }
            }

            self.harvester.throttle.pause_between(index, total).await;
        }

        tracing::info!(
            "Category '{}': {} embeddable, {} rejected",
            self.category,
            embeddable.len(),
            rejected
        );
        embeddable
    }

    /// Merges one game's detail page and embed verdict into its summary
    ///
    /// A game whose detail page cannot be fetched is not classified and
    /// stays non-embeddable; so does one whose embed page cannot be fetched.
    pub async fn process_game(&self, summary: GameSummary) -> Result<GameDetail, ScrapeError> {
        let harvester = self.harvester;
        let detail_url = Url::parse(&summary.url)?;
        let mut game = GameDetail::from(summary);

        let Some(detail_html) = harvester.fetcher.fetch(&detail_url).await.into_body() else {
            tracing::warn!("No detail page for {}", game.name());
            return Ok(game);
        };
        game.apply_details(extract_detail(&detail_html));

        let embed = embed_url(&harvester.base_url, &detail_url)?;
        tracing::debug!("Checking embed page {}", embed);

        match harvester.fetcher.fetch(&embed).await.into_body() {
            Some(embed_html) => {
                game.apply_embeddability(classify(&embed_html, &embed, &harvester.base_url));
            }
            None => tracing::warn!("No embed page for {}", game.name()),
        }

        Ok(game)
    }
}

/// Best-rated games first; absent ratings rank as 0 and ties keep their order
pub fn top_rated(games: &[GameDetail], n: usize) -> Vec<GameDetail> {
    let mut ranked = games.to_vec();
    ranked.sort_by(|a, b| {
        let a = a.summary.rating.unwrap_or(0.0);
        let b = b.summary.rating.unwrap_or(0.0);
        b.total_cmp(&a)
    });
    ranked.truncate(n);
    ranked
}
