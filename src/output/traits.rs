//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! per-category report they persist.

use crate::model::GameDetail;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Detail coverage counters for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStatistics {
    /// Games with a non-empty description
    pub with_description: usize,

    /// Games with at least one feature
    pub with_features: usize,

    /// Games with at least one kept review
    pub with_reviews: usize,

    /// Kept reviews across all games
    pub total_reviews: usize,
}

impl CategoryStatistics {
    /// Counts detail coverage over `games`
    pub fn from_games(games: &[GameDetail]) -> Self {
        games.iter().fold(Self::default(), |mut stats, game| {
            if !game.description.is_empty() {
                stats.with_description += 1;
            }
            if !game.features.is_empty() {
                stats.with_features += 1;
            }
            if !game.reviews.is_empty() {
                stats.with_reviews += 1;
            }
            stats.total_reviews += game.reviews.len();
            stats
        })
    }
}

/// Everything persisted for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: String,
    pub total_games: usize,

    /// ISO-8601 local time the report was built
    pub scraped_at: String,

    #[serde(default)]
    pub statistics: CategoryStatistics,

    pub games: Vec<GameDetail>,
}

impl CategoryReport {
    /// Builds a report stamped with the current local time
    pub fn new(category: &str, games: Vec<GameDetail>) -> Self {
        Self {
            category: category.to_string(),
            total_games: games.len(),
            scraped_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            statistics: CategoryStatistics::from_games(&games),
            games,
        }
    }
}

/// Trait for output handlers
///
/// The harvester calls the handler once per finished category, before
/// starting the next one.
pub trait OutputHandler {
    /// Persists one category's games
    ///
    /// # Arguments
    ///
    /// * `category` - The category slug
    /// * `games` - The games kept for that category
    ///
    /// # Returns
    ///
    /// Where the category was written
    fn write_category(&self, category: &str, games: &[GameDetail]) -> OutputResult<PathBuf>;
}
