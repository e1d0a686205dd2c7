//! Crawler module for page fetching and extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with retry logic
//! - Listing, detail and embed page extraction
//! - Request pacing
//! - Per-category orchestration

mod detail;
mod embed;
mod fetcher;
mod listing;
mod pipeline;
mod text;
mod throttle;

pub use detail::{extract_detail, resolve_first, Strategy};
pub use embed::{classify, decide, detect_signals, EmbedSignals};
pub use fetcher::{backoff_delay, build_http_client, FetchResult, Fetcher};
pub use listing::{extract_listing, extract_thumbnail};
pub use pipeline::{top_rated, CategoryPipeline, Harvester};
pub use text::{char_len, stripped_text, truncate_chars};
pub use throttle::{Sleeper, Throttle, TokioSleeper};
