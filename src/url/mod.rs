//! URL handling module for Embed-Scout
//!
//! This module provides href resolution, host comparison and construction
//! of the site's listing and embed URLs.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::{extract_domain, is_same_site};
pub use resolve::{embed_url, last_path_segment, listing_url, parse_site_url, resolve_url};
