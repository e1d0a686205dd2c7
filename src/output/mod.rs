//! Output module for persisting and reporting harvest results
//!
//! This module handles:
//! - Writing one JSON report per category
//! - Reading reports back
//! - Printing report statistics

mod json;
pub mod stats;
mod traits;

pub use json::{load_report, JsonOutputHandler};
pub use stats::{format_statistics, print_statistics};
pub use traits::{
    CategoryReport, CategoryStatistics, OutputError, OutputHandler, OutputResult,
};
