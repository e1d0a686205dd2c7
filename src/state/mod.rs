//! State module for tracking pipeline progress
//!
//! A category run moves `PendingPages -> FetchingListing -> FetchingDetails -> Done`,
//! with early exits straight to `Done`.

mod pipeline_state;

pub use pipeline_state::PipelineState;
