//! Pipeline state definitions for tracking a category run
//!
//! This module defines the states a category pipeline moves through and
//! which moves between them are legal.
use std::fmt;

/// Represents the current phase of a category pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Pages have been planned but none fetched yet
    PendingPages,

    /// Listing pages are being fetched and parsed
    FetchingListing,

    /// Detail and embed pages are being fetched for each summary
    FetchingDetails,

    /// The run is finished
    Done,
}

impl PipelineState {
    /// Returns true if no further work happens in this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is legal
    ///
    /// `FetchingListing -> FetchingListing` covers advancing to the next page.
    /// `PendingPages -> Done` and `FetchingListing -> Done` are the early exits
    /// taken when no listing page yields a summary or details are disabled.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        matches!(
            (self, next),
            (Self::PendingPages, Self::FetchingListing)
                | (Self::PendingPages, Self::Done)
                | (Self::FetchingListing, Self::FetchingListing)
                | (Self::FetchingListing, Self::FetchingDetails)
                | (Self::FetchingListing, Self::Done)
                | (Self::FetchingDetails, Self::Done)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPages => "pending_pages",
            Self::FetchingListing => "fetching_listing",
            Self::FetchingDetails => "fetching_details",
            Self::Done => "done",
        }
    }

    /// Returns all possible pipeline states
    pub fn all_states() -> [Self; 4] {
        [
            Self::PendingPages,
            Self::FetchingListing,
            Self::FetchingDetails,
            Self::Done,
        ]
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
