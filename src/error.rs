use thiserror::Error;

use crate::controller::Segment;

/// Message shown to the user when the first page cannot be loaded.
pub const INITIAL_LOAD_MESSAGE: &str = "Failed to load feed data. Please try again later.";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("initial feed load failed: {0}")]
    InitialLoad(#[source] Box<FeedError>),

    #[error("failed to fetch {page} page: {source}")]
    PageFetch {
        page: Segment,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to fetch advertisements: {0}")]
    AdFetch(#[source] anyhow::Error),

    #[error("failed to fetch ad illustrations: {0}")]
    Illustration(#[source] anyhow::Error),

    #[error("feed view was torn down before the fetch finished")]
    Cancelled,
}

impl FeedError {
    pub fn page(page: Segment, source: impl Into<anyhow::Error>) -> Self {
        FeedError::PageFetch { page, source: source.into() }
    }

    /// Text suitable for showing to the user. Only the initial load surfaces one.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            FeedError::InitialLoad(_) => Some(INITIAL_LOAD_MESSAGE),
            _ => None,
        }
    }
}

pub type FeedResult<T> = std::result::Result<T, FeedError>;
