pub mod assembler;
pub mod config;
pub mod controller;
pub mod dir;
pub mod error;
pub mod http;
pub mod placement;
pub mod source;
pub mod triggers;
pub mod types;
pub mod unsplash;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::controller::{FeedState, FeedStatus, FeedView, RenderBlock, Segment, SegmentPhase};
    pub use crate::error::{FeedError, FeedResult};
    pub use crate::triggers::{ProximitySentinel, PullGesture, PullRelease, TouchSupport};
    pub use crate::types::{AdItem, FeedItem, ImageItem, PointTag, SegmentContent, VideoItem};
    pub use crate::{config::FeedConfig, Mosaic};
}

use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::assembler::FeedAssembler;
use crate::config::FeedConfig;
use crate::controller::FeedView;
use crate::dir::DirPageSource;
use crate::http::HttpPageSource;
use crate::source::{IllustrationProvider, PageSource};
use crate::unsplash::UnsplashProvider;

/// Library entry point. Owns the assembler shared by every feed view it opens.
pub struct Mosaic {
    assembler: Arc<FeedAssembler>,
    config: FeedConfig,
}

impl Mosaic {
    /// Wire up sources from config: `data_location` is either an http(s) base
    /// URL or a local directory; the illustration provider uses the Unsplash
    /// key when one is configured.
    pub fn from_config(config: FeedConfig) -> Result<Self> {
        let location = config
            .data_location
            .clone()
            .ok_or_else(|| anyhow!("no data location configured (set MOSAIC_DATA_URL or data_location)"))?;
        let pages: Arc<dyn PageSource> = if location.starts_with("http://") || location.starts_with("https://") {
            Arc::new(HttpPageSource::new(&location, config.request_timeout())?)
        } else {
            Arc::new(DirPageSource::new(Path::new(&location)))
        };
        let illustrations = UnsplashProvider::new(config.unsplash_access_key.clone(), config.request_timeout())?;
        if !illustrations.has_credentials() {
            info!("UNSPLASH_ACCESS_KEY not set, ads will use the fallback illustration");
        }
        Ok(Self::with_sources(pages, Arc::new(illustrations), config))
    }

    pub fn with_sources(pages: Arc<dyn PageSource>, illustrations: Arc<dyn IllustrationProvider>, config: FeedConfig) -> Self {
        let assembler = Arc::new(FeedAssembler::new(pages, illustrations, config.ad_topic_query.clone()));
        Self { assembler, config }
    }

    pub fn config(&self) -> &FeedConfig { &self.config }

    pub fn assembler(&self) -> &Arc<FeedAssembler> { &self.assembler }

    /// A fresh, unmounted view. Call `mount` on it to fetch the current page.
    pub fn open_view(&self) -> FeedView { FeedView::new(self.assembler.clone()) }
}
