use anyhow::Result;
use async_trait::async_trait;

use crate::controller::Segment;
use crate::types::{AdRecord, Illustration, PageData};

/// Supplies the three page documents and the shared ad list.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: Segment) -> Result<PageData>;
    async fn fetch_ad_records(&self) -> Result<Vec<AdRecord>>;
}

/// Supplies `count` illustrations for a topic. Implementations never fail:
/// they fall back to a fixed image instead.
#[async_trait]
pub trait IllustrationProvider: Send + Sync {
    async fn fetch_images(&self, count: usize, topic_query: &str) -> Vec<Illustration>;
}

/// Resource name of each page document, relative to the data root.
pub fn page_document(page: Segment) -> &'static str {
    match page {
        Segment::Previous => "prev.json",
        Segment::Current => "current.json",
        Segment::Next => "next.json",
    }
}

pub const AD_DOCUMENT: &str = "advertisement.json";
