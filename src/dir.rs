use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::controller::Segment;
use crate::source::{page_document, PageSource, AD_DOCUMENT};
use crate::types::{AdRecord, PageData};

/// Reads page documents from a local directory laid out like the served data root.
#[derive(Debug, Clone)]
pub struct DirPageSource {
    root: PathBuf,
}

impl DirPageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.root.join(name);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("invalid JSON in {}", path.display()))
    }
}

#[async_trait]
impl PageSource for DirPageSource {
    async fn fetch_page(&self, page: Segment) -> Result<PageData> {
        self.read_json(page_document(page)).await
    }

    async fn fetch_ad_records(&self) -> Result<Vec<AdRecord>> {
        self.read_json(AD_DOCUMENT).await
    }
}
