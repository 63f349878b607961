use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::controller::Segment;
use crate::source::{page_document, PageSource, AD_DOCUMENT};
use crate::types::{AdRecord, PageData};

/// Fetches page documents served as static JSON under a base URL.
pub struct HttpPageSource {
    base: Url,
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url).with_context(|| format!("invalid data URL: {base_url}"))?;
        // join() drops the last path segment unless the base ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .user_agent("mosaic/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self { base, client })
    }

    pub fn document_url(&self, name: &str) -> Result<Url> {
        self.base.join(name).map_err(|e| anyhow!("cannot resolve {name} against {}: {e}", self.base))
    }

    async fn get_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let url = self.document_url(name)?;
        let resp = self.client.get(url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("GET {url} returned {}", resp.status()));
        }
        resp.json::<T>().await.with_context(|| format!("invalid JSON from {url}"))
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page: Segment) -> Result<PageData> {
        self.get_json(page_document(page)).await
    }

    async fn fetch_ad_records(&self) -> Result<Vec<AdRecord>> {
        self.get_json(AD_DOCUMENT).await
    }
}
