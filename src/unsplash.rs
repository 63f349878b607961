use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::source::IllustrationProvider;
use crate::types::Illustration;

pub const FALLBACK_IMAGE_URL: &str = "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=800";
pub const FALLBACK_IMAGE_ALT: &str = "Fallback image from Unsplash";
pub const DEFAULT_API_BASE: &str = "https://api.unsplash.com";

pub fn fallback_illustrations(count: usize) -> Vec<Illustration> {
    vec![Illustration { url: FALLBACK_IMAGE_URL.to_string(), alt: FALLBACK_IMAGE_ALT.to_string() }; count]
}

/// Provider that always answers with the fallback image.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackIllustrations;

#[async_trait]
impl IllustrationProvider for FallbackIllustrations {
    async fn fetch_images(&self, count: usize, _topic_query: &str) -> Vec<Illustration> {
        fallback_illustrations(count)
    }
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
    alt_description: Option<String>,
    description: Option<String>,
}

impl From<Photo> for Illustration {
    fn from(p: Photo) -> Self {
        let alt = p
            .alt_description
            .or(p.description)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Image from Unsplash".to_string());
        Illustration { url: p.urls.regular, alt }
    }
}

/// Random-photo client. Without an access key every call degrades to the fallback image.
pub struct UnsplashProvider {
    access_key: Option<String>,
    api_base: String,
    orientation: String,
    client: reqwest::Client,
}

impl UnsplashProvider {
    pub fn new(access_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("mosaic/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            access_key: access_key.filter(|k| !k.trim().is_empty()),
            api_base: DEFAULT_API_BASE.to_string(),
            orientation: "landscape".to_string(),
            client,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn has_credentials(&self) -> bool { self.access_key.is_some() }

    async fn fetch_random(&self, key: &str, count: usize, topic_query: &str) -> Result<Vec<Illustration>> {
        let url = format!("{}/photos/random", self.api_base.trim_end_matches('/'));
        let mut params = vec![("count", count.to_string()), ("orientation", self.orientation.clone())];
        if !topic_query.is_empty() {
            params.push(("query", topic_query.to_string()));
        }
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Client-ID {key}"))
            .query(&params)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("Unsplash API error: {}", resp.status()));
        }
        let photos: Vec<Photo> = resp.json().await?;
        if photos.len() != count {
            return Err(anyhow!("Unsplash returned {} photos, expected {count}", photos.len()));
        }
        Ok(photos.into_iter().map(Illustration::from).collect())
    }
}

#[async_trait]
impl IllustrationProvider for UnsplashProvider {
    async fn fetch_images(&self, count: usize, topic_query: &str) -> Vec<Illustration> {
        if count == 0 {
            return Vec::new();
        }
        let Some(key) = self.access_key.as_deref() else {
            debug!("no Unsplash access key, using fallback illustrations");
            return fallback_illustrations(count);
        };
        match self.fetch_random(key, count, topic_query).await {
            Ok(images) => images,
            Err(e) => {
                warn!("illustration fetch failed, using fallback: {e:#}");
                fallback_illustrations(count)
            }
        }
    }
}
