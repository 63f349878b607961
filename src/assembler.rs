use anyhow::anyhow;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::controller::Segment;
use crate::error::{FeedError, FeedResult};
use crate::placement::place_ads;
use crate::source::{IllustrationProvider, PageSource};
use crate::types::{AdItem, SegmentContent};

/// Composes one segment: page images and video fetched alongside the ad list,
/// then merged by the placement engine.
pub struct FeedAssembler {
    pages: Arc<dyn PageSource>,
    illustrations: Arc<dyn IllustrationProvider>,
    topic_query: String,
}

impl FeedAssembler {
    pub fn new(pages: Arc<dyn PageSource>, illustrations: Arc<dyn IllustrationProvider>, topic_query: impl Into<String>) -> Self {
        Self { pages, illustrations, topic_query: topic_query.into() }
    }

    pub fn topic_query(&self) -> &str { &self.topic_query }

    /// Ad records joined index-wise with freshly fetched illustrations.
    pub async fn try_load_ads(&self) -> FeedResult<Vec<AdItem>> {
        let records = self.pages.fetch_ad_records().await.map_err(FeedError::AdFetch)?;
        let images = self.illustrations.fetch_images(records.len(), &self.topic_query).await;
        if images.len() != records.len() {
            return Err(FeedError::Illustration(anyhow!(
                "got {} illustrations for {} ads",
                images.len(),
                records.len()
            )));
        }
        Ok(records.into_iter().zip(images).map(|(r, i)| AdItem::from_record(r, i)).collect())
    }

    /// Like `try_load_ads`, but any failure degrades to no ads.
    pub async fn load_ads(&self) -> Vec<AdItem> {
        match self.try_load_ads().await {
            Ok(ads) => ads,
            Err(e) => {
                warn!("{e}; rendering without ads");
                Vec::new()
            }
        }
    }

    pub async fn assemble_segment(&self, page: Segment) -> FeedResult<SegmentContent> {
        let (page_data, ads) = futures::future::join(self.pages.fetch_page(page), self.load_ads()).await;
        let data = page_data.map_err(|e| FeedError::page(page, e))?;
        let items = place_ads(&data.images, &ads);
        debug!(%page, images = data.images.len(), ads = items.len() - data.images.len(), "assembled segment");
        Ok(SegmentContent { items, video: data.video })
    }

    /// Page failures become an empty segment with no video.
    pub async fn assemble_segment_or_empty(&self, page: Segment) -> SegmentContent {
        match self.assemble_segment(page).await {
            Ok(content) => content,
            Err(e) => {
                warn!("{e}");
                SegmentContent::default()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{AdRecord, Illustration, ImageItem, PageData, VideoItem};
    use crate::unsplash::{FallbackIllustrations, FALLBACK_IMAGE_URL};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn page_of(first_id: i64, n: usize) -> PageData {
        PageData {
            images: (0..n as i64)
                .map(|i| ImageItem {
                    id: first_id + i,
                    src: format!("https://img/{}", first_id + i),
                    alt: String::new(),
                    title: None,
                    description: None,
                    tags: Vec::new(),
                })
                .collect(),
            video: Some(VideoItem { src: format!("https://vid/{first_id}.mp4") }),
        }
    }

    pub(crate) fn ad_records(n: usize) -> Vec<AdRecord> {
        (0..n as i64)
            .map(|i| AdRecord {
                id: i + 1,
                title: format!("Ad {i}"),
                description: String::new(),
                cta: "Shop now".into(),
                url: format!("https://shop/{i}"),
            })
            .collect()
    }

    struct StaticSource {
        page: Option<PageData>,
        ads: Option<Vec<AdRecord>>,
        ad_calls: AtomicUsize,
    }

    #[async_trait]
    impl PageSource for StaticSource {
        async fn fetch_page(&self, _page: Segment) -> Result<PageData> {
            self.page.clone().ok_or_else(|| anyhow!("404"))
        }
        async fn fetch_ad_records(&self) -> Result<Vec<AdRecord>> {
            self.ad_calls.fetch_add(1, Ordering::SeqCst);
            self.ads.clone().ok_or_else(|| anyhow!("ads offline"))
        }
    }

    struct ShortIllustrations;

    #[async_trait]
    impl IllustrationProvider for ShortIllustrations {
        async fn fetch_images(&self, count: usize, _q: &str) -> Vec<Illustration> {
            vec![Illustration { url: "u".into(), alt: "a".into() }; count.saturating_sub(1)]
        }
    }

    struct RecordingIllustrations(std::sync::Mutex<Vec<(usize, String)>>);

    #[async_trait]
    impl IllustrationProvider for RecordingIllustrations {
        async fn fetch_images(&self, count: usize, q: &str) -> Vec<Illustration> {
            self.0.lock().unwrap().push((count, q.to_string()));
            (0..count).map(|i| Illustration { url: format!("https://ill/{i}"), alt: format!("alt {i}") }).collect()
        }
    }

    fn assembler(page: Option<PageData>, ads: Option<Vec<AdRecord>>, ill: Arc<dyn IllustrationProvider>) -> FeedAssembler {
        let src = StaticSource { page, ads, ad_calls: AtomicUsize::new(0) };
        FeedAssembler::new(Arc::new(src), ill, "furniture,interior,home")
    }

    #[tokio::test]
    async fn merges_images_with_illustrated_ads() {
        let ill = Arc::new(RecordingIllustrations(Default::default()));
        let a = assembler(Some(page_of(1, 6)), Some(ad_records(5)), ill.clone());
        let seg = a.assemble_segment(Segment::Current).await.unwrap();
        assert_eq!(seg.items.len(), 10);
        assert_eq!(seg.video.unwrap().src, "https://vid/1.mp4");
        match &seg.items[1] {
            crate::types::FeedItem::Ad(ad) => {
                assert_eq!(ad.id, 1);
                assert_eq!(ad.image_src, "https://ill/0");
            }
            other => panic!("expected ad, got {other:?}"),
        }
        assert_eq!(ill.0.lock().unwrap().as_slice(), &[(5, "furniture,interior,home".to_string())]);
    }

    #[tokio::test]
    async fn ad_failure_renders_images_only() {
        let a = assembler(Some(page_of(1, 6)), None, Arc::new(FallbackIllustrations));
        let seg = a.assemble_segment(Segment::Next).await.unwrap();
        assert_eq!(seg.items.len(), 6);
        assert!(seg.items.iter().all(|i| !i.is_ad()));
    }

    #[tokio::test]
    async fn illustration_mismatch_drops_ads() {
        let a = assembler(Some(page_of(1, 6)), Some(ad_records(3)), Arc::new(ShortIllustrations));
        assert!(matches!(a.try_load_ads().await, Err(FeedError::Illustration(_))));
        let seg = a.assemble_segment(Segment::Current).await.unwrap();
        assert_eq!(seg.items.len(), 6);
    }

    #[tokio::test]
    async fn fallback_illustrations_keep_ads() {
        let a = assembler(Some(page_of(1, 4)), Some(ad_records(2)), Arc::new(FallbackIllustrations));
        let ads = a.load_ads().await;
        assert_eq!(ads.len(), 2);
        assert!(ads.iter().all(|ad| ad.image_src == FALLBACK_IMAGE_URL));
    }

    #[tokio::test]
    async fn page_failure_is_typed_and_degradable() {
        let a = assembler(None, Some(ad_records(2)), Arc::new(FallbackIllustrations));
        let err = a.assemble_segment(Segment::Previous).await.unwrap_err();
        assert!(matches!(err, FeedError::PageFetch { page: Segment::Previous, .. }));
        assert_eq!(a.assemble_segment_or_empty(Segment::Previous).await, SegmentContent::default());
    }
}
