use serde::{Deserialize, Serialize};

/// A hotspot on an image, positioned in percent of the image box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointTag {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    pub id: i64,
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<PointTag>,
}

/// Raw ad entry as served by the ad document, before an illustration is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub cta: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub cta: String,
    pub url: String,
    pub image_src: String,
    pub image_alt: String,
}

impl AdItem {
    pub fn from_record(record: AdRecord, illustration: Illustration) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            cta: record.cta,
            url: record.url,
            image_src: illustration.url,
            image_alt: illustration.alt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Illustration {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
    pub src: String,
}

/// One entry of a composed feed. Serialized as `{"type": ..., "content": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum FeedItem {
    Image(ImageItem),
    Ad(AdItem),
}

impl FeedItem {
    pub fn id(&self) -> i64 {
        match self {
            FeedItem::Image(img) => img.id,
            FeedItem::Ad(ad) => ad.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FeedItem::Image(_) => "image",
            FeedItem::Ad(_) => "ad",
        }
    }

    /// Stable render key, unique within a segment: `image-3`, `ad-1`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.kind(), self.id())
    }

    pub fn is_ad(&self) -> bool { matches!(self, FeedItem::Ad(_)) }
}

/// Wire document for one page resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub images: Vec<ImageItem>,
    #[serde(default)]
    pub video: Option<VideoItem>,
}

/// Output of assembling one page: ordered items plus the page's banner video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentContent {
    pub items: Vec<FeedItem>,
    pub video: Option<VideoItem>,
}
