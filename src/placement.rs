//! Deterministic ad interleaving.
//!
//! Ads are injected before images sitting on Fibonacci positions (1, 2, 3, 5,
//! 8, ...). Consecutive positions collapse into one slot that takes as many
//! ads as the run is long, so the head of a page gets a short burst of ads
//! and the rest thin out.

use std::collections::HashMap;

use crate::types::{AdItem, FeedItem, ImageItem};

/// Fibonacci terms seeded with `1, 2`, stopping before the first term `>= limit`.
pub fn fibonacci_anchors(limit: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let (mut a, mut b) = (1usize, 2usize);
    while a < limit {
        out.push(a);
        let next = a + b;
        a = b;
        b = next;
    }
    out
}

/// Split a sorted index list into maximal runs of consecutive integers.
pub fn group_consecutive(indices: &[usize]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &idx in indices {
        match groups.last_mut() {
            Some(g) if g.last().map(|&l| l + 1) == Some(idx) => g.push(idx),
            _ => groups.push(vec![idx]),
        }
    }
    groups
}

/// Interleave `ads` into `images`. Images keep their order and are never
/// dropped; ads are consumed front to back and surplus slots stay empty.
pub fn place_ads(images: &[ImageItem], ads: &[AdItem]) -> Vec<FeedItem> {
    let slots: HashMap<usize, usize> = group_consecutive(&fibonacci_anchors(images.len()))
        .into_iter()
        .filter_map(|g| g.first().map(|&start| (start, g.len())))
        .collect();

    let mut out = Vec::with_capacity(images.len() + ads.len());
    let mut remaining = ads.iter();
    for (i, image) in images.iter().enumerate() {
        if let Some(&count) = slots.get(&i) {
            out.extend(remaining.by_ref().take(count).cloned().map(FeedItem::Ad));
        }
        out.push(FeedItem::Image(image.clone()));
    }
    out
}
