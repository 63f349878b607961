//! Input recognisers that decide when the feed should page.
//!
//! [`PullGesture`] turns a touch sequence into a backward (refresh) trigger and
//! [`ProximitySentinel`] turns scroll positions into a forward (load more)
//! trigger. Both are plain state machines fed with coordinates by the host.

/// Whether the host can deliver touch events. Decided by capability, not user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchSupport {
    Available,
    Unavailable,
}

/// Pulled distance is half the finger travel.
const PULL_DAMPING: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRelease {
    /// No pull was in progress.
    Ignored,
    /// Released before reaching the threshold.
    Cancelled,
    /// Threshold reached; the caller should refresh and then call `finish_refresh`.
    Refresh,
}

#[derive(Debug, Clone)]
pub struct PullGesture {
    enabled: bool,
    threshold: f64,
    max_pull: f64,
    start_y: Option<f64>,
    pulling: bool,
    refreshing: bool,
    distance: f64,
}

impl PullGesture {
    pub fn new(touch: TouchSupport, threshold: f64, max_pull: f64) -> Self {
        Self {
            enabled: touch == TouchSupport::Available,
            threshold,
            max_pull: max_pull.max(threshold),
            start_y: None,
            pulling: false,
            refreshing: false,
            distance: 0.0,
        }
    }

    pub fn is_enabled(&self) -> bool { self.enabled }
    pub fn is_pulling(&self) -> bool { self.pulling }
    pub fn is_refreshing(&self) -> bool { self.refreshing }
    pub fn distance(&self) -> f64 { self.distance }

    pub fn progress(&self) -> f64 {
        if self.threshold <= 0.0 {
            return 1.0;
        }
        (self.distance / self.threshold).min(1.0)
    }

    /// Arms the gesture only when the page is scrolled to the very top.
    pub fn touch_start(&mut self, y: f64, scroll_top: f64) {
        if !self.enabled {
            return;
        }
        self.start_y = (scroll_top <= 0.0).then_some(y);
    }

    /// Returns the damped pull distance while a downward pull is in progress.
    pub fn touch_move(&mut self, y: f64) -> Option<f64> {
        if self.refreshing {
            return None;
        }
        let start = self.start_y?;
        let diff = y - start;
        if diff <= 0.0 {
            return None;
        }
        self.pulling = true;
        self.distance = (diff * PULL_DAMPING).min(self.max_pull);
        Some(self.distance)
    }

    pub fn touch_end(&mut self) -> PullRelease {
        if !self.pulling {
            self.start_y = None;
            return PullRelease::Ignored;
        }
        let fire = self.distance >= self.threshold && !self.refreshing;
        self.pulling = false;
        self.distance = 0.0;
        self.start_y = None;
        if fire {
            self.refreshing = true;
            PullRelease::Refresh
        } else {
            PullRelease::Cancelled
        }
    }

    pub fn finish_refresh(&mut self) { self.refreshing = false; }
}

/// Edge-triggered "sentinel entered the viewport" detector. `root_margin`
/// extends the viewport downwards so loading starts before the end is visible.
#[derive(Debug, Clone)]
pub struct ProximitySentinel {
    root_margin: f64,
    inside: bool,
}

impl ProximitySentinel {
    pub fn new(root_margin: f64) -> Self { Self { root_margin: root_margin.max(0.0), inside: false } }

    /// Feed the current viewport bottom and the sentinel's top offset (same
    /// coordinate space). True only on the outside-to-inside transition.
    pub fn observe(&mut self, viewport_bottom: f64, sentinel_top: f64) -> bool {
        let now_inside = sentinel_top <= viewport_bottom + self.root_margin;
        let entered = now_inside && !self.inside;
        self.inside = now_inside;
        entered
    }

    pub fn is_inside(&self) -> bool { self.inside }
}
