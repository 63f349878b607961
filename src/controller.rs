//! Pagination state for a feed view.
//!
//! [`FeedState`] is the pure part: three segments with their own phase and a
//! global status, changed only through `begin_fetch` / `complete`.
//! [`FeedView`] drives it from async fetches and makes sure each segment is
//! fetched at most once for the lifetime of the view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::assembler::FeedAssembler;
use crate::error::{FeedError, FeedResult, INITIAL_LOAD_MESSAGE};
use crate::types::{FeedItem, SegmentContent, VideoItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Previous,
    Current,
    Next,
}

impl Segment {
    /// Render order.
    pub const ALL: [Segment; 3] = [Segment::Previous, Segment::Current, Segment::Next];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Previous => "previous",
            Segment::Current => "current",
            Segment::Next => "next",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentPhase {
    #[default]
    Idle,
    Fetching,
    Loaded,
}

#[derive(Debug, Clone, Default)]
pub struct SegmentState {
    pub phase: SegmentPhase,
    pub content: SegmentContent,
    /// Set when the fetch failed and the segment was loaded empty.
    pub failed: bool,
}

impl SegmentState {
    pub fn is_loaded(&self) -> bool { self.phase == SegmentPhase::Loaded }
    pub fn is_fetching(&self) -> bool { self.phase == SegmentPhase::Fetching }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Initializing,
    Ready,
    /// Initial load failed; carries the user-facing message.
    Error(String),
}

/// One contiguous element of the rendered feed.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderBlock {
    Segment {
        segment: Segment,
        items: Vec<FeedItem>,
        video: Option<VideoItem>,
    },
    LoadingIndicator,
}

impl RenderBlock {
    pub fn segment(&self) -> Option<Segment> {
        match self {
            RenderBlock::Segment { segment, .. } => Some(*segment),
            RenderBlock::LoadingIndicator => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedState {
    previous: SegmentState,
    current: SegmentState,
    next: SegmentState,
    status: FeedStatus,
}

impl FeedState {
    pub fn new() -> Self { Self::default() }

    pub fn status(&self) -> &FeedStatus { &self.status }

    pub fn segment(&self, segment: Segment) -> &SegmentState {
        match segment {
            Segment::Previous => &self.previous,
            Segment::Current => &self.current,
            Segment::Next => &self.next,
        }
    }

    fn segment_mut(&mut self, segment: Segment) -> &mut SegmentState {
        match segment {
            Segment::Previous => &mut self.previous,
            Segment::Current => &mut self.current,
            Segment::Next => &mut self.next,
        }
    }

    pub fn any_fetching(&self) -> bool { Segment::ALL.iter().any(|&s| self.segment(s).is_fetching()) }

    /// Idle -> Fetching. Returns false (and changes nothing) when the segment
    /// is already in flight or loaded, or when paging is requested before the
    /// current segment is ready.
    pub fn begin_fetch(&mut self, segment: Segment) -> bool {
        if segment != Segment::Current && self.status != FeedStatus::Ready {
            return false;
        }
        let state = self.segment_mut(segment);
        if state.phase != SegmentPhase::Idle {
            return false;
        }
        state.phase = SegmentPhase::Fetching;
        true
    }

    /// Fetching -> Loaded. A failure still ends in Loaded (empty) so the
    /// segment is never fetched again; only a failed current segment is
    /// returned to the caller, as an initial load failure. Completions for a
    /// segment that is not in flight are ignored.
    pub fn complete(&mut self, segment: Segment, result: FeedResult<SegmentContent>) -> FeedResult<()> {
        let state = self.segment_mut(segment);
        if state.phase != SegmentPhase::Fetching {
            debug!(%segment, "ignoring completion for segment not in flight");
            return Ok(());
        }
        state.phase = SegmentPhase::Loaded;
        match result {
            Ok(content) => {
                state.content = content;
                state.failed = false;
                if segment == Segment::Current {
                    self.status = FeedStatus::Ready;
                }
                Ok(())
            }
            Err(e) if segment == Segment::Current => Err(self.fail_initial(e)),
            Err(e) => {
                state.content = SegmentContent::default();
                state.failed = true;
                warn!(%segment, "segment fetch failed, nothing more to load: {e}");
                Ok(())
            }
        }
    }

    /// Current segment failed: it is loaded empty and the feed enters the
    /// error status. Returns the initial load failure for the caller.
    pub fn fail_initial(&mut self, reason: FeedError) -> FeedError {
        error!("initial feed load failed: {reason}");
        self.current = SegmentState { phase: SegmentPhase::Loaded, content: SegmentContent::default(), failed: true };
        self.status = FeedStatus::Error(INITIAL_LOAD_MESSAGE.to_string());
        FeedError::InitialLoad(Box::new(reason))
    }

    /// previous (if loaded), current, loading indicator (if next is in
    /// flight), next (if loaded). Nothing renders until the feed is ready.
    pub fn render(&self) -> Vec<RenderBlock> {
        if self.status != FeedStatus::Ready {
            return Vec::new();
        }
        let block = |segment: Segment| {
            let s = self.segment(segment);
            RenderBlock::Segment { segment, items: s.content.items.clone(), video: s.content.video.clone() }
        };
        let mut out = Vec::with_capacity(4);
        if self.previous.is_loaded() {
            out.push(block(Segment::Previous));
        }
        out.push(block(Segment::Current));
        if self.next.is_fetching() {
            out.push(RenderBlock::LoadingIndicator);
        }
        if self.next.is_loaded() {
            out.push(block(Segment::Next));
        }
        out
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> { m.lock().unwrap_or_else(PoisonError::into_inner) }

/// Async driver around [`FeedState`]. Every segment fetch, the current one
/// included, runs as a task on the ambient Tokio runtime, so `mount`,
/// `load_more` and `refresh` must be called from within it. Dropping a
/// `mount` future does not stop the fetch; `teardown` (or dropping the view)
/// aborts all in-flight fetches and freezes the state.
pub struct FeedView {
    assembler: Arc<FeedAssembler>,
    state: Arc<Mutex<FeedState>>,
    tasks: Mutex<JoinSet<()>>,
    revision: Arc<watch::Sender<u64>>,
    torn_down: Arc<AtomicBool>,
}

impl FeedView {
    pub fn new(assembler: Arc<FeedAssembler>) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            assembler,
            state: Arc::new(Mutex::new(FeedState::new())),
            tasks: Mutex::new(JoinSet::new()),
            revision: Arc::new(tx),
            torn_down: Arc::new(AtomicBool::new(false)),
        }
    }

    fn bump(&self) { self.revision.send_modify(|r| *r += 1); }

    /// Fetch the current segment and wait for it. Calling it again after the
    /// fetch started is a no-op; use `settled` to wait for a fetch started by
    /// an earlier, abandoned call.
    pub async fn mount(&self) -> FeedResult<()> {
        let Some(done) = self.spawn_fetch(Segment::Current) else {
            return Ok(());
        };
        let outcome = done.await.unwrap_or(Err(FeedError::Cancelled));
        if outcome.is_ok() {
            info!("feed ready");
        }
        outcome
    }

    /// User-initiated reload after a failed initial load: drops all segments and mounts again.
    pub async fn retry(&self) -> FeedResult<()> {
        {
            let mut state = lock(&self.state);
            if !matches!(state.status(), FeedStatus::Error(_)) {
                return Ok(());
            }
            *state = FeedState::new();
        }
        self.mount().await
    }

    /// Forward trigger. True when a fetch for the next segment was started.
    pub fn load_more(&self) -> bool {
        self.spawn_fetch(Segment::Next).is_some()
    }

    /// Backward trigger. True when a fetch for the previous segment was started.
    pub fn refresh(&self) -> bool {
        self.spawn_fetch(Segment::Previous).is_some()
    }

    /// Starts the fetch task; the receiver yields the outcome of `complete`,
    /// or closes if the task was aborted.
    fn spawn_fetch(&self, segment: Segment) -> Option<oneshot::Receiver<FeedResult<()>>> {
        {
            let mut state = lock(&self.state);
            if self.torn_down.load(Ordering::SeqCst) {
                return None;
            }
            if !state.begin_fetch(segment) {
                debug!(%segment, "fetch suppressed");
                return None;
            }
        }
        self.bump();
        let (tx, rx) = oneshot::channel();
        let assembler = self.assembler.clone();
        let state = self.state.clone();
        let revision = self.revision.clone();
        let torn_down = self.torn_down.clone();
        lock(&self.tasks).spawn(async move {
            let result = assembler.assemble_segment(segment).await;
            let outcome = {
                let mut state = lock(&state);
                if torn_down.load(Ordering::SeqCst) {
                    debug!(%segment, "view torn down, dropping fetched segment");
                    return;
                }
                state.complete(segment, result)
            };
            revision.send_modify(|r| *r += 1);
            let _ = tx.send(outcome);
        });
        Some(rx)
    }

    /// Resolves once no segment is in flight (or the view was torn down).
    pub async fn settled(&self) {
        let mut rx = self.revision.subscribe();
        loop {
            if self.torn_down.load(Ordering::SeqCst) || !lock(&self.state).any_fetching() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Abort in-flight fetches. Aborted segments stay in flight and are never retried.
    pub fn teardown(&self) {
        {
            // under the state lock so no completion lands after this point
            let _state = lock(&self.state);
            if self.torn_down.swap(true, Ordering::SeqCst) {
                return;
            }
        }
        lock(&self.tasks).abort_all();
        debug!("feed view torn down");
        self.bump();
    }

    pub fn is_torn_down(&self) -> bool { self.torn_down.load(Ordering::SeqCst) }

    /// Revision counter bumped on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<u64> { self.revision.subscribe() }

    pub fn status(&self) -> FeedStatus { lock(&self.state).status().clone() }

    pub fn phase(&self, segment: Segment) -> SegmentPhase { lock(&self.state).segment(segment).phase }

    /// Banner video of the current segment.
    pub fn video(&self) -> Option<VideoItem> { lock(&self.state).segment(Segment::Current).content.video.clone() }

    pub fn render(&self) -> Vec<RenderBlock> { lock(&self.state).render() }

    pub fn snapshot(&self) -> FeedState { lock(&self.state).clone() }
}

impl Drop for FeedView {
    fn drop(&mut self) { self.teardown(); }
}
