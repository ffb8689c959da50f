//! Keep the conversation viewport on the newest message.
//!
//! The viewport position is stored as an offset from the bottom:
//! `0` shows the newest lines, larger values scroll back in history. Any
//! change in transcript length re-pins the viewport to the bottom.

use empower_application::{SessionStore, TranscriptChange, TranscriptObserver};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ScrollState {
    last_len: Option<usize>,
    offset_from_bottom: u16,
}

/// Scroll follower for the transcript viewport
#[derive(Debug, Default)]
pub struct ScrollSync {
    state: Mutex<ScrollState>,
}

impl ScrollSync {
    /// Subscribe to `store` and sync with its current length right away.
    pub fn attach(store: &SessionStore) -> Arc<Self> {
        let sync = Arc::new(Self::default());
        store.subscribe(sync.clone());
        sync.observe_len(store.len());
        sync
    }

    fn lock(&self) -> MutexGuard<'_, ScrollState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn observe_len(&self, len: usize) {
        let mut state = self.lock();
        if state.last_len != Some(len) {
            state.last_len = Some(len);
            state.offset_from_bottom = 0;
        }
    }

    /// Lines between the bottom of the content and the bottom of the viewport.
    pub fn offset(&self) -> u16 {
        self.lock().offset_from_bottom
    }

    pub fn scroll_up(&self, lines: u16) {
        let mut state = self.lock();
        state.offset_from_bottom = state.offset_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&self, lines: u16) {
        let mut state = self.lock();
        state.offset_from_bottom = state.offset_from_bottom.saturating_sub(lines);
    }

    /// Top-row scroll position for content of `total_lines` shown in a
    /// viewport `visible_lines` tall.
    ///
    /// Clamps the stored offset so scrolling back past the first line does
    /// not accumulate.
    pub fn resolve(&self, total_lines: u16, visible_lines: u16) -> u16 {
        let max_scroll = total_lines.saturating_sub(visible_lines);
        let mut state = self.lock();
        state.offset_from_bottom = state.offset_from_bottom.min(max_scroll);
        max_scroll - state.offset_from_bottom
    }
}

impl TranscriptObserver for ScrollSync {
    fn on_change(&self, change: &TranscriptChange) {
        self.observe_len(change.len);
    }
}
