//! Close an overlay when the user presses anywhere outside it.
//!
//! [`PanelDismissal`] holds an interaction listener only while its overlay
//! is open. The listener is released on every way the overlay can close:
//! an outside press (the listener removes itself), an explicit
//! [`disarm`](PanelDismissal::disarm), or dropping the `PanelDismissal`.

use super::interaction::{InteractionHub, ListenerControl, ListenerGuard};
use ratatui::layout::Rect;
use std::sync::{Arc, Mutex, PoisonError};

/// Outside-press dismissal for one overlay
#[derive(Default)]
pub struct PanelDismissal {
    region: Arc<Mutex<Option<Rect>>>,
    guard: Option<ListenerGuard>,
}

impl PanelDismissal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening. `on_dismiss` runs once, on the first press outside
    /// the overlay's region, and the listener detaches right after.
    ///
    /// Re-arming replaces any previous listener.
    pub fn arm(&mut self, hub: &Arc<InteractionHub>, on_dismiss: impl Fn() + Send + Sync + 'static) {
        self.disarm();
        let region = Arc::clone(&self.region);
        self.guard = Some(hub.listen(move |interaction| {
            let inside = region
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some_and(|rect| rect.contains(interaction.position));
            if inside {
                ListenerControl::Keep
            } else {
                on_dismiss();
                ListenerControl::Remove
            }
        }));
    }

    /// Record where the overlay was drawn. Presses inside it are ignored.
    pub fn set_region(&self, rect: Rect) {
        *self.region.lock().unwrap_or_else(PoisonError::into_inner) = Some(rect);
    }

    /// Stop listening without running the dismiss callback.
    pub fn disarm(&mut self) {
        self.guard = None;
        *self.region.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_armed(&self) -> bool {
        self.guard.as_ref().is_some_and(ListenerGuard::is_attached)
    }
}
