//! App-wide pointer interaction listeners.
//!
//! The event loop forwards every pointer press to [`InteractionHub::dispatch`].
//! Components that need to react to presses anywhere on screen register a
//! listener with [`InteractionHub::listen`] and hold the returned
//! [`ListenerGuard`]; dropping the guard detaches the listener.

use ratatui::layout::Position;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::trace;

/// A pointer press at a terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub position: Position,
}

impl Interaction {
    pub fn at(column: u16, row: u16) -> Self {
        Self {
            position: Position::new(column, row),
        }
    }
}

/// Whether a listener stays attached after handling an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerControl {
    Keep,
    Remove,
}

type Listener = Arc<dyn Fn(&Interaction) -> ListenerControl + Send + Sync>;

/// Registry of interaction listeners
#[derive(Default)]
pub struct InteractionHub {
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_id: AtomicU64,
}

impl InteractionHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a listener until the returned guard is dropped or the
    /// listener returns [`ListenerControl::Remove`].
    pub fn listen(
        self: &Arc<Self>,
        listener: impl Fn(&Interaction) -> ListenerControl + Send + Sync + 'static,
    ) -> ListenerGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(listener)));
        trace!(id, "interaction listener attached");
        ListenerGuard {
            hub: Arc::downgrade(self),
            id,
        }
    }

    /// Deliver an interaction to every attached listener.
    ///
    /// Listeners run outside the registry lock, so they may attach or detach
    /// listeners themselves.
    pub fn dispatch(&self, interaction: &Interaction) {
        let snapshot: Vec<(u64, Listener)> = self.lock().clone();
        for (id, listener) in snapshot {
            if listener(interaction) == ListenerControl::Remove {
                self.remove(id);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn contains(&self, id: u64) -> bool {
        self.lock().iter().any(|(listener_id, _)| *listener_id == id)
    }

    fn remove(&self, id: u64) {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        if listeners.len() != before {
            trace!(id, "interaction listener detached");
        }
    }
}

/// Keeps a listener attached; detaches it on drop
#[must_use = "dropping the guard detaches the listener immediately"]
pub struct ListenerGuard {
    hub: Weak<InteractionHub>,
    id: u64,
}

impl ListenerGuard {
    /// False once the listener removed itself or the hub is gone.
    pub fn is_attached(&self) -> bool {
        self.hub.upgrade().is_some_and(|hub| hub.contains(self.id))
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(self.id);
        }
    }
}
