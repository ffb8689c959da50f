//! Port for reacting to session mutations.
//!
//! Observers are notified synchronously, right after a mutation commits,
//! with a snapshot of the resulting state. They never see a half-applied
//! change.

/// What kind of mutation produced a [`TranscriptChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Appended,
    PendingChanged,
    Reset,
}

/// State of the session after a committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptChange {
    pub kind: ChangeKind,
    /// Transcript length after the mutation.
    pub len: usize,
    pub pending: bool,
}

/// Observer of session mutations.
///
/// Called outside the store's lock, so implementations may read the store.
pub trait TranscriptObserver: Send + Sync {
    fn on_change(&self, change: &TranscriptChange);
}
