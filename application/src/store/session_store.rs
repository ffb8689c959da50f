//! Session store: owns the transcript and the in-flight flag.
//!
//! The store is a cheap cloneable handle over shared state. Each mutation
//! takes the lock, commits, releases, and then notifies observers with a
//! snapshot of the committed state.
//!
//! Every `reset` starts a new epoch. Turn completions carry the epoch they
//! were started in, so a reply that resolves after a reset is dropped
//! instead of leaking into the fresh session.

use crate::ports::transcript_observer::{ChangeKind, TranscriptChange, TranscriptObserver};
use empower_domain::{Message, Session};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

struct StoreState {
    session: Session,
    epoch: u64,
    observers: Vec<Arc<dyn TranscriptObserver>>,
}

/// Proof that a turn was started: the epoch it belongs to and the
/// transcript to send, including the just-appended user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTicket {
    pub epoch: u64,
    pub transcript: Vec<Message>,
}

/// Shared handle to the session
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<StoreState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store holding an empty session.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                session: Session::new(),
                epoch: 0,
                observers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an observer. It is notified after every later mutation.
    pub fn subscribe(&self, observer: Arc<dyn TranscriptObserver>) {
        self.lock().observers.push(observer);
    }

    // ==================== Mutations ====================

    /// Append a message to the end of the transcript.
    pub fn append(&self, message: Message) {
        self.mutate(ChangeKind::Appended, |session| session.push(message));
    }

    /// Set or clear the in-flight flag.
    pub fn set_pending(&self, pending: bool) {
        self.mutate(ChangeKind::PendingChanged, |session| {
            session.set_pending(pending)
        });
    }

    /// Clear the transcript and the in-flight flag, starting a new epoch.
    pub fn reset(&self) {
        self.take();
    }

    /// Reset the session and return the transcript it held.
    ///
    /// The snapshot and the reset happen under one lock, so no append can
    /// land between them.
    pub fn take(&self) -> Vec<Message> {
        let (transcript, epoch, change, observers) = {
            let mut state = self.lock();
            let transcript = state.session.transcript().to_vec();
            state.session.clear();
            state.epoch += 1;
            (
                transcript,
                state.epoch,
                Self::snapshot_change(&state, ChangeKind::Reset),
                state.observers.clone(),
            )
        };
        trace!(epoch, "session reset");
        Self::notify(&observers, &change);
        transcript
    }

    /// Start a turn: append `message` and set pending in one step.
    ///
    /// Returns `None` without touching the session if a turn is already in
    /// flight.
    pub fn begin_turn(&self, message: Message) -> Option<TurnTicket> {
        let (ticket, change, observers) = {
            let mut state = self.lock();
            if state.session.is_pending() {
                return None;
            }
            state.session.push(message);
            state.session.set_pending(true);
            let ticket = TurnTicket {
                epoch: state.epoch,
                transcript: state.session.transcript().to_vec(),
            };
            (
                ticket,
                Self::snapshot_change(&state, ChangeKind::Appended),
                state.observers.clone(),
            )
        };
        Self::notify(&observers, &change);
        Some(ticket)
    }

    /// Finish a turn started in `epoch`: append `message` and clear pending.
    ///
    /// Returns `false` and leaves the session alone if the session has been
    /// reset since the turn began.
    pub fn complete_turn(&self, epoch: u64, message: Message) -> bool {
        let (change, observers) = {
            let mut state = self.lock();
            if state.epoch != epoch {
                return false;
            }
            state.session.push(message);
            state.session.set_pending(false);
            (
                Self::snapshot_change(&state, ChangeKind::Appended),
                state.observers.clone(),
            )
        };
        Self::notify(&observers, &change);
        true
    }

    /// Clear pending for a turn that ends without a reply.
    ///
    /// No-op if the session has been reset since the turn began.
    pub fn abandon_turn(&self, epoch: u64) {
        let notification = {
            let mut state = self.lock();
            if state.epoch != epoch || !state.session.is_pending() {
                None
            } else {
                state.session.set_pending(false);
                Some((
                    Self::snapshot_change(&state, ChangeKind::PendingChanged),
                    state.observers.clone(),
                ))
            }
        };
        if let Some((change, observers)) = notification {
            Self::notify(&observers, &change);
        }
    }

    // ==================== Queries ====================

    /// Snapshot of the transcript.
    pub fn transcript(&self) -> Vec<Message> {
        self.lock().session.transcript().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().session.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().session.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().session.is_pending()
    }

    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    // ==================== Internals ====================

    fn mutate(&self, kind: ChangeKind, f: impl FnOnce(&mut Session)) {
        let (change, observers) = {
            let mut state = self.lock();
            f(&mut state.session);
            (Self::snapshot_change(&state, kind), state.observers.clone())
        };
        Self::notify(&observers, &change);
    }

    fn snapshot_change(state: &StoreState, kind: ChangeKind) -> TranscriptChange {
        TranscriptChange {
            kind,
            len: state.session.len(),
            pending: state.session.is_pending(),
        }
    }

    fn notify(observers: &[Arc<dyn TranscriptObserver>], change: &TranscriptChange) {
        for observer in observers {
            observer.on_change(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingObserver {
        changes: Mutex<Vec<TranscriptChange>>,
    }

    impl TranscriptObserver for RecordingObserver {
        fn on_change(&self, change: &TranscriptChange) {
            self.changes.lock().unwrap().push(*change);
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = SessionStore::new();
        assert!(store.is_empty());
        assert!(!store.is_pending());
        assert_eq!(store.epoch(), 0);
    }

    #[test]
    fn test_append_accepts_consecutive_user_messages() {
        let store = SessionStore::new();
        store.append(Message::user("one"));
        store.append(Message::user("two"));

        assert_eq!(
            store.transcript(),
            vec![Message::user("one"), Message::user("two")]
        );
    }

    #[test]
    fn test_reset_is_idempotent() {
        let store = SessionStore::new();
        store.reset();
        store.reset();
        assert!(store.is_empty());
        assert!(!store.is_pending());
    }

    #[test]
    fn test_reset_clears_transcript_and_pending() {
        let store = SessionStore::new();
        store.append(Message::user("hi"));
        store.set_pending(true);

        store.reset();
        assert!(store.is_empty());
        assert!(!store.is_pending());
        assert_eq!(store.epoch(), 1);
    }

    #[test]
    fn test_begin_turn_rejects_while_pending() {
        let store = SessionStore::new();
        let ticket = store.begin_turn(Message::user("first")).unwrap();
        assert_eq!(ticket.transcript, vec![Message::user("first")]);
        assert!(store.is_pending());

        assert!(store.begin_turn(Message::user("second")).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_complete_turn_appends_and_clears_pending() {
        let store = SessionStore::new();
        let ticket = store.begin_turn(Message::user("hi")).unwrap();

        assert!(store.complete_turn(ticket.epoch, Message::assistant("hello")));
        assert!(!store.is_pending());
        assert_eq!(
            store.transcript(),
            vec![Message::user("hi"), Message::assistant("hello")]
        );
    }

    #[test]
    fn test_complete_turn_after_reset_is_discarded() {
        let store = SessionStore::new();
        let ticket = store.begin_turn(Message::user("hi")).unwrap();
        store.reset();

        assert!(!store.complete_turn(ticket.epoch, Message::assistant("late")));
        assert!(store.is_empty());
        assert!(!store.is_pending());
    }

    #[test]
    fn test_abandon_turn_clears_pending_only() {
        let store = SessionStore::new();
        let ticket = store.begin_turn(Message::user("hi")).unwrap();

        store.abandon_turn(ticket.epoch);
        assert!(!store.is_pending());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_observers_see_committed_state() {
        let store = SessionStore::new();
        let observer = Arc::new(RecordingObserver::default());
        store.subscribe(observer.clone());

        let ticket = store.begin_turn(Message::user("hi")).unwrap();
        store.complete_turn(ticket.epoch, Message::assistant("hello"));
        store.reset();

        let changes = observer.changes.lock().unwrap();
        assert_eq!(
            *changes,
            vec![
                TranscriptChange {
                    kind: ChangeKind::Appended,
                    len: 1,
                    pending: true
                },
                TranscriptChange {
                    kind: ChangeKind::Appended,
                    len: 2,
                    pending: false
                },
                TranscriptChange {
                    kind: ChangeKind::Reset,
                    len: 0,
                    pending: false
                },
            ]
        );
    }

    #[test]
    fn test_observer_may_read_store() {
        struct Reader {
            store: SessionStore,
            seen: Mutex<Vec<usize>>,
        }
        impl TranscriptObserver for Reader {
            fn on_change(&self, _change: &TranscriptChange) {
                self.seen.lock().unwrap().push(self.store.len());
            }
        }

        let store = SessionStore::new();
        let reader = Arc::new(Reader {
            store: store.clone(),
            seen: Mutex::new(Vec::new()),
        });
        store.subscribe(reader.clone());

        store.append(Message::user("a"));
        store.append(Message::assistant("b"));
        assert_eq!(*reader.seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_take_returns_snapshot_and_starts_new_epoch() {
        let store = SessionStore::new();
        let ticket = store.begin_turn(Message::user("hi")).unwrap();

        let taken = store.take();

        assert_eq!(taken, vec![Message::user("hi")]);
        assert!(store.is_empty());
        assert!(!store.is_pending());
        assert_eq!(store.epoch(), ticket.epoch + 1);
        assert!(!store.complete_turn(ticket.epoch, Message::assistant("late")));
        assert!(store.is_empty());
    }
}
