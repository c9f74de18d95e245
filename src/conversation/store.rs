//! Per-session conversation storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use super::controller::Conversation;

/// A chat session: one conversation plus bookkeeping.
///
/// Cloning is cheap and yields a handle to the same session.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Unique session identifier.
    id: String,
    /// The conversation this session owns.
    conversation: RwLock<Conversation>,
    /// Session creation time.
    created_at: DateTime<Utc>,
    /// Last activity time.
    last_activity: RwLock<DateTime<Utc>>,
}

impl Session {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(SessionInner {
                id,
                conversation: RwLock::new(Conversation::new()),
                created_at: now,
                last_activity: RwLock::new(now),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// When the session was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// When the session was last read or written.
    pub fn last_activity(&self) -> DateTime<Utc> {
        *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current conversation state.
    pub fn snapshot(&self) -> Conversation {
        self.touch();
        self.inner
            .conversation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a reply is still streaming into this session.
    pub fn is_streaming(&self) -> bool {
        self.inner
            .conversation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_streaming()
    }

    /// Mutate the conversation under the session lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut Conversation) -> R) -> R {
        let result = {
            let mut guard = self
                .inner
                .conversation
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        };
        self.touch();
        result
    }

    fn touch(&self) {
        *self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Utc::now();
    }
}

/// Thread-safe store of active sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a fresh UUID.
    pub fn create(&self) -> Session {
        let session = Session::new(Uuid::new_v4().to_string());
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id().to_string(), session.clone());
        tracing::debug!(session_id = %session.id(), "Session created");
        session
    }

    /// Look up a session.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Remove a session, returning it if it existed.
    pub fn remove(&self, id: &str) -> Option<Session> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions idle for longer than `max_idle` that are not streaming.
    ///
    /// Returns how many sessions were removed. A `max_idle` reaching past the
    /// earliest representable time removes nothing.
    pub fn prune_idle(&self, max_idle: TimeDelta) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(max_idle) else {
            return 0;
        };
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.last_activity() >= cutoff || session.is_streaming()
        });
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new();
        let session = store.create();
        assert!(Uuid::parse_str(session.id()).is_ok());
        assert_eq!(store.len(), 1);

        let found = store.get(session.id()).unwrap();
        found.update(|c| c.set_input("typed"));
        assert_eq!(session.snapshot().input(), "typed");
        assert!(store.get("missing").is_none());

        assert!(store.remove(session.id()).is_some());
        assert!(store.remove(session.id()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_prune_idle_keeps_recent_sessions() {
        let store = SessionStore::new();
        store.create();
        assert_eq!(store.prune_idle(TimeDelta::minutes(5)), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_prune_idle_with_unbounded_window_keeps_everything() {
        let store = SessionStore::new();
        store.create();
        assert_eq!(store.prune_idle(TimeDelta::MAX), 0);

        let far_past = std::time::Duration::from_secs(400_000 * 365 * 24 * 3600);
        let window = TimeDelta::from_std(far_past).unwrap_or(TimeDelta::MAX);
        assert_eq!(store.prune_idle(window), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_prune_idle_removes_stale_sessions() {
        let store = SessionStore::new();
        store.create();
        assert_eq!(store.prune_idle(TimeDelta::seconds(-1)), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_prune_idle_spares_streaming_sessions() {
        let store = SessionStore::new();
        let session = store.create();
        session.update(|c| {
            c.set_input("still going");
            c.submit()
        });
        assert_eq!(store.prune_idle(TimeDelta::seconds(-1)), 0);
        assert_eq!(store.len(), 1);
    }
}
