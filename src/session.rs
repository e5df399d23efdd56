//! In-memory login sessions keyed by an opaque token.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::admin::{read, write};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "admin_session";

/// Longest accepted session lifetime (ten years); longer values are clamped.
pub const MAX_SESSION_TTL: std::time::Duration = std::time::Duration::from_secs(10 * 366 * 24 * 60 * 60);

#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        SessionStore {
            ttl: Duration::from_std(ttl.min(MAX_SESSION_TTL)).unwrap_or_else(|_| Duration::days(1)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn create(&self, username: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            created_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        write(&self.sessions).insert(session.token.clone(), session.clone());
        session
    }

    /// Live session for `token`. An expired session is evicted and reported as absent.
    pub fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        let session = read(&self.sessions).get(token).cloned()?;
        if session.is_expired_at(now) {
            write(&self.sessions).remove(token);
            return None;
        }
        Some(session)
    }

    pub fn remove(&self, token: &str) -> Option<Session> {
        write(&self.sessions).remove(token)
    }

    /// Drop every expired session; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = write(&self.sessions);
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        read(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_sessions_are_retrievable() {
        let store = SessionStore::new(std::time::Duration::from_secs(60));
        let session = store.create("admin");
        assert_eq!(session.token.len(), 32);
        assert!(session.expires_at > session.created_at);
        assert_eq!(store.get(&session.token).map(|s| s.username), Some("admin".into()));
        assert!(store.get("unknown").is_none());
    }

    #[test]
    fn tokens_are_unique() {
        let store = SessionStore::new(std::time::Duration::from_secs(60));
        let a = store.create("admin");
        let b = store.create("admin");
        assert_ne!(a.token, b.token);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn expired_sessions_are_evicted() {
        let store = SessionStore::new(std::time::Duration::ZERO);
        let session = store.create("admin");
        assert!(store.get(&session.token).is_none());
        assert!(store.is_empty());

        store.create("a");
        store.create("b");
        assert_eq!(store.purge_expired(), 2);
    }

    #[test]
    fn huge_ttl_is_clamped() {
        let store = SessionStore::new(std::time::Duration::from_secs(10_000_000_000_000));
        let session = store.create("admin");
        let lifetime = session.expires_at - session.created_at;
        assert_eq!(lifetime.to_std().ok(), Some(MAX_SESSION_TTL));
        assert!(store.get(&session.token).is_some());
    }

    #[test]
    fn removed_sessions_are_gone() {
        let store = SessionStore::new(std::time::Duration::from_secs(60));
        let session = store.create("admin");
        assert!(store.remove(&session.token).is_some());
        assert!(store.get(&session.token).is_none());
        assert!(store.remove(&session.token).is_none());
    }
}
