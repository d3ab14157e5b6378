use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;
use wordle_core::SessionStore;

pub const SESSION_COOKIE: &str = "wordle_session";

#[derive(Debug)]
struct SessionData {
    values: HashMap<String, String>,
    last_seen: Instant,
}

impl SessionData {
    fn new() -> Self {
        Self {
            values: HashMap::new(),
            last_seen: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() > ttl
    }
}

/// Server-side session storage keyed by the session cookie
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: DashMap<Uuid, SessionData>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume the session named by the cookie, or start a fresh one when the
    /// cookie is missing, malformed or unknown.
    pub fn open(&self, cookie: Option<&str>) -> Uuid {
        let known = cookie
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .filter(|id| match self.sessions.get_mut(id) {
                Some(mut session) => {
                    session.last_seen = Instant::now();
                    true
                }
                None => false,
            });

        known.unwrap_or_else(|| {
            let id = Uuid::new_v4();
            self.sessions.insert(id, SessionData::new());
            tracing::debug!("Started session {}", id);
            id
        })
    }

    pub fn session(&self, id: Uuid) -> ClientSession<'_> {
        ClientSession { manager: self, id }
    }

    /// Drop sessions idle for longer than `ttl`. Returns how many went.
    pub fn cleanup_expired(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(ttl));
        before.saturating_sub(self.sessions.len())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// One client's view of the session storage
pub struct ClientSession<'a> {
    manager: &'a SessionManager,
    id: Uuid,
}

impl SessionStore for ClientSession<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.manager
            .sessions
            .get(&self.id)
            .and_then(|session| session.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) {
        self.manager
            .sessions
            .entry(self.id)
            .or_insert_with(SessionData::new)
            .values
            .insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) {
        if let Some(mut session) = self.manager.sessions.get_mut(&self.id) {
            session.values.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_reuses_known_sessions() {
        let manager = SessionManager::new();

        let id = manager.open(None);
        assert_eq!(manager.open(Some(&id.to_string())), id);
        assert_eq!(manager.session_count(), 1);

        let unknown = Uuid::new_v4().to_string();
        assert_ne!(manager.open(Some(&unknown)).to_string(), unknown);
        assert_ne!(manager.open(Some("not-a-uuid")), id);
        assert_eq!(manager.session_count(), 3);
    }

    #[test]
    fn test_values_are_per_session() {
        let manager = SessionManager::new();
        let a = manager.session(manager.open(None));
        let b = manager.session(manager.open(None));

        a.set("key", "one".to_string());
        assert_eq!(a.get("key"), Some("one".to_string()));
        assert_eq!(b.get("key"), None);

        a.delete("key");
        assert_eq!(a.get("key"), None);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let manager = SessionManager::new();
        let stale = manager.open(None);
        let short_ttl = Duration::from_millis(10);

        assert_eq!(manager.cleanup_expired(short_ttl), 0);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let fresh = manager.open(None);
        assert_eq!(manager.cleanup_expired(short_ttl), 1);

        assert_eq!(manager.session_count(), 1);
        assert_ne!(manager.open(Some(&stale.to_string())), stale);
        assert_eq!(manager.open(Some(&fresh.to_string())), fresh);
    }
}
