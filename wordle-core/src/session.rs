use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wordle_types::WordId;

use crate::word::Word;

/// Per-client key-value store. Anything kept here is a cache of durable
/// state and may vanish at any time.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn delete(&self, key: &str);
}

/// What the client session currently believes is bound for today
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionBinding {
    Puzzle {
        word_id: WordId,
        secret: Word,
        issued_on: NaiveDate,
    },
    LimitReached {
        issued_on: NaiveDate,
    },
}

impl SessionBinding {
    pub fn issued_on(&self) -> NaiveDate {
        match self {
            SessionBinding::Puzzle { issued_on, .. } => *issued_on,
            SessionBinding::LimitReached { issued_on } => *issued_on,
        }
    }
}

/// Typed view over a [`SessionStore`]
pub struct SessionCache<'a> {
    store: &'a dyn SessionStore,
}

impl<'a> SessionCache<'a> {
    const BINDING_KEY: &'static str = "puzzle_binding";

    pub fn new(store: &'a dyn SessionStore) -> Self {
        Self { store }
    }

    /// The binding for `today`, if any. Stale or unreadable entries are dropped.
    pub fn load(&self, today: NaiveDate) -> Option<SessionBinding> {
        let raw = self.store.get(Self::BINDING_KEY)?;

        match serde_json::from_str::<SessionBinding>(&raw) {
            Ok(binding) if binding.issued_on() == today => Some(binding),
            Ok(_) => {
                debug!("Dropping session binding issued on a previous day");
                self.clear();
                None
            }
            Err(e) => {
                debug!("Dropping unreadable session binding: {}", e);
                self.clear();
                None
            }
        }
    }

    /// Cached secret for `word_id`, only when the session agrees with the
    /// durable binding
    pub fn cached_secret(&self, word_id: WordId, today: NaiveDate) -> Option<Word> {
        match self.load(today)? {
            SessionBinding::Puzzle {
                word_id: cached_id,
                secret,
                ..
            } if cached_id == word_id => Some(secret),
            _ => None,
        }
    }

    pub fn bind_puzzle(&self, word_id: WordId, secret: &Word, today: NaiveDate) {
        self.write(&SessionBinding::Puzzle {
            word_id,
            secret: secret.clone(),
            issued_on: today,
        });
    }

    pub fn mark_limit_reached(&self, today: NaiveDate) {
        self.write(&SessionBinding::LimitReached { issued_on: today });
    }

    pub fn clear(&self) {
        self.store.delete(Self::BINDING_KEY);
    }

    fn write(&self, binding: &SessionBinding) {
        match serde_json::to_string(binding) {
            Ok(raw) => self.store.set(Self::BINDING_KEY, raw),
            Err(e) => debug!("Failed to encode session binding: {}", e),
        }
    }
}
