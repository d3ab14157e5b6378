#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use wordle_core::{
    DailyProgress, GameConfig, GameStore, GuessCommit, GuessRecord, PoolWord, PuzzleEngine,
    PuzzleEvent, PuzzleEventHandler, SessionStore, StoreError, StoreResult, Word,
};
use wordle_types::{DailyTally, UserId, WordId};

#[derive(Default)]
struct Tables {
    words: Vec<PoolWord>,
    users: HashMap<UserId, DailyProgress>,
    records: Vec<GuessRecord>,
    tallies: HashMap<(UserId, NaiveDate), DailyTally>,
}

/// In-memory `GameStore` with the same guarded-update rules as the database
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    injected_conflicts: AtomicUsize,
}

impl MemoryStore {
    pub fn with_words(words: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut tables = store.tables.lock().unwrap();
            for (i, w) in words.iter().enumerate() {
                tables.words.push(PoolWord {
                    id: i as WordId + 1,
                    word: Word::parse(w).unwrap(),
                });
            }
        }
        store
    }

    pub fn add_user(&self, user_id: UserId) {
        self.tables
            .lock()
            .unwrap()
            .users
            .insert(user_id, DailyProgress::new(user_id));
    }

    pub fn progress(&self, user_id: UserId) -> DailyProgress {
        self.tables.lock().unwrap().users[&user_id].clone()
    }

    pub fn records(&self, user_id: UserId) -> Vec<GuessRecord> {
        self.tables
            .lock()
            .unwrap()
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn word(&self, word_id: WordId) -> Word {
        self.tables
            .lock()
            .unwrap()
            .words
            .iter()
            .find(|w| w.id == word_id)
            .map(|w| w.word.clone())
            .unwrap()
    }

    /// The next `count` guess commits fail as if another request won the race
    pub fn inject_conflicts(&self, count: usize) {
        self.injected_conflicts.store(count, Ordering::SeqCst);
    }

    fn ensure_record_locked(
        tables: &mut Tables,
        user_id: UserId,
        word_id: WordId,
        day: NaiveDate,
    ) -> GuessRecord {
        if let Some(existing) = tables
            .records
            .iter()
            .find(|r| r.user_id == user_id && r.word_id == word_id && r.day == day)
        {
            return existing.clone();
        }

        let record = GuessRecord {
            id: tables.records.len() as i64 + 1,
            user_id,
            word_id,
            day,
            guesses: Vec::new(),
            solved: false,
        };
        tables.records.push(record.clone());
        record
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn load_progress(&self, user_id: UserId) -> StoreResult<Option<DailyProgress>> {
        Ok(self.tables.lock().unwrap().users.get(&user_id).cloned())
    }

    async fn roll_over(&self, progress: &DailyProgress) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(stored) = tables.users.get_mut(&progress.user_id) {
            if stored.last_play_date < progress.last_play_date {
                *stored = progress.clone();
            }
        }
        Ok(())
    }

    async fn find_word(&self, word_id: WordId) -> StoreResult<Option<PoolWord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.words.iter().find(|w| w.id == word_id).cloned())
    }

    async fn attempted_word_ids(&self, user_id: UserId, day: NaiveDate) -> StoreResult<Vec<WordId>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .records
            .iter()
            .filter(|r| r.user_id == user_id && r.day == day)
            .map(|r| r.word_id)
            .collect())
    }

    async fn candidate_words(&self, exclude: &[WordId]) -> StoreResult<Vec<PoolWord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .words
            .iter()
            .filter(|w| !exclude.contains(&w.id))
            .cloned()
            .collect())
    }

    async fn bind_puzzle(
        &self,
        user_id: UserId,
        word_id: WordId,
        day: NaiveDate,
    ) -> StoreResult<GuessRecord> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("no user {}", user_id)))?;
        if user.current_puzzle.is_some() {
            return Err(StoreError::Conflict);
        }
        user.current_puzzle = Some(word_id);

        Ok(Self::ensure_record_locked(&mut tables, user_id, word_id, day))
    }

    async fn ensure_record(
        &self,
        user_id: UserId,
        word_id: WordId,
        day: NaiveDate,
    ) -> StoreResult<GuessRecord> {
        let mut tables = self.tables.lock().unwrap();
        Ok(Self::ensure_record_locked(&mut tables, user_id, word_id, day))
    }

    async fn find_record(
        &self,
        user_id: UserId,
        word_id: WordId,
        day: NaiveDate,
    ) -> StoreResult<Option<GuessRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .records
            .iter()
            .find(|r| r.user_id == user_id && r.word_id == word_id && r.day == day)
            .cloned())
    }

    async fn commit_guess(&self, commit: &GuessCommit) -> StoreResult<()> {
        let injected = self.injected_conflicts.load(Ordering::SeqCst);
        if injected > 0 {
            self.injected_conflicts.store(injected - 1, Ordering::SeqCst);
            return Err(StoreError::Conflict);
        }

        let mut tables = self.tables.lock().unwrap();
        let record = &commit.record;

        let stored = tables
            .records
            .iter()
            .position(|r| r.id == record.id)
            .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("no record {}", record.id)))?;
        if tables.records[stored].attempts() != commit.expected_attempts {
            return Err(StoreError::Conflict);
        }
        if commit.finished
            && tables.users.get(&record.user_id).and_then(|u| u.current_puzzle)
                != Some(record.word_id)
        {
            return Err(StoreError::Conflict);
        }

        tables.records[stored] = record.clone();

        let tally = tables
            .tallies
            .entry((record.user_id, record.day))
            .or_insert_with(|| DailyTally::empty(record.user_id, record.day));
        tally.words_tried += 1;
        if commit.is_correct {
            tally.words_solved += 1;
        }

        if commit.finished {
            if let Some(user) = tables.users.get_mut(&record.user_id) {
                *user = user.clone().record_completion(record.solved);
            }
        }
        Ok(())
    }

    async fn daily_tally(&self, user_id: UserId, day: NaiveDate) -> StoreResult<Option<DailyTally>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.tallies.get(&(user_id, day)).cloned())
    }
}

/// Client session backed by a plain map
#[derive(Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySession {
    pub fn is_empty(&self) -> bool {
        self.values.lock().unwrap().is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.values.lock().unwrap().insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

/// Event collector for testing event emissions
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<PuzzleEvent>>>,
}

impl EventCollector {
    pub fn get_events(&self) -> Vec<PuzzleEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&PuzzleEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }

    pub fn count(&self, check_fn: impl Fn(&PuzzleEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }
}

impl PuzzleEventHandler for EventCollector {
    fn handle_event(&self, event: &PuzzleEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub struct Harness {
    pub engine: PuzzleEngine,
    pub store: Arc<MemoryStore>,
    pub events: EventCollector,
    pub user_id: UserId,
}

impl Harness {
    pub fn new(words: &[&str]) -> Self {
        Self::with_config(words, GameConfig::default())
    }

    pub fn with_config(words: &[&str], config: GameConfig) -> Self {
        let store = Arc::new(MemoryStore::with_words(words));
        let user_id = uuid::Uuid::new_v4();
        store.add_user(user_id);

        let events = EventCollector::default();
        let engine = PuzzleEngine::new(store.clone(), config)
            .with_event_handler(Arc::new(events.clone()));

        Self {
            engine,
            store,
            events,
            user_id,
        }
    }

    /// Secret of the puzzle currently bound in storage
    pub fn bound_secret(&self) -> String {
        let word_id = self
            .store
            .progress(self.user_id)
            .current_puzzle
            .expect("no puzzle bound");
        self.store.word(word_id).as_str().to_string()
    }

    /// A valid guess that is not the bound secret
    pub fn wrong_guess(&self) -> &'static str {
        if self.bound_secret() == "ZZZZZ" {
            "YYYYY"
        } else {
            "ZZZZZ"
        }
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}
