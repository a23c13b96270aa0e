//! Leaderboard reporting
//!
//! A won round with a named player is submitted to a score store, then the
//! full descending list gives the rank and the first ten are shown. The store
//! is best effort: any failure is logged and the end screen carries on with
//! whatever was fetched.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sim::Outcome;

/// Number of entries shown on the end screen
pub const MAX_DISPLAYED: usize = 10;

/// Leaderboard persistence failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard data is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("leaderboard storage is unavailable")]
    Unavailable,
}

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: u32,
}

/// Backing store for the leaderboard
pub trait ScoreStore {
    fn insert(&mut self, entry: ScoreEntry) -> Result<(), StoreError>;

    /// Every stored score, highest first
    fn scores_desc(&self) -> Result<Vec<ScoreEntry>, StoreError>;

    /// The best `n` scores, highest first
    fn top(&self, n: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        let mut scores = self.scores_desc()?;
        scores.truncate(n);
        Ok(scores)
    }
}

/// What the end screen shows after reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Whether the score made it into the store
    pub submitted: bool,
    /// 1-indexed rank among all stored scores
    pub rank: Option<usize>,
    pub top: Vec<ScoreEntry>,
}

/// Report a finished round. Never fails: store errors are logged and the
/// standing holds whatever could still be read.
pub fn report_outcome<S: ScoreStore + ?Sized>(
    store: &mut S,
    username: &str,
    outcome: &Outcome,
    score: u32,
) -> Standing {
    let mut standing = Standing::default();
    let username = username.trim();

    if outcome.player_won() && !username.is_empty() && score > 0 {
        let entry = ScoreEntry {
            username: username.to_string(),
            score,
        };
        match store.insert(entry) {
            Ok(()) => {
                standing.submitted = true;
                log::info!("Submitted score {} for {}", score, username);
            }
            Err(e) => log::warn!("Could not submit score: {}", e),
        }
    }

    if standing.submitted {
        match store.scores_desc() {
            Ok(scores) => standing.rank = Some(rank_of(&scores, score)),
            Err(e) => log::warn!("Could not fetch scores for rank: {}", e),
        }
    }

    match store.top(MAX_DISPLAYED) {
        Ok(top) => standing.top = top,
        Err(e) => log::warn!("Could not fetch leaderboard: {}", e),
    }

    standing
}

/// Rank of `score` in a descending list: one more than the strictly better scores
pub fn rank_of(scores: &[ScoreEntry], score: u32) -> usize {
    scores.iter().filter(|e| e.score > score).count() + 1
}

/// In-memory store, kept sorted by score descending
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    pub entries: Vec<ScoreEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    fn insert_sorted(&mut self, entry: ScoreEntry) {
        // Ties keep earlier entries ahead
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
    }
}

impl ScoreStore for MemoryStore {
    fn insert(&mut self, entry: ScoreEntry) -> Result<(), StoreError> {
        self.insert_sorted(entry);
        Ok(())
    }

    fn scores_desc(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.entries.clone())
    }
}

/// Store backed by a JSON file (native builds)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<MemoryStore, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(MemoryStore::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, scores: &MemoryStore) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(scores)?;
        std::fs::write(&self.path, json)?;
        log::info!("Leaderboard saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn insert(&mut self, entry: ScoreEntry) -> Result<(), StoreError> {
        let mut scores = self.load()?;
        scores.insert_sorted(entry);
        self.save(&scores)
    }

    fn scores_desc(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.load()?.entries)
    }
}

/// Store backed by LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "snake_duel_leaderboard";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }

    fn load(&self) -> Result<MemoryStore, StoreError> {
        let storage = Self::storage()?;
        match storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable)?
        {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(MemoryStore::new()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn insert(&mut self, entry: ScoreEntry) -> Result<(), StoreError> {
        let mut scores = self.load()?;
        scores.insert_sorted(entry);
        let json = serde_json::to_string(&scores)?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable)
    }

    fn scores_desc(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.load()?.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{OutcomeCause, Side};

    fn win() -> Outcome {
        Outcome {
            cause: OutcomeCause::ScoreReached,
            triggered_by: Side::Player,
        }
    }

    fn loss() -> Outcome {
        Outcome {
            cause: OutcomeCause::WallCollision,
            triggered_by: Side::Player,
        }
    }

    fn entry(name: &str, score: u32) -> ScoreEntry {
        ScoreEntry {
            username: name.to_string(),
            score,
        }
    }

    /// Store that fails every call
    struct Offline;

    impl ScoreStore for Offline {
        fn insert(&mut self, _entry: ScoreEntry) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }

        fn scores_desc(&self) -> Result<Vec<ScoreEntry>, StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    /// Store that accepts writes but cannot be read back
    #[derive(Default)]
    struct WriteOnly {
        written: Vec<ScoreEntry>,
    }

    impl ScoreStore for WriteOnly {
        fn insert(&mut self, entry: ScoreEntry) -> Result<(), StoreError> {
            self.written.push(entry);
            Ok(())
        }

        fn scores_desc(&self) -> Result<Vec<ScoreEntry>, StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_memory_store_sorted() {
        let mut store = MemoryStore::new();
        store.insert(entry("a", 5)).unwrap();
        store.insert(entry("b", 12)).unwrap();
        store.insert(entry("c", 8)).unwrap();
        store.insert(entry("d", 8)).unwrap();
        let names: Vec<_> = store.entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["b", "c", "d", "a"]);
        assert_eq!(store.top_score(), Some(12));
    }

    #[test]
    fn test_report_win_ranks() {
        let mut store = MemoryStore::new();
        for (i, score) in [20, 15, 10, 10, 3].into_iter().enumerate() {
            store.insert(entry(&format!("p{}", i), score)).unwrap();
        }
        let standing = report_outcome(&mut store, "  neo ", &win(), 12);
        assert!(standing.submitted);
        assert_eq!(standing.rank, Some(3));
        assert_eq!(standing.top.len(), 6);
        assert!(standing.top.contains(&entry("neo", 12)));
    }

    #[test]
    fn test_top_limited_to_ten() {
        let mut store = MemoryStore::new();
        for i in 0..15 {
            store.insert(entry("x", i)).unwrap();
        }
        let standing = report_outcome(&mut store, "", &loss(), 0);
        assert_eq!(standing.top.len(), MAX_DISPLAYED);
        assert_eq!(standing.top[0].score, 14);
    }

    #[test]
    fn test_no_submit_without_win_name_or_score() {
        let mut store = MemoryStore::new();
        assert!(!report_outcome(&mut store, "neo", &loss(), 7).submitted);
        assert!(!report_outcome(&mut store, "   ", &win(), 7).submitted);
        assert!(!report_outcome(&mut store, "neo", &win(), 0).submitted);
        assert!(store.is_empty());
    }

    #[test]
    fn test_offline_store_does_not_fail() {
        let standing = report_outcome(&mut Offline, "neo", &win(), 10);
        assert_eq!(standing, Standing::default());
    }

    #[test]
    fn test_partial_data_when_reads_fail() {
        let mut store = WriteOnly::default();
        let standing = report_outcome(&mut store, "neo", &win(), 10);
        assert!(standing.submitted);
        assert_eq!(standing.rank, None);
        assert!(standing.top.is_empty());
        assert_eq!(store.written.len(), 1);
    }

    #[test]
    fn test_json_file_store_round() {
        let path = std::env::temp_dir().join(format!(
            "snake_duel_scores_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::new(&path);
        assert!(store.scores_desc().unwrap().is_empty());
        let standing = report_outcome(&mut store, "neo", &win(), 10);
        assert_eq!(standing.rank, Some(1));

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.scores_desc().unwrap(), vec![entry("neo", 10)]);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(reopened.scores_desc(), Err(StoreError::Json(_))));
        let _ = std::fs::remove_file(&path);
    }
}
