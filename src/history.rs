use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::store::{SharedStore, StoreError};

/// Store key holding the JSON array of finished rating rounds
pub const HISTORY_KEY: &str = "hangman_games";

/// Snapshot of a finished rating round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub game_id: i64,
    pub theme: String,
    pub score: u32,
    pub hints_used: u8,
    pub words_guessed: u32,
    pub is_winner: bool,
    pub timestamp: DateTime<Utc>,
}

impl RoundSummary {
    pub fn new(
        theme: &str,
        score: u32,
        hint_used: bool,
        words_guessed: u32,
        is_winner: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            game_id: timestamp.timestamp_millis(),
            theme: theme.to_string(),
            score,
            hints_used: u8::from(hint_used),
            words_guessed,
            is_winner,
            timestamp,
        }
    }
}

/// Receives finished rounds. Failures are reported but never undo the round.
pub trait HistoryRecorder {
    fn record(&mut self, summary: &RoundSummary) -> Result<(), StoreError>;
}

/// History log kept under [`HISTORY_KEY`] in a key-value store
#[derive(Clone)]
pub struct History {
    store: SharedStore,
}

impl History {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Recorded rounds in insertion order. Store failures are returned; a
    /// malformed log reads as empty so the next round starts a fresh one.
    pub fn load(&self) -> Result<Vec<RoundSummary>, StoreError> {
        let Some(raw) = self.store.borrow().get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("ignoring malformed game history: {e}");
            Vec::new()
        }))
    }

    /// Like [`History::load`], with unreadable data shown as no history
    pub fn entries(&self) -> Vec<RoundSummary> {
        self.load().unwrap_or_else(|e| {
            log::warn!("could not read game history: {e}");
            Vec::new()
        })
    }

    /// Winners first, then higher score, then most recent
    pub fn leaderboard(&self) -> Vec<RoundSummary> {
        self.entries()
            .into_iter()
            .sorted_by(|a, b| {
                b.is_winner
                    .cmp(&a.is_winner)
                    .then_with(|| b.score.cmp(&a.score))
                    .then_with(|| b.timestamp.cmp(&a.timestamp))
            })
            .collect()
    }

    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize, StoreError> {
        let entries = self.leaderboard();
        let mut writer = csv::Writer::from_path(path)?;
        for entry in &entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(entries.len())
    }
}

impl HistoryRecorder for History {
    fn record(&mut self, summary: &RoundSummary) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.push(summary.clone());
        let encoded = serde_json::to_string(&entries)?;
        self.store.borrow_mut().set(HISTORY_KEY, &encoded)
    }
}
