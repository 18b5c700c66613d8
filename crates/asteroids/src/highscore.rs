//! In-memory highscore board

use rust_engine::config::Config;
use serde::{Deserialize, Serialize};

use crate::services::HighscoreStore;

/// One line of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player name
    pub name: String,
    /// Final score
    pub score: u32,
}

/// Bounded highscore list, best score first
///
/// Serialisable through [`Config`], so a host can keep it in a TOML or RON
/// file between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreBoard {
    length: usize,
    entries: Vec<ScoreEntry>,
}

impl HighscoreBoard {
    /// Empty board keeping at most `length` entries
    pub fn new(length: usize) -> Self {
        Self {
            length,
            entries: Vec::with_capacity(length),
        }
    }

    /// Entries, best first
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Maximum number of entries
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for HighscoreBoard {
    fn default() -> Self {
        Self::new(15)
    }
}

impl Config for HighscoreBoard {}

impl HighscoreStore for HighscoreBoard {
    fn is_qualifying(&self, score: u32) -> bool {
        if self.entries.len() < self.length {
            return true;
        }
        self.entries.last().is_some_and(|last| score > last.score)
    }

    fn record(&mut self, name: &str, score: u32) -> bool {
        if !self.is_qualifying(score) {
            return false;
        }

        // After every equal score so earlier entries keep their place
        let at = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(
            at,
            ScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(self.length);
        true
    }
}
