//! Run leaderboard for the current session
//!
//! Memory only; nothing survives the process.

use serde::Serialize;

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighScoreEntry {
    /// Coins collected
    pub score: u32,
    /// Meters traveled
    pub distance: u32,
    /// Ticks survived
    pub ticks: u64,
}

/// Best runs, highest score first. Ties go to the longer run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn beats(entry: &HighScoreEntry, other: &HighScoreEntry) -> bool {
        (entry.score, entry.distance) > (other.score, other.distance)
    }

    /// Check if a run would make the board
    pub fn qualifies(&self, entry: &HighScoreEntry) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .last()
            .map(|e| Self::beats(entry, e))
            .unwrap_or(true)
    }

    /// Add a run. Returns the rank achieved (1-indexed) or None if it didn't place.
    pub fn record(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(&entry) {
            return None;
        }

        let pos = self
            .entries
            .iter()
            .position(|e| Self::beats(&entry, e))
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}
