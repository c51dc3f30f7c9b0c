//! Plain values a front end persists between sessions. None of them touch the board.

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player: String,
    pub seconds: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub difficulty: Difficulty,
    pub record: ScoreRecord,
}

impl ScoreEntry {
    /// Columns shown in a best-times table: board, time, player.
    pub fn report(&self) -> [String; 3] {
        [
            self.difficulty.to_string(),
            format!("{} seconds", self.record.seconds),
            self.record.player.clone(),
        ]
    }
}

/// Best time per difficulty, kept sorted from easiest to hardest board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self, difficulty: Difficulty) -> Option<&ScoreRecord> {
        self.position(difficulty)
            .ok()
            .map(|index| &self.entries[index].record)
    }

    pub fn is_new_best(&self, difficulty: Difficulty, seconds: u32) -> bool {
        self.best(difficulty)
            .is_none_or(|record| seconds < record.seconds)
    }

    /// Stores the time if it beats the current best, returns whether it did.
    pub fn submit(
        &mut self,
        difficulty: Difficulty,
        player: impl Into<String>,
        seconds: u32,
    ) -> bool {
        let record = ScoreRecord {
            player: player.into(),
            seconds,
        };
        match self.position(difficulty) {
            Ok(index) if seconds < self.entries[index].record.seconds => {
                self.entries[index].record = record;
            }
            Ok(_) => return false,
            Err(index) => self.entries.insert(index, ScoreEntry { difficulty, record }),
        }
        log::debug!("New best time for {}: {}s", difficulty, seconds);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, difficulty: Difficulty) -> core::result::Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| entry.difficulty.cmp(&difficulty))
    }
}

/// Last-used settings, restored when the application opens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub selected: Difficulty,
    pub last_custom: Option<Difficulty>,
    pub options: GameOptions,
}

impl Preferences {
    /// Remembers `difficulty` as the selection, and as the last custom board if it is one.
    pub fn select(&mut self, difficulty: Difficulty) {
        self.selected = difficulty;
        if !difficulty.is_preset() {
            self.last_custom = Some(difficulty);
        }
    }

    pub fn new_game(&self) -> Game {
        Game::new(self.selected, self.options)
    }
}
