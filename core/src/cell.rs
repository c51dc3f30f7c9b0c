use serde::{Deserialize, Serialize};

/// What a cell holds, fixed once the board is populated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Mine,
    /// Safe cell with the number of mines in its 8-neighborhood.
    Empty(u8),
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Empty(0)
    }
}

/// Player marking on a cell that has not been opened.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cover {
    #[default]
    Unrevealed,
    Flagged,
    QuestionMarked,
}

/// Result of toggling the marking on a cell, as seen by the mine budget.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    FlagSet,
    FlagCleared,
    QuestionMarkCleared,
    Unchanged,
}

impl FlagOutcome {
    /// Change to apply to the remaining-mine counter.
    pub const fn budget_delta(self) -> isize {
        match self {
            Self::FlagSet => -1,
            Self::FlagCleared => 1,
            Self::QuestionMarkCleared | Self::Unchanged => 0,
        }
    }
}

/// UI-facing classification of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewState {
    Unrevealed,
    Flagged,
    QuestionMarked,
    Revealed(u8),
    RevealedMine,
    ExplodedMine,
    /// Flag on a safe cell, shown once the game is over.
    FalseFlagged,
}

impl ViewState {
    /// Single character used by the text dump of a board.
    pub const fn symbol(self) -> char {
        match self {
            Self::Unrevealed => '-',
            Self::Flagged => 'F',
            Self::QuestionMarked => '?',
            Self::Revealed(0) => '.',
            Self::Revealed(count) => (b'0' + count) as char,
            Self::RevealedMine => '*',
            Self::ExplodedMine => 'X',
            Self::FalseFlagged => 'N',
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    kind: CellKind,
    cover: Cover,
    revealed: bool,
    exploded: bool,
}

impl Cell {
    pub const fn new(kind: CellKind) -> Self {
        Self {
            kind,
            cover: Cover::Unrevealed,
            revealed: false,
            exploded: false,
        }
    }

    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    pub const fn cover(&self) -> Cover {
        self.cover
    }

    pub const fn is_mine(&self) -> bool {
        matches!(self.kind, CellKind::Mine)
    }

    /// Adjacent mine count, `None` for mines.
    pub const fn adjacent_mines(&self) -> Option<u8> {
        match self.kind {
            CellKind::Mine => None,
            CellKind::Empty(count) => Some(count),
        }
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.cover, Cover::Flagged)
    }

    pub const fn is_question_marked(&self) -> bool {
        matches!(self.cover, Cover::QuestionMarked)
    }

    /// Neither opened nor flagged, so it still counts against the mine budget.
    pub const fn is_hidden(&self) -> bool {
        !self.revealed && !self.is_flagged()
    }

    /// Opens the cell, returns `true` when it was a mine.
    ///
    /// Flagged cells absorb the click. A question mark does not protect the cell.
    pub fn reveal(&mut self) -> bool {
        if self.is_flagged() {
            return false;
        }
        match self.kind {
            CellKind::Mine => {
                self.exploded = true;
                true
            }
            CellKind::Empty(_) => {
                self.revealed = true;
                self.cover = Cover::Unrevealed;
                false
            }
        }
    }

    /// Opens the cell for the end-of-game display, never signals a loss.
    pub fn force_reveal(&mut self) {
        self.revealed = true;
    }

    pub fn toggle_flag(&mut self, marks_enabled: bool) -> FlagOutcome {
        use Cover::*;
        use FlagOutcome::*;

        if self.revealed {
            return Unchanged;
        }

        match (self.cover, marks_enabled) {
            (Unrevealed, _) => {
                self.cover = Flagged;
                FlagSet
            }
            (Flagged, true) => {
                self.cover = QuestionMarked;
                FlagCleared
            }
            (Flagged, false) => {
                self.cover = Unrevealed;
                FlagCleared
            }
            (QuestionMarked, _) => {
                self.cover = Unrevealed;
                QuestionMarkCleared
            }
        }
    }

    pub fn clear_question_mark(&mut self) {
        if self.is_question_marked() {
            self.cover = Cover::Unrevealed;
        }
    }

    pub fn view_state(&self) -> ViewState {
        match (self.kind, self.cover) {
            (CellKind::Mine, Cover::Flagged) => ViewState::Flagged,
            (CellKind::Mine, _) if self.exploded => ViewState::ExplodedMine,
            (CellKind::Mine, _) if self.revealed => ViewState::RevealedMine,
            (CellKind::Empty(_), Cover::Flagged) if self.revealed => ViewState::FalseFlagged,
            (CellKind::Empty(count), _) if self.revealed => ViewState::Revealed(count),
            (_, Cover::Flagged) => ViewState::Flagged,
            (_, Cover::QuestionMarked) => ViewState::QuestionMarked,
            (_, Cover::Unrevealed) => ViewState::Unrevealed,
        }
    }
}
