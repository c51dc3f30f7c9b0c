use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Independent behavior switches for a game session.
    ///
    /// The raw `u8` from [`GameOptions::bits`] is the storage form; unknown bits
    /// are dropped by [`GameOptions::from_bits_truncate`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct GameOptions: u8 {
        /// Keep the first clicked cell and its eight neighbors free of mines.
        const AVOID_FIRST_CLICK = 1;
        /// Left click on a revealed number attempts a chord.
        const CHORD_ON_REVEALED = 1 << 1;
        /// Right click cycles through a question mark after the flag.
        const QUESTION_MARKS    = 1 << 2;
        /// Flag whatever is left once only mines remain hidden, then win.
        const AUTO_FLAG_ON_WIN  = 1 << 3;
        /// Chord click may flag every hidden neighbor that must be a mine.
        const FLAG_CHORD        = 1 << 4;
    }
}

impl GameOptions {
    pub const fn avoid_first_click(self) -> bool {
        self.contains(Self::AVOID_FIRST_CLICK)
    }

    pub const fn chord_on_revealed(self) -> bool {
        self.contains(Self::CHORD_ON_REVEALED)
    }

    pub const fn question_marks(self) -> bool {
        self.contains(Self::QUESTION_MARKS)
    }

    pub const fn auto_flag_on_win(self) -> bool {
        self.contains(Self::AUTO_FLAG_ON_WIN)
    }

    pub const fn flag_chord(self) -> bool {
        self.contains(Self::FLAG_CHORD)
    }
}
