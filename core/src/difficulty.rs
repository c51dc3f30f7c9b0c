use core::cmp::Ordering;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions and mine count for one game session.
///
/// Ordered by mine density (mines per cell), which is how custom boards are
/// ranked against each other. Boards with the same density fall back to
/// comparing `(rows, cols, mines)` so that the order agrees with equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Difficulty {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl Difficulty {
    pub const MIN_ROWS: Coord = 2;
    pub const MIN_COLS: Coord = 9;
    /// Cells that are always left free so the first click can open a blank area.
    pub const RESERVED_CELLS: CellCount = 9;

    pub const BEGINNER: Self = Self::new_unchecked(10, 10, 9);
    pub const INTERMEDIATE: Self = Self::new_unchecked(16, 16, 40);
    pub const EXPERT: Self = Self::new_unchecked(16, 30, 99);

    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        Self::new_unchecked(rows, cols, mines).validate()
    }

    /// Checks that mines can always be placed around a first click.
    pub fn validate(self) -> Result<Self> {
        if self.rows < Self::MIN_ROWS {
            return Err(GameError::TooFewRows {
                rows: self.rows,
                min: Self::MIN_ROWS,
            });
        }
        if self.cols < Self::MIN_COLS {
            return Err(GameError::TooFewColumns {
                cols: self.cols,
                min: Self::MIN_COLS,
            });
        }
        if self.mines < 1 {
            return Err(GameError::TooFewMines);
        }
        let max = self.max_mines();
        if self.mines > max {
            return Err(GameError::TooManyMines {
                mines: self.mines,
                max,
            });
        }
        Ok(self)
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    /// Largest mine count that still leaves more than the reserved cells free.
    pub const fn max_mines(&self) -> CellCount {
        self.total_cells()
            .saturating_sub(Self::RESERVED_CELLS)
            .saturating_sub(1)
    }

    pub fn is_preset(&self) -> bool {
        [Self::BEGINNER, Self::INTERMEDIATE, Self::EXPERT].contains(self)
    }

    fn density_cmp(&self, other: &Self) -> Ordering {
        let lhs = u64::from(self.mines) * u64::from(other.total_cells());
        let rhs = u64::from(other.mines) * u64::from(self.total_cells());
        lhs.cmp(&rhs)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::INTERMEDIATE
    }
}

impl Ord for Difficulty {
    fn cmp(&self, other: &Self) -> Ordering {
        self.density_cmp(other).then_with(|| {
            (self.rows, self.cols, self.mines).cmp(&(other.rows, other.cols, other.mines))
        })
    }
}

impl PartialOrd for Difficulty {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BEGINNER => f.write_str("Beginner"),
            Self::INTERMEDIATE => f.write_str("Intermediate"),
            Self::EXPERT => f.write_str("Expert"),
            Self { rows, cols, mines } => write!(f, "Custom (H:{rows}, W:{cols}, M:{mines})"),
        }
    }
}
