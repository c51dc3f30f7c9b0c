use core::fmt;
use core::ops::BitOr;
use std::collections::VecDeque;

use ndarray::Array2;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_loss(self) -> bool {
        matches!(self, Self::HitMine)
    }
}

/// Used to merge outcomes when several cells open in one action
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// What a chord click on a revealed number would do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChordAction {
    None,
    /// Flags account for every adjacent mine, open the rest.
    Reveal,
    /// Every hidden neighbor must be a mine, flag them.
    Flag,
}

/// Grid of cells and the rules that act on it.
///
/// The grid starts unpopulated; every cell reads as unrevealed until
/// [`Board::populate`] lays out the mines. Each mutation queues the cells
/// whose [`ViewState`] changed into the board's [`ChangeFeed`].
#[derive(Clone, Debug)]
pub struct Board {
    cells: Array2<Cell>,
    populated: bool,
    changes: ChangeFeed,
}

impl Board {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
            populated: false,
            changes: ChangeFeed::new(),
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn view_state(&self, coords: Coord2) -> ViewState {
        self.cell_at(coords).view_state()
    }

    pub fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    pub fn drain_changes(&mut self) -> Vec<Coord2> {
        self.changes.drain()
    }

    /// Lays out `total_mines` mines, keeping the first click safe.
    ///
    /// With `avoid_neighborhood` the first click and its neighbors stay free so it
    /// opens as a blank, otherwise only the clicked cell itself is guaranteed safe.
    /// A game started with a flag passes no first click and nothing is protected.
    ///
    /// Returns the number of mines actually placed, which is lower than
    /// `total_mines` when the board cannot hold them all.
    pub fn populate(
        &mut self,
        first_click: Option<Coord2>,
        total_mines: CellCount,
        avoid_neighborhood: bool,
        generator: &mut impl MineGenerator,
    ) -> CellCount {
        let safe_zone = SafeZone::around(first_click, avoid_neighborhood);
        let layout = generator.generate(self.size(), total_mines, safe_zone);
        self.populate_with_layout(&layout);
        layout.mine_count()
    }

    /// Fills every cell from `layout` and computes the adjacency counts once.
    ///
    /// # Panics
    ///
    /// When the layout size differs from the board size.
    pub fn populate_with_layout(&mut self, layout: &MineLayout) {
        assert_eq!(layout.size(), self.size(), "mine layout does not fit the board");

        for ((row, col), cell) in self.cells.indexed_iter_mut() {
            let coords = (row as Coord, col as Coord);
            let kind = if layout.contains_mine(coords) {
                CellKind::Mine
            } else {
                CellKind::Empty(layout.adjacent_mine_count(coords))
            };
            *cell = Cell::new(kind);
        }
        self.populated = true;
        log::debug!(
            "Populated {:?} board with {} mines",
            self.size(),
            layout.mine_count()
        );
    }

    /// Opens a cell, flood filling from blanks.
    ///
    /// A revealed cell is chorded instead when `allow_chord_on_revealed` is set
    /// and its adjacent flags match its number.
    pub fn left_click(&mut self, coords: Coord2, allow_chord_on_revealed: bool) -> RevealOutcome {
        let cell = self.cell_at(coords);
        if cell.is_revealed() {
            if allow_chord_on_revealed && self.check_chord(coords) == ChordAction::Reveal {
                return self.chord_reveal(coords);
            }
            return RevealOutcome::NoChange;
        }
        self.open(coords)
    }

    pub fn right_click(&mut self, coords: Coord2, marks_enabled: bool) -> FlagOutcome {
        self.update_cell(coords, |cell| cell.toggle_flag(marks_enabled))
    }

    pub fn check_chord(&self, coords: Coord2) -> ChordAction {
        let cell = self.cell_at(coords);
        let Some(count) = cell.adjacent_mines() else {
            return ChordAction::None;
        };
        if !cell.is_revealed() {
            return ChordAction::None;
        }

        let (flagged, hidden) = self
            .cells
            .iter_neighbors(coords)
            .map(|pos| self.cell_at(pos))
            .fold((0u8, 0u8), |(flagged, hidden), neighbor| {
                if neighbor.is_flagged() {
                    (flagged + 1, hidden)
                } else if neighbor.is_hidden() {
                    (flagged, hidden + 1)
                } else {
                    (flagged, hidden)
                }
            });

        if flagged == count {
            ChordAction::Reveal
        } else if flagged + hidden == count {
            ChordAction::Flag
        } else {
            ChordAction::None
        }
    }

    /// Opens every hidden, unflagged neighbor.
    ///
    /// Only the first mine hit explodes, later mines in the same chord stay covered.
    pub fn chord_reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let mut outcome = RevealOutcome::NoChange;
        for pos in self.cells.iter_neighbors(coords) {
            if outcome.is_loss() && self.cell_at(pos).is_mine() {
                continue;
            }
            outcome = outcome | self.open(pos);
        }
        log::trace!("Chord reveal at {:?}: {:?}", coords, outcome);
        outcome
    }

    /// Flags every hidden neighbor, question marks included, and returns how many were flagged.
    pub fn chord_flag(&mut self, coords: Coord2) -> CellCount {
        let mut flagged = 0;
        for pos in self.cells.iter_neighbors(coords) {
            if self.cell_at(pos).is_hidden() {
                self.flag(pos);
                flagged += 1;
            }
        }
        log::trace!("Chord flag at {:?}: {} flagged", coords, flagged);
        flagged
    }

    /// Whether the cells neither revealed nor flagged fit in the remaining mine budget.
    pub fn all_hidden_within_mine_budget(&self, mines_remaining: isize) -> bool {
        let Ok(budget) = usize::try_from(mines_remaining) else {
            return false;
        };
        // stops at the first hidden cell past the budget
        self.cells
            .iter()
            .filter(|cell| cell.is_hidden())
            .nth(budget)
            .is_none()
    }

    /// Shows every mine and every wrong flag for the end-of-game display.
    pub fn reveal_all(&mut self) {
        for coords in self.all_coords() {
            let cell = self.cell_at(coords);
            if !cell.is_revealed() && (cell.is_mine() || cell.is_flagged()) {
                self.update_cell(coords, Cell::force_reveal);
            }
        }
    }

    pub fn clear_question_marks(&mut self) {
        for coords in self.all_coords() {
            if self.cell_at(coords).is_question_marked() {
                self.update_cell(coords, Cell::clear_question_mark);
            }
        }
    }

    /// Flags every cell that is still hidden and returns how many were flagged.
    pub fn flag_all_hidden(&mut self) -> CellCount {
        let mut flagged = 0;
        for coords in self.all_coords() {
            if self.cell_at(coords).is_hidden() {
                self.flag(coords);
                flagged += 1;
            }
        }
        flagged
    }

    fn flag(&mut self, coords: Coord2) {
        self.update_cell(coords, |cell| {
            cell.clear_question_mark();
            cell.toggle_flag(false)
        });
    }

    /// Reveals a single covered cell and flood fills when it is a blank.
    fn open(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.cell_at(coords);
        if cell.is_revealed() || cell.is_flagged() {
            return RevealOutcome::NoChange;
        }

        if self.update_cell(coords, Cell::reveal) {
            log::debug!("Hit mine at {:?}", coords);
            return RevealOutcome::HitMine;
        }

        log::trace!("Open cell at {:?}, mine count: {:?}", coords, cell.adjacent_mines());
        if cell.adjacent_mines() == Some(0) {
            self.flood_fill(coords);
        }
        RevealOutcome::Revealed
    }

    /// Opens the region of blanks connected to `start` plus the numbers bordering it.
    fn flood_fill(&mut self, start: Coord2) {
        let mut to_visit: VecDeque<Coord2> = self.cells.iter_neighbors(start).collect();

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = self.cell_at(visit_coords);

            // skip flagged or already opened cells
            if cell.is_revealed() || cell.is_flagged() {
                continue;
            }

            self.update_cell(visit_coords, Cell::reveal);
            log::trace!(
                "Flood opened cell at {:?}, mine count: {:?}",
                visit_coords,
                cell.adjacent_mines()
            );

            // if this is also a blank we visit the neighbors
            if cell.adjacent_mines() == Some(0) {
                to_visit.extend(
                    self.cells
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| !self.cell_at(pos).is_revealed()),
                );
            }
        }
    }

    /// Applies `update` to one cell and queues it when its view changed.
    fn update_cell<R>(&mut self, coords: Coord2, update: impl FnOnce(&mut Cell) -> R) -> R {
        let cell = &mut self.cells[coords.to_nd_index()];
        let before = cell.view_state();
        let result = update(cell);
        if cell.view_state() != before {
            self.changes.push(coords);
        }
        result
    }

    fn all_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

/// Text dump of the board for debugging, one symbol per cell.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.size();

        f.write_str("     ")?;
        for col in 0..cols {
            write!(f, "{} ", col / 10 % 10)?;
        }
        f.write_str("\n     ")?;
        for col in 0..cols {
            write!(f, "{} ", col % 10)?;
        }
        f.write_str("\n\n")?;

        for row in 0..rows {
            write!(f, "{row:>2}   ")?;
            for col in 0..cols {
                write!(f, "{} ", self.view_state((row, col)).symbol())?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
