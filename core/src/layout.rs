use core::ops::Index;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Where each mine sits on a board, independent of any play state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        Self {
            mine_mask,
            mine_count: CellCount::try_from(mine_count).unwrap_or(CellCount::MAX),
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most eight neighbors
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Cells the generator must keep free of mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SafeZone {
    /// Nothing is protected, used when the game starts with a flag.
    Nowhere,
    /// Only the clicked cell is safe, it may still touch mines.
    Cell(Coord2),
    /// The clicked cell and its neighbors are safe, so it opens as a blank.
    Neighborhood(Coord2),
}

impl SafeZone {
    pub fn around(first_click: Option<Coord2>, avoid_neighborhood: bool) -> Self {
        match first_click {
            None => Self::Nowhere,
            Some(coords) if avoid_neighborhood => Self::Neighborhood(coords),
            Some(coords) => Self::Cell(coords),
        }
    }

    pub fn protects(self, coords: Coord2) -> bool {
        match self {
            Self::Nowhere => false,
            Self::Cell(center) => center == coords,
            Self::Neighborhood(center) => is_within_one(center, coords),
        }
    }

    /// Number of in-bounds cells the zone keeps free.
    pub fn reserved_cells(self, size: Coord2) -> CellCount {
        match self {
            Self::Nowhere => 0,
            Self::Cell(_) => 1,
            Self::Neighborhood(center) => 1 + NeighborIter::new(center, size).count() as CellCount,
        }
    }

    /// Next weaker guarantee, used when the board is too full for this one.
    const fn weaken(self) -> Self {
        match self {
            Self::Neighborhood(center) => Self::Cell(center),
            Self::Cell(_) | Self::Nowhere => Self::Nowhere,
        }
    }
}

pub trait MineGenerator {
    fn generate(&mut self, size: Coord2, mines: CellCount, safe_zone: SafeZone) -> MineLayout;
}

/// Uniformly random placement that honors the safe zone whenever the board has room for it.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    fn fit_safe_zone(size: Coord2, mines: CellCount, requested: SafeZone) -> SafeZone {
        let total_cells = mult(size.0, size.1);
        let mut safe_zone = requested;
        while safe_zone != SafeZone::Nowhere
            && mines > total_cells.saturating_sub(safe_zone.reserved_cells(size))
        {
            let weaker = safe_zone.weaken();
            log::warn!(
                "Cannot keep {:?} free of {} mines on a {}x{} board, fallback to {:?}",
                safe_zone,
                mines,
                size.0,
                size.1,
                weaker
            );
            safe_zone = weaker;
        }
        safe_zone
    }
}

impl Default for RandomMineGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, size: Coord2, mines: CellCount, safe_zone: SafeZone) -> MineLayout {
        let safe_zone = Self::fit_safe_zone(size, mines, safe_zone);

        let (rows, cols) = size;
        let candidates: Vec<Coord2> = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .filter(|&coords| !safe_zone.protects(coords))
            .collect();

        let amount = usize::from(mines).min(candidates.len());
        if amount < usize::from(mines) {
            log::warn!(
                "Minefield already full, requested {} mines but only {} fit",
                mines,
                amount
            );
        }

        // sampling distinct indices bounds the work by the board size, however dense
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for index in rand::seq::index::sample(&mut self.rng, candidates.len(), amount) {
            mine_mask[candidates[index].to_nd_index()] = true;
        }

        log::debug!(
            "Generated {} mines on a {}x{} board, safe zone {:?}",
            amount,
            rows,
            cols,
            safe_zone
        );
        MineLayout::from_mine_mask(mine_mask)
    }
}

/// Always hands out the same layout, for replays and scripted boards.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator {
    layout: MineLayout,
}

impl FixedMineGenerator {
    pub fn new(layout: MineLayout) -> Self {
        Self { layout }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        MineLayout::from_mine_coords(size, mine_coords).map(Self::new)
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(&mut self, size: Coord2, mines: CellCount, safe_zone: SafeZone) -> MineLayout {
        if size != self.layout.size() || mines != self.layout.mine_count() {
            log::warn!(
                "Fixed layout is {:?} with {} mines, requested {:?} with {}",
                self.layout.size(),
                self.layout.mine_count(),
                size,
                mines
            );
        }
        if self.layout.iter_mines().any(|coords| safe_zone.protects(coords)) {
            log::debug!("Fixed layout places a mine inside {:?}", safe_zone);
        }
        self.layout.clone()
    }
}
