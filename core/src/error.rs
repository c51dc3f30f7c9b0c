use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board needs at least {min} rows, got {rows}")]
    TooFewRows { rows: Coord, min: Coord },
    #[error("Board needs at least {min} columns, got {cols}")]
    TooFewColumns { cols: Coord, min: Coord },
    #[error("Board needs at least one mine")]
    TooFewMines,
    #[error("Too many mines, {mines} requested but at most {max} fit")]
    TooManyMines { mines: CellCount, max: CellCount },
}

pub type Result<T> = core::result::Result<T, GameError>;
