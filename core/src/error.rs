use thiserror::Error;

use crate::{CellCount, Coord, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board dimensions must be positive, got {rows}x{cols}")]
    EmptyBoard { rows: Coord, cols: Coord },
    #[error("Too many mines: {mines} requested but the board only has {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Coordinates {coords:?} are outside of the {}x{} board", .size.0, .size.1)]
    OutOfRange { coords: Coord2, size: Coord2 },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Cell {coords:?} shows {count} adjacent mines, at most 8 are possible")]
    InvalidCount { coords: Coord2, count: u8 },
    #[error("Mine list is not in strictly increasing row-major order at {0:?}")]
    UnorderedMines(Coord2),
}

pub type Result<T> = core::result::Result<T, GameError>;
