//! Game-state engine for a single-player minesweeper board.
//!
//! The crate owns mine placement, adjacency counts, the reveal cascade, flag
//! toggling and win/loss detection. Rendering lives elsewhere: a presentation
//! layer sends [`BoardEngine::reveal`] and [`BoardEngine::toggle_flag`]
//! commands and then re-reads the state through the query methods or a
//! [`BoardSnapshot`].

#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod snapshot;
mod tile;
mod types;

/// Validated board dimensions and mine count.
///
/// Deserializing goes through [`GameConfig::new`], so a config file can never
/// describe a board that cannot be generated or won.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    size: Coord2,
    mines: CellCount,
}

#[derive(Deserialize)]
struct RawGameConfig {
    size: Coord2,
    mines: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new(raw.size, raw.mines)
    }
}

impl GameConfig {
    pub fn new((rows, cols): Coord2, mines: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyBoard { rows, cols }.into());
        }

        let cells = mult(rows, cols);
        if mines >= cells {
            return Err(ConfigError::TooManyMines { mines, cells }.into());
        }

        Ok(Self {
            size: (rows, cols),
            mines,
        })
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

/// Immutable hazard layout: where the mines are and how many touch each cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<bool>", into = "Array2<bool>")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacency: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Builds a layout from an explicit mask, `mask[[row, col]]` being `true` for a mine.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let size = array_size(&mine_mask).ok_or(GameError::InvalidBoardShape)?;
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let mine_count = mine_count
            .try_into()
            .map_err(|_| GameError::InvalidBoardShape)?;
        GameConfig::new(size, mine_count)?;

        Ok(Self::from_mine_mask_unchecked(mine_mask))
    }

    /// Builds a layout from a list of mine positions. Duplicates collapse into one mine.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        GameConfig::new(size, 0)?;
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfRange { coords, size });
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    /// Caller guarantees the mask fits [`Coord2`] and leaves at least one safe cell.
    pub(crate) fn from_mine_mask_unchecked(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        let (rows, cols) = mine_mask.dim();
        let size = (rows as Coord, cols as Coord);
        let adjacency = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            neighbors((row as Coord, col as Coord), size)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count() as u8
        });

        Self {
            mine_mask,
            adjacency,
            mine_count,
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfRange { coords, size })
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    /// Number of mines among the up to 8 neighbors of `coords`.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> Result<u8> {
        let coords = self.validate_coords(coords)?;
        Ok(self.adjacency[coords.to_nd_index()])
    }

    /// Every mine position in row-major order.
    pub fn mine_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn cell_value(&self, coords: Coord2) -> CellValue {
        if self[coords] {
            CellValue::Mine
        } else {
            CellValue::Safe(self.adjacency[coords.to_nd_index()])
        }
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        neighbors(coords, self.size())
    }
}

impl TryFrom<Array2<bool>> for MineLayout {
    type Error = GameError;

    fn try_from(mine_mask: Array2<bool>) -> Result<Self> {
        Self::from_mine_mask(mine_mask)
    }
}

impl From<MineLayout> for Array2<bool> {
    fn from(layout: MineLayout) -> Self {
        layout.mine_mask
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}
