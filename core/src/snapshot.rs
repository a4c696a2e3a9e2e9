use alloc::vec::Vec;
use core::fmt::{self, Write as _};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Owned copy of everything a presentation layer needs to draw the board.
///
/// Taking a snapshot never touches the engine. Once the game is lost the
/// snapshot also lists every mine so they can be drawn on top of the hidden
/// cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub mine_count: CellCount,
    pub flagged_count: CellCount,
    pub outcome: GameOutcome,
    pub cells: Array2<EngineCell>,
    /// Row-major mine positions, empty unless the game was lost.
    pub shown_mines: Vec<Coord2>,
}

impl BoardSnapshot {
    pub fn from_engine(engine: &BoardEngine) -> Self {
        let shown_mines = match engine.outcome() {
            GameOutcome::Lost => engine.mine_positions().collect(),
            GameOutcome::InProgress | GameOutcome::Won => Vec::new(),
        };

        Self {
            size: engine.size(),
            mine_count: engine.total_mines(),
            flagged_count: engine.flagged_count(),
            outcome: engine.outcome(),
            cells: engine.board().clone(),
            shown_mines,
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<EngineCell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn is_mine_shown(&self, coords: Coord2) -> bool {
        self.shown_mines.binary_search(&coords).is_ok()
    }

    pub fn validate(&self) -> Result<()> {
        let expected = (self.size.0 as usize, self.size.1 as usize);
        if self.cells.dim() != expected {
            return Err(GameError::InvalidBoardShape);
        }

        for ((row, col), &cell) in self.cells.indexed_iter() {
            if let Some(CellValue::Safe(count)) = cell.revealed_value()
                && count > 8
            {
                let coords = (row as Coord, col as Coord);
                return Err(GameError::InvalidCount { coords, count });
            }
        }

        if let Some(&coords) = self
            .shown_mines
            .iter()
            .find(|&&(row, col)| row >= self.size.0 || col >= self.size.1)
        {
            return Err(GameError::OutOfRange {
                coords,
                size: self.size,
            });
        }

        // is_mine_shown relies on binary search
        if let Some(pair) = self.shown_mines.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(GameError::UnorderedMines(pair[1]));
        }

        Ok(())
    }

    /// Cells that are either hidden or flagged.
    pub fn unrevealed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_unrevealed()).count()
    }

    fn symbol(&self, coords: Coord2, cell: EngineCell) -> char {
        if cell.is_flagged() {
            return 'F';
        }

        match cell.revealed_value() {
            Some(CellValue::Mine) => '*',
            Some(CellValue::Safe(count)) => char::from_digit(count.into(), 10).unwrap_or('?'),
            None if self.is_mine_shown(coords) => '*',
            None => '.',
        }
    }
}

/// Text grid, one board row per line.
impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.outer_iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, &cell) in cells.iter().enumerate() {
                if col > 0 {
                    f.write_char(' ')?;
                }
                f.write_char(self.symbol((row as Coord, col as Coord), cell))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for BoardEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&BoardSnapshot::from_engine(self), f)
    }
}
