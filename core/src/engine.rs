use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Single game of minesweeper: the hazard layout plus everything the player did to it.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardEngine {
    mine_layout: MineLayout,
    board: Array2<EngineCell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    outcome: GameOutcome,
    triggered_mine: Option<Coord2>,
}

impl BoardEngine {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            outcome: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn from_config(config: GameConfig, generator: impl MinefieldGenerator) -> Self {
        Self::new(generator.generate(config))
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_config(config, RandomMinefieldGenerator::new(seed))
    }

    pub fn random(config: GameConfig) -> Self {
        Self::from_config(config, RandomMinefieldGenerator::from_entropy())
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.mine_layout.game_config()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Cells that are either hidden or flagged.
    pub fn unrevealed_count(&self) -> CellCount {
        self.mine_layout.total_cells() - self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus placed flags; negative when the player over-flags.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.total_mines()) - i32::from(self.flagged_count)
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<EngineCell> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(self.board[coords.to_nd_index()])
    }

    /// The mine whose reveal lost the game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Every mine position regardless of what the player has revealed.
    pub fn mine_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_layout.mine_positions()
    }

    pub(crate) fn board(&self) -> &Array2<EngineCell> {
        &self.board
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use EngineCell::*;
        use MarkOutcome::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        if self.outcome.is_finished() {
            return Ok(NoChange);
        }

        Ok(match self.board[coords.to_nd_index()] {
            Hidden => {
                self.board[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.board[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed(_) => NoChange,
        })
    }

    /// Reveals a hidden cell. Flagged cells have to be unflagged first.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;

        if self.outcome.is_finished() || self.board[coords.to_nd_index()] != EngineCell::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        Ok(match self.mine_layout.cell_value(coords) {
            CellValue::Mine => {
                self.board[coords.to_nd_index()] = EngineCell::Revealed(CellValue::Mine);
                self.revealed_count += 1;
                self.triggered_mine = Some(coords);
                self.end_game(GameOutcome::Lost);
                RevealOutcome::HitMine
            }
            CellValue::Safe(_) => {
                let opened = self.flood_reveal(coords);
                log::trace!("Reveal at {coords:?} opened {opened} cells");

                if self.unrevealed_count() == self.total_mines() {
                    self.end_game(GameOutcome::Won);
                    RevealOutcome::Won
                } else {
                    RevealOutcome::Revealed
                }
            }
        })
    }

    /// Opens `start` and, through zero cells, every hidden cell connected to it.
    /// Returns how many cells were opened.
    fn flood_reveal(&mut self, start: Coord2) -> CellCount {
        let mut opened = 0;
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if self.board[visit_coords.to_nd_index()] != EngineCell::Hidden {
                continue;
            }

            // only neighbors of zero cells get queued, so this is never a mine
            let value = self.mine_layout.cell_value(visit_coords);
            self.board[visit_coords.to_nd_index()] = EngineCell::Revealed(value);
            self.revealed_count += 1;
            opened += 1;

            if value == CellValue::Safe(0) {
                to_visit.extend(
                    self.mine_layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.board[pos.to_nd_index()] == EngineCell::Hidden),
                );
            }
        }

        opened
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        if self.outcome.is_finished() {
            return;
        }

        log::debug!(
            "Game ended {outcome:?} with {} of {} cells revealed",
            self.revealed_count,
            self.mine_layout.total_cells()
        );
        self.outcome = outcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    fn cells(engine: &BoardEngine) -> Array2<EngineCell> {
        engine.board().clone()
    }

    #[test]
    fn reveal_far_from_corner_mine_wins_by_cascade() {
        let mut engine = BoardEngine::new(layout((3, 3), &[(0, 0)]));

        let outcome = engine.reveal((2, 2)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(engine.outcome(), GameOutcome::Won);
        assert_eq!(engine.revealed_count(), 8);
        assert_eq!(engine.cell_at((0, 0)).unwrap(), EngineCell::Hidden);
        assert_eq!(
            engine.cell_at((1, 1)).unwrap(),
            EngineCell::Revealed(CellValue::Safe(1))
        );
        assert_eq!(
            engine.cell_at((2, 0)).unwrap(),
            EngineCell::Revealed(CellValue::Safe(0))
        );
    }

    #[test]
    fn center_mine_counts_and_single_reveal() {
        let mut engine = BoardEngine::new(layout((3, 3), &[(1, 1)]));

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(
            engine.cell_at((0, 0)).unwrap(),
            EngineCell::Revealed(CellValue::Safe(1))
        );
        assert_eq!(engine.revealed_count(), 1);

        for coords in [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert_eq!(engine.cell_at(coords).unwrap(), EngineCell::Hidden);
            assert_eq!(engine.mine_layout.adjacent_mine_count(coords).unwrap(), 1);
        }

        assert_eq!(engine.reveal((1, 1)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(engine.outcome(), GameOutcome::Lost);
    }

    #[test]
    fn hitting_mine_changes_only_that_cell() {
        let mut engine = BoardEngine::new(layout((4, 4), &[(0, 0), (3, 3)]));
        assert_eq!(engine.reveal((0, 1)).unwrap(), RevealOutcome::Revealed);
        engine.toggle_flag((3, 0)).unwrap();
        let before = cells(&engine);

        assert_eq!(engine.reveal((3, 3)).unwrap(), RevealOutcome::HitMine);

        let after = cells(&engine);
        for ((index, old), new) in before.indexed_iter().zip(after.iter()) {
            if index == (3, 3) {
                assert_eq!(*new, EngineCell::Revealed(CellValue::Mine));
            } else {
                assert_eq!(old, new);
            }
        }
        assert_eq!(engine.triggered_mine(), Some((3, 3)));
        assert_eq!(engine.cell_at((0, 0)).unwrap(), EngineCell::Hidden);
    }

    #[test]
    fn cascade_stops_at_numbered_cells() {
        let mines = &[(0, 2), (1, 2), (2, 2)];
        let mut engine = BoardEngine::new(layout((3, 5), mines));

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);

        for row in 0..3 {
            assert_eq!(
                engine.cell_at((row, 0)).unwrap(),
                EngineCell::Revealed(CellValue::Safe(0))
            );
            assert!(matches!(
                engine.cell_at((row, 1)).unwrap(),
                EngineCell::Revealed(CellValue::Safe(count)) if count > 0
            ));
            for col in 2..5 {
                assert_eq!(engine.cell_at((row, col)).unwrap(), EngineCell::Hidden);
            }
        }
        assert_eq!(
            engine.cell_at((1, 1)).unwrap(),
            EngineCell::Revealed(CellValue::Safe(3))
        );
        assert_eq!(engine.revealed_count(), 6);

        assert_eq!(engine.reveal((1, 4)).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.revealed_count(), 12);
    }

    #[test]
    fn flags_block_reveal_and_cascade() {
        let mut engine = BoardEngine::new(layout((3, 3), &[(0, 0)]));

        assert_eq!(engine.toggle_flag((2, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.reveal((2, 0)).unwrap(), RevealOutcome::NoChange);

        assert_eq!(engine.reveal((2, 2)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.cell_at((2, 0)).unwrap(), EngineCell::Flagged);
        assert_eq!(engine.unrevealed_count(), 2);
        assert_eq!(engine.outcome(), GameOutcome::InProgress);

        assert_eq!(engine.toggle_flag((2, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.reveal((2, 0)).unwrap(), RevealOutcome::Won);
    }

    #[test]
    fn flagged_mines_still_count_towards_win() {
        let mut engine = BoardEngine::new(layout((1, 3), &[(0, 0)]));
        engine.toggle_flag((0, 0)).unwrap();

        assert_eq!(engine.reveal((0, 2)).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.cell_at((0, 0)).unwrap(), EngineCell::Flagged);
    }

    #[test]
    fn toggle_flag_cycles_and_skips_revealed() {
        let mut engine = BoardEngine::new(layout((2, 2), &[(0, 0)]));

        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.cell_at((0, 0)).unwrap(), EngineCell::Flagged);
        assert_eq!(engine.mines_left(), 0);

        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.cell_at((0, 0)).unwrap(), EngineCell::Hidden);
        assert_eq!(engine.mines_left(), 1);

        engine.reveal((1, 1)).unwrap();
        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(
            engine.cell_at((1, 1)).unwrap(),
            EngineCell::Revealed(CellValue::Safe(1))
        );
    }

    #[test]
    fn over_flagging_makes_mines_left_negative() {
        let mut engine = BoardEngine::new(layout((2, 2), &[(0, 0)]));
        engine.toggle_flag((0, 1)).unwrap();
        engine.toggle_flag((1, 0)).unwrap();

        assert_eq!(engine.flagged_count(), 2);
        assert_eq!(engine.mines_left(), -1);
    }

    #[test]
    fn finished_game_ignores_commands() {
        let mut engine = BoardEngine::new(layout((2, 1), &[(0, 0)]));
        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Won);
        let before = engine.clone();

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(engine, before);

        let mut engine = BoardEngine::new(layout((2, 2), &[(0, 0)]));
        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);
        let before = engine.clone();

        assert_eq!(engine.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.toggle_flag((0, 1)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(engine, before);
        assert_eq!(engine.outcome(), GameOutcome::Lost);
    }

    #[test]
    fn repeated_reveal_is_no_change() {
        let mut engine = BoardEngine::new(layout((2, 2), &[(0, 0)]));
        assert_eq!(engine.reveal((1, 1)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.revealed_count(), 1);
    }

    #[test]
    fn out_of_range_commands_fail() {
        let mut engine = BoardEngine::new(layout((3, 3), &[(0, 0)]));
        let expected = Err(GameError::OutOfRange {
            coords: (3, 0),
            size: (3, 3),
        });

        assert_eq!(engine.reveal((3, 0)), expected);
        assert_eq!(engine.toggle_flag((3, 0)).map(|_| ()), expected.map(|_| ()));
        assert!(engine.cell_at((0, 3)).is_err());

        engine.reveal((0, 0)).unwrap();
        assert!(engine.reveal((0, 7)).is_err());
    }

    #[test]
    fn empty_board_is_won_by_first_reveal() {
        let mut engine = BoardEngine::new(layout((4, 6), &[]));

        assert_eq!(engine.reveal((2, 3)).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.unrevealed_count(), 0);
    }

    #[test]
    fn seeded_engine_has_stable_mines() {
        let config = GameConfig::new((10, 10), 15).unwrap();
        let engine = BoardEngine::with_seed(config, 1234);

        assert_eq!(engine.total_mines(), 15);
        assert_eq!(engine.mine_positions().count(), 15);
        assert!(engine.mine_positions().eq(engine.mine_positions()));
        assert!(
            engine
                .mine_positions()
                .eq(BoardEngine::with_seed(config, 1234).mine_positions())
        );
        assert_eq!(engine.config(), config);
    }

    #[test]
    fn random_engine_matches_config() {
        let config = GameConfig::new((5, 7), 34).unwrap();
        let mut engine = BoardEngine::random(config);

        assert_eq!(engine.total_mines(), 34);
        let safe = (0..5)
            .flat_map(|row| (0..7).map(move |col| (row, col)))
            .find(|&coords| !engine.mine_layout[coords]);
        assert_eq!(engine.reveal(safe.unwrap()).unwrap(), RevealOutcome::Won);
    }
}
