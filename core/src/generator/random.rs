use super::*;

/// Uniformly random placement of exactly `config.mines()` mines.
///
/// Cells are drawn without replacement, so generation takes bounded time even
/// when only a single safe cell remains.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Picks a fresh seed from the thread-local RNG.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;
        use rand::seq::index;

        let total_cells = usize::from(config.total_cells());
        let cols = usize::from(config.cols());
        let mut mines: Array2<bool> = Array2::default(config.size().to_nd_index());

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for cell in index::sample(&mut rng, total_cells, config.mines().into()) {
            mines[[cell / cols, cell % cols]] = true;
        }

        let layout = MineLayout::from_mine_mask_unchecked(mines);
        log::debug!(
            "Generated {}x{} minefield with {} mines from seed {}",
            config.rows(),
            config.cols(),
            layout.mine_count(),
            self.seed
        );
        layout
    }
}
