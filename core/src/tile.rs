use serde::{Deserialize, Serialize};

/// What a cell turns out to hold once it is revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    /// Number of mines among the cell's neighbors, `0..=8`.
    Safe(u8),
}

/// Canonical player-visible state stored by the gameplay engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    #[default]
    Hidden,
    Flagged,
    Revealed(CellValue),
}

impl EngineCell {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    pub const fn revealed_value(self) -> Option<CellValue> {
        match self {
            Self::Revealed(value) => Some(value),
            Self::Hidden | Self::Flagged => None,
        }
    }
}
