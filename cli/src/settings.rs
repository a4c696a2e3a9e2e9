use anyhow::{Context, Result};
use minefield_core as game;
use std::fs;
use std::path::Path;

pub(crate) const DEFAULT_SIZE: game::Coord2 = (10, 10);
pub(crate) const DEFAULT_MINES: game::CellCount = 15;

pub(crate) fn load(path: &Path) -> Result<game::GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Explicit values win over the config file, which wins over the defaults.
pub(crate) fn resolve(
    base: Option<game::GameConfig>,
    rows: Option<game::Coord>,
    cols: Option<game::Coord>,
    mines: Option<game::CellCount>,
) -> Result<game::GameConfig> {
    let (size, default_mines) = base
        .map(|config| (config.size(), config.mines()))
        .unwrap_or((DEFAULT_SIZE, DEFAULT_MINES));
    let size = (rows.unwrap_or(size.0), cols.unwrap_or(size.1));

    Ok(game::GameConfig::new(size, mines.unwrap_or(default_mines))?)
}
