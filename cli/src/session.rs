use anyhow::{Context, Result};
use minefield_core as game;
use std::io::{BufRead, Write};

use crate::command::{Command, HELP};

/// Runs one game: every command goes to the engine, then the board is redrawn
/// from a fresh snapshot.
pub(crate) fn run(
    mut engine: game::BoardEngine,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<game::GameOutcome> {
    writeln!(output, "{HELP}")?;
    render(&engine, &mut output)?;

    for line in input.lines() {
        let line = line.context("Could not read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{err}. {HELP}")?;
                continue;
            }
        };

        let updated = match command {
            Command::Quit => break,
            Command::Reveal(coords) => engine.reveal(coords).map(|outcome| outcome.has_update()),
            Command::Flag(coords) => engine.toggle_flag(coords).map(|outcome| outcome.has_update()),
        };
        match updated {
            Ok(updated) => log::debug!("{command:?} updated board: {updated}"),
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        }

        render(&engine, &mut output)?;
        match engine.outcome() {
            game::GameOutcome::InProgress => {}
            game::GameOutcome::Won => {
                writeln!(output, "Congratulations, you won!")?;
                break;
            }
            game::GameOutcome::Lost => {
                let (row, col) = engine.triggered_mine().unwrap_or_default();
                writeln!(output, "Game over! You hit a mine at {row} {col}.")?;
                break;
            }
        }
    }

    output.flush()?;
    Ok(engine.outcome())
}

fn render(engine: &game::BoardEngine, output: &mut impl Write) -> Result<()> {
    let snapshot = game::BoardSnapshot::from_engine(engine);
    writeln!(output, "{snapshot}")?;
    writeln!(output, "Mines left: {}", engine.mines_left())?;
    Ok(())
}
