use minefield_core as game;
use std::str::FromStr;
use thiserror::Error;

pub(crate) const HELP: &str = "Commands: `r ROW COL` reveal, `f ROW COL` flag, `q` quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Reveal(game::Coord2),
    Flag(game::Coord2),
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command `{0}`")]
    Unknown(String),
    #[error("Expected a row and a column")]
    MissingCoords,
    #[error("Invalid coordinate `{0}`")]
    InvalidCoord(String),
    #[error("Unexpected argument `{0}`")]
    TrailingInput(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = match words.next().ok_or(ParseError::Empty)? {
            "r" | "reveal" => Command::Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Command::Flag(parse_coords(&mut words)?),
            "q" | "quit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(ParseError::TrailingInput(extra.to_owned())),
            None => Ok(command),
        }
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<game::Coord2, ParseError> {
    let mut next_coord = || {
        let word = words.next().ok_or(ParseError::MissingCoords)?;
        word.parse::<game::Coord>()
            .map_err(|_| ParseError::InvalidCoord(word.to_owned()))
    };
    let row = next_coord()?;
    let col = next_coord()?;
    Ok((row, col))
}
