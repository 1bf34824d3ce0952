// Othello value types
// Cell codes follow the caller's encoding: -1 black, 1 white, 0 empty

use serde::{Deserialize, Serialize};

/// One of the two players
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Returns the other side
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Converts color to string representation for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }

    /// Numeric code used by callers (-1 black, 1 white)
    pub fn code(self) -> i8 {
        match self {
            Color::Black => -1,
            Color::White => 1,
        }
    }

    /// Parses a color name, case-insensitive
    pub fn parse(s: &str) -> Option<Color> {
        match s.to_lowercase().as_str() {
            "black" | "b" => Some(Color::Black),
            "white" | "w" => Some(Color::White),
            _ => None,
        }
    }
}

/// State of a single board cell
///
/// `Border` only ever appears in the padding ring around the playable area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Stone(Color),
    Border,
}

impl Cell {
    /// Decodes a caller cell code; `None` for anything outside {-1, 0, 1}
    pub fn from_code(code: i8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            -1 => Some(Cell::Stone(Color::Black)),
            1 => Some(Cell::Stone(Color::White)),
            _ => None,
        }
    }

    /// Caller cell code; the border has no caller representation and maps to 0
    pub fn code(self) -> i8 {
        match self {
            Cell::Stone(color) => color.code(),
            Cell::Empty | Cell::Border => 0,
        }
    }
}

/// 0-indexed board coordinate in the caller's coordinate space
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }
}
