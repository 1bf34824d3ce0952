// Othello rules: legal moves, move application and terminal scoring
//
// Every scan walks the flat board along one of the 8 direction offsets and
// relies on the border ring to stop; no bounds checks are needed.

use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::types::{Cell, Color, Coord};

/// Result of a finished game from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// Maps the outcome to the +1 / -1 / 0 utility backed up through the tree
    pub fn utility(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => -1.0,
            Outcome::Draw => 0.0,
        }
    }
}

/// Length of the opposing run that `color` would capture from `idx` along
/// `offset`; 0 when the run is empty or not closed by a `color` stone
fn run_length(board: &Board, color: Color, idx: usize, offset: isize) -> usize {
    let opponent = Cell::Stone(color.opponent());
    let mut len = 0;
    let mut cur = Board::step(idx, offset);

    while board.cell(cur) == opponent {
        len += 1;
        cur = Board::step(cur, offset);
    }

    if len > 0 && board.cell(cur) == Cell::Stone(color) {
        len
    } else {
        0
    }
}

fn captures_from(board: &Board, color: Color, idx: usize) -> bool {
    board.cell(idx) == Cell::Empty
        && board
            .directions()
            .iter()
            .any(|&offset| run_length(board, color, idx, offset) > 0)
}

/// Enumerates the legal moves for `color` in row-major order
pub fn legal_moves(board: &Board, color: Color) -> Vec<Coord> {
    board
        .playable_indices()
        .filter(|&idx| captures_from(board, color, idx))
        .map(|idx| board.coord_of(idx))
        .collect()
}

/// Checks a single placement; coordinates off the board are never legal
pub fn is_legal(board: &Board, color: Color, coord: Coord) -> bool {
    board.contains(coord) && captures_from(board, color, board.index_of(coord))
}

pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board
        .playable_indices()
        .any(|idx| captures_from(board, color, idx))
}

/// A position is terminal when neither side has a legal move
pub fn is_terminal(board: &Board) -> bool {
    !has_legal_move(board, Color::Black) && !has_legal_move(board, Color::White)
}

/// Places a `color` stone at `coord` and flips every captured run
///
/// # Returns
/// * `Ok(flipped)` - Number of opposing stones turned over
/// * `Err(EngineError::IllegalMove)` - The placement captures nothing or the cell is taken
pub fn apply_move(board: &mut Board, color: Color, coord: Coord) -> Result<usize> {
    if board.get(coord) != Some(Cell::Empty) {
        return Err(EngineError::IllegalMove { color, coord });
    }

    let idx = board.index_of(coord);
    let runs = board
        .directions()
        .map(|offset| (offset, run_length(board, color, idx, offset)));
    let flipped: usize = runs.iter().map(|&(_, len)| len).sum();

    if flipped == 0 {
        return Err(EngineError::IllegalMove { color, coord });
    }

    board.put(idx, color);
    for (offset, len) in runs {
        let mut cur = idx;
        for _ in 0..len {
            cur = Board::step(cur, offset);
            board.put(cur, color);
        }
    }

    Ok(flipped)
}

/// Scores a finished position for `color` by stone majority on the playable area
pub fn score(board: &Board, color: Color) -> Outcome {
    let mine = board.count(color);
    let theirs = board.count(color.opponent());

    if mine > theirs {
        Outcome::Win
    } else if mine < theirs {
        Outcome::Loss
    } else {
        Outcome::Draw
    }
}
