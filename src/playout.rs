//! Uniform-random playouts.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::rules::{self, Outcome};
use crate::tree::{GameTree, NodeId};
use crate::types::Color;

/// Plays random legal moves from `board` until neither side can move
///
/// A side without moves passes; two passes in a row end the game. Every move
/// fills an empty cell and at most one pass sits between two moves, so a game
/// takes at most `2 * empties + 2` turns. The loop is capped there.
///
/// # Arguments
/// * `board` - Starting position (copied, never mutated)
/// * `to_move` - Side to act first
/// * `perspective` - Player the outcome is reported for
/// * `rng` - Source of uniform move choices
pub fn playout<R: Rng + ?Sized>(
    board: &Board,
    to_move: Color,
    perspective: Color,
    rng: &mut R,
) -> Result<Outcome> {
    let mut board = board.clone();
    let mut color = to_move;
    let max_turns = 2 * board.empty_count() + 2;
    let mut turns = 0;
    let mut consecutive_passes = 0;

    while consecutive_passes < 2 {
        if turns >= max_turns {
            debug!("Playout hit turn cap {} before both sides passed", max_turns);
            break;
        }

        let moves = rules::legal_moves(&board, color);
        match moves.choose(rng) {
            Some(&coord) => {
                rules::apply_move(&mut board, color, coord)?;
                consecutive_passes = 0;
            }
            None => consecutive_passes += 1,
        }

        color = color.opponent();
        turns += 1;
    }

    Ok(rules::score(&board, perspective))
}

/// Simulates a random game from `id` and returns its utility for the player
/// who moved into `id` (its parent's color to move)
pub fn simulate<R: Rng + ?Sized>(tree: &GameTree, id: NodeId, rng: &mut R) -> Result<f64> {
    let node = tree.get(id);
    let parent = node.parent().ok_or_else(|| {
        EngineError::InvariantViolation(format!("simulate called on parentless node {}", id.0))
    })?;
    let perspective = tree.get(parent).color_to_move();

    let outcome = playout(node.board(), node.color_to_move(), perspective, rng)?;
    Ok(outcome.utility())
}
