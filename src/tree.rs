//! Search tree with arena allocation.
//!
//! Nodes live in one Vec and refer to each other by `NodeId`. Ownership is
//! strictly top-down: a node's `parent` is a plain index used for walking back
//! to the root, never for keeping a node alive.

use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::rules;
use crate::types::{Color, Coord};

/// Index into the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// One game state in the search tree
#[derive(Debug, Clone)]
pub struct SearchNode {
    board: Board,
    color_to_move: Color,
    parent: Option<NodeId>,
    /// Move that led here from the parent; `None` for the root and for passes
    last_move: Option<Coord>,
    children: Vec<NodeId>,
    visit_count: u32,
    total_value: f64,
}

impl SearchNode {
    fn new(board: Board, color_to_move: Color, parent: Option<NodeId>, last_move: Option<Coord>) -> Self {
        SearchNode {
            board,
            color_to_move,
            parent,
            last_move,
            children: Vec::new(),
            visit_count: 0,
            total_value: 0.0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn color_to_move(&self) -> Color {
        self.color_to_move
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Average backed-up value, 0.0 while unvisited
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_value / self.visit_count as f64
        }
    }
}

/// Game tree owned by a single search request
#[derive(Debug)]
pub struct GameTree {
    nodes: Vec<SearchNode>,
}

impl GameTree {
    pub const ROOT: NodeId = NodeId(0);

    /// Creates a tree holding only the root state
    pub fn new(board: Board, color_to_move: Color) -> Self {
        GameTree {
            nodes: vec![SearchNode::new(board, color_to_move, None, None)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Total number of nodes in the arena, never zero since the root always exists
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// Materializes every child of a leaf in one step
    ///
    /// A side without legal moves gets a single pass child carrying the same
    /// board with the other color to move. Children are built off-arena first
    /// and only then linked, so no caller ever sees a half-expanded node.
    ///
    /// # Returns
    /// The new child ids in legal-move order
    pub fn expand(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.get(id);
        if !node.is_leaf() {
            return Err(EngineError::InvariantViolation(format!(
                "node {} expanded twice",
                id.0
            )));
        }

        let color = node.color_to_move;
        let next = color.opponent();
        let moves = rules::legal_moves(&node.board, color);

        let fresh = if moves.is_empty() {
            vec![SearchNode::new(node.board.clone(), next, Some(id), None)]
        } else {
            let mut fresh = Vec::with_capacity(moves.len());
            for coord in moves {
                let mut board = node.board.clone();
                rules::apply_move(&mut board, color, coord)?;
                fresh.push(SearchNode::new(board, next, Some(id), Some(coord)));
            }
            fresh
        };

        let first = self.nodes.len() as u32;
        let ids: Vec<NodeId> = (first..first + fresh.len() as u32).map(NodeId).collect();
        self.nodes.extend(fresh);
        self.get_mut(id).children = ids.clone();

        Ok(ids)
    }

    /// Backpropagates an outcome from `id` up to and including the root
    ///
    /// The sign flips at every ply: each node stores value from the point of
    /// view of the player who moved into it.
    pub fn backup(&mut self, id: NodeId, outcome: f64) {
        let mut current = Some(id);
        let mut value = outcome;

        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.visit_count += 1;
            node.total_value += value;
            value = -value;
            current = node.parent;
        }
    }
}
