//! UCT child selection.
//!
//! The exploration constant is always passed in explicitly: searches use
//! `config.search.exploration_constant`, the final ranking uses
//! [`RANKING_EXPLORATION`].

use std::cmp::Ordering;

use crate::tree::{GameTree, NodeId, SearchNode};

/// Default exploration constant during search
pub const DEFAULT_EXPLORATION: f64 = 1.4;

/// Exploration constant for ranking root moves after the search stops
pub const RANKING_EXPLORATION: f64 = 0.0;

/// UCT score of `child` under a parent with `parent_visits` visits
///
/// Unvisited children score `f64::INFINITY`, so every child is tried once
/// before any sibling is revisited.
#[inline]
pub fn uct_score(child: &SearchNode, parent_visits: u32, exploration: f64) -> f64 {
    let n = child.visit_count();
    if n == 0 {
        return f64::INFINITY;
    }

    let exploit = child.total_value() / n as f64;
    if exploration == 0.0 || parent_visits == 0 {
        return exploit;
    }

    let explore = ((parent_visits as f64).ln() / n as f64).sqrt();
    exploit + exploration * explore
}

/// Child of `id` with the highest UCT score; the earliest child wins ties
pub fn best_child(tree: &GameTree, id: NodeId, exploration: f64) -> Option<NodeId> {
    let parent_visits = tree.get(id).visit_count();
    let mut best: Option<(NodeId, f64)> = None;

    for &child in tree.get(id).children() {
        let score = uct_score(tree.get(child), parent_visits, exploration);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((child, score)),
        }
    }

    best.map(|(child, _)| child)
}

/// Descends from `from` by repeated `best_child` until reaching a leaf
pub fn select_leaf(tree: &GameTree, from: NodeId, exploration: f64) -> NodeId {
    let mut current = from;
    while let Some(next) = best_child(tree, current, exploration) {
        current = next;
    }
    current
}

/// Children of `id` ordered best-first by UCT score
///
/// The sort is stable, so equal scores keep insertion order.
pub fn rank_children(tree: &GameTree, id: NodeId, exploration: f64) -> Vec<NodeId> {
    let parent_visits = tree.get(id).visit_count();
    let mut scored: Vec<(NodeId, f64)> = tree
        .get(id)
        .children()
        .iter()
        .map(|&child| (child, uct_score(tree.get(child), parent_visits, exploration)))
        .collect();

    scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(child, _)| child).collect()
}
