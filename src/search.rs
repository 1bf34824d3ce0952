//! Anytime MCTS search loop and deadline controller.
//!
//! A search moves through four phases:
//!
//! 1. `Seeding` - expand the root and run one playout per root move
//! 2. `Iterating` - select a leaf, expand it, play out and back up each new child
//! 3. `Interrupted` - the deadline fired; rank root moves by mean value
//! 4. `Done` - the ranked candidate list is available
//!
//! The deadline is only polled between iterations, so an expansion or a
//! backup chain is never observed half-applied. A single long iteration can
//! overrun the deadline by its own duration.

use log::{debug, warn};
use rand::Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::config::SearchConfig;
use crate::error::{EngineError, Result};
use crate::playout;
use crate::profile;
use crate::rules;
use crate::simple_profiler::{self, Phase};
use crate::tree::{GameTree, NodeId};
use crate::types::{Color, Coord};
use crate::uct::{self, RANKING_EXPLORATION};

/// Cancellation flag shared between a search and whoever owns its deadline
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        StopSignal(Arc::new(AtomicBool::new(false)))
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Wall-clock cutoff plus an external stop signal
#[derive(Debug, Clone)]
pub struct Deadline {
    at: Instant,
    stop: StopSignal,
}

impl Deadline {
    pub fn new(at: Instant, stop: StopSignal) -> Self {
        Deadline { at, stop }
    }

    /// Deadline `budget` from now with a fresh stop signal
    pub fn after(budget: Duration) -> Self {
        Deadline::new(Instant::now() + budget, StopSignal::new())
    }

    pub fn expired(&self) -> bool {
        self.stop.is_raised() || Instant::now() >= self.at
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Seeding,
    Iterating,
    Interrupted,
    Done,
}

/// Why the search produced its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The side to move has no legal move and must pass
    NoLegalMove,
    /// The deadline fired after seeding; candidates are ranked
    Deadline,
    /// The configured iteration cap was reached; candidates are ranked
    IterationLimit,
    /// The deadline fired during seeding; candidates are unranked legal moves
    SeedingCutShort,
}

/// One ranked root move
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub coord: Coord,
    pub visits: u32,
    pub mean_value: f64,
}

/// Final answer of a search
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// Root moves, best first; empty means pass
    pub candidates: Vec<Candidate>,
    pub stop_reason: StopReason,
    pub root_visits: u32,
    pub iterations: u64,
    pub simulations: u64,
    pub tree_size: usize,
    pub elapsed_ms: u64,
}

impl SearchReport {
    /// Candidate coordinates, best first
    pub fn moves(&self) -> Vec<Coord> {
        self.candidates.iter().map(|c| c.coord).collect()
    }

    pub fn best_move(&self) -> Option<Coord> {
        self.candidates.first().map(|c| c.coord)
    }

    pub fn is_pass(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Per-search knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub exploration: f64,
    pub max_iterations: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            exploration: uct::DEFAULT_EXPLORATION,
            max_iterations: None,
        }
    }
}

impl From<&SearchConfig> for SearchParams {
    fn from(config: &SearchConfig) -> Self {
        SearchParams {
            exploration: config.exploration_constant,
            max_iterations: config.max_iterations,
        }
    }
}

/// A single move-selection request
///
/// Owns its tree exclusively; dropped once the report is produced.
pub struct MctsSearch<R> {
    tree: GameTree,
    /// Root move -> root child reached by playing it
    candidates: Vec<(Coord, NodeId)>,
    legal: Vec<Coord>,
    phase: SearchPhase,
    params: SearchParams,
    rng: R,
    iterations: u64,
    simulations: u64,
}

impl<R: Rng> MctsSearch<R> {
    pub fn new(board: Board, color: Color, params: SearchParams, rng: R) -> Self {
        MctsSearch {
            tree: GameTree::new(board, color),
            candidates: Vec::new(),
            legal: Vec::new(),
            phase: SearchPhase::Seeding,
            params,
            rng,
            iterations: 0,
            simulations: 0,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn candidate_set(&self) -> &[(Coord, NodeId)] {
        &self.candidates
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Runs the whole request: seeding, iterating until `deadline`, ranking
    pub fn run(mut self, deadline: &Deadline) -> Result<SearchReport> {
        let start = Instant::now();

        let result = self.drive(deadline);
        simple_profiler::merge_thread_local();

        let (candidates, stop_reason) = result?;
        self.phase = SearchPhase::Done;

        Ok(SearchReport {
            candidates,
            stop_reason,
            root_visits: self.tree.get(self.tree.root()).visit_count(),
            iterations: self.iterations,
            simulations: self.simulations,
            tree_size: self.tree.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn drive(&mut self, deadline: &Deadline) -> Result<(Vec<Candidate>, StopReason)> {
        if self.phase == SearchPhase::Seeding {
            if let Some(reason) = self.seed(deadline)? {
                let candidates = self.unranked_candidates();
                return Ok((candidates, reason));
            }
        }

        let reason = loop {
            if deadline.expired() {
                break StopReason::Deadline;
            }
            if let Some(max) = self.params.max_iterations {
                if self.iterations >= max {
                    break StopReason::IterationLimit;
                }
            }
            self.iterate_once()?;
        };

        self.phase = SearchPhase::Interrupted;
        debug!(
            "Search interrupted ({:?}) after {} iterations, {} nodes",
            reason,
            self.iterations,
            self.tree.len()
        );

        Ok((self.ranked_candidates()?, reason))
    }

    /// Seeding phase: expands the root and plays out each root move once
    ///
    /// # Returns
    /// * `Ok(None)` - Seeding completed, the search may iterate
    /// * `Ok(Some(reason))` - The request ends here (no legal move, or the deadline hit)
    pub fn seed(&mut self, deadline: &Deadline) -> Result<Option<StopReason>> {
        if self.phase != SearchPhase::Seeding {
            return Err(EngineError::InvariantViolation(format!(
                "seeding requested in phase {:?}",
                self.phase
            )));
        }

        let root = self.tree.root();
        let color = self.tree.get(root).color_to_move();
        self.legal = rules::legal_moves(self.tree.get(root).board(), color);

        if self.legal.is_empty() {
            debug!("No legal move for {}, reporting pass", color.as_str());
            self.phase = SearchPhase::Done;
            return Ok(Some(StopReason::NoLegalMove));
        }

        if deadline.expired() {
            return Ok(Some(self.cut_seeding_short()));
        }

        let kids = profile!(Phase::Expand, { self.tree.expand(root)? });
        self.candidates = self.legal.iter().copied().zip(kids.iter().copied()).collect();

        for &kid in &kids {
            if deadline.expired() {
                return Ok(Some(self.cut_seeding_short()));
            }
            self.simulate_and_backup(kid)?;
        }

        debug!(
            "Seeded {} root moves for {}",
            self.candidates.len(),
            color.as_str()
        );
        self.phase = SearchPhase::Iterating;
        Ok(None)
    }

    fn cut_seeding_short(&mut self) -> StopReason {
        warn!(
            "Deadline hit during seeding, returning {} unranked legal moves",
            self.legal.len()
        );
        self.phase = SearchPhase::Done;
        StopReason::SeedingCutShort
    }

    /// One select / expand / simulate / backup cycle
    ///
    /// A leaf where neither side can move is not expanded; its exact final
    /// score is backed up instead.
    pub fn iterate_once(&mut self) -> Result<()> {
        if self.phase != SearchPhase::Iterating {
            return Err(EngineError::InvariantViolation(format!(
                "iteration requested in phase {:?}",
                self.phase
            )));
        }

        let root = self.tree.root();
        let exploration = self.params.exploration;
        let leaf = profile!(Phase::Select, {
            uct::select_leaf(&self.tree, root, exploration)
        });

        if leaf == root {
            return Err(EngineError::InvariantViolation(
                "selection returned the root after seeding".to_string(),
            ));
        }

        if rules::is_terminal(self.tree.get(leaf).board()) {
            self.simulate_and_backup(leaf)?;
        } else {
            let kids = profile!(Phase::Expand, { self.tree.expand(leaf)? });
            for kid in kids {
                self.simulate_and_backup(kid)?;
            }
        }

        self.iterations += 1;
        Ok(())
    }

    fn simulate_and_backup(&mut self, id: NodeId) -> Result<()> {
        let value = profile!(Phase::Playout, {
            playout::simulate(&self.tree, id, &mut self.rng)?
        });
        profile!(Phase::Backup, { self.tree.backup(id, value) });
        self.simulations += 1;
        Ok(())
    }

    fn candidate_for(&self, id: NodeId) -> Result<Candidate> {
        let coord = self
            .candidates
            .iter()
            .find(|(_, node)| *node == id)
            .map(|(coord, _)| *coord)
            .ok_or_else(|| {
                EngineError::InvariantViolation(format!("root child {} has no candidate move", id.0))
            })?;
        let node = self.tree.get(id);

        Ok(Candidate {
            coord,
            visits: node.visit_count(),
            mean_value: node.mean_value(),
        })
    }

    /// Root moves best-first by mean value (UCT with zero exploration)
    fn ranked_candidates(&self) -> Result<Vec<Candidate>> {
        let root = self.tree.root();
        let ranked = uct::rank_children(&self.tree, root, RANKING_EXPLORATION);

        if ranked.len() != self.legal.len() {
            return Err(EngineError::InvariantViolation(format!(
                "root has {} children for {} legal moves",
                ranked.len(),
                self.legal.len()
            )));
        }

        ranked
            .into_iter()
            .map(|id| {
                if self.tree.get(id).visit_count() == 0 {
                    return Err(EngineError::InvariantViolation(format!(
                        "root child {} unvisited after seeding",
                        id.0
                    )));
                }
                self.candidate_for(id)
            })
            .collect()
    }

    /// Legal root moves in enumeration order with whatever statistics exist
    fn unranked_candidates(&self) -> Vec<Candidate> {
        self.legal
            .iter()
            .map(|&coord| {
                let stats = self
                    .candidates
                    .iter()
                    .find(|(c, _)| *c == coord)
                    .map(|&(_, id)| self.tree.get(id));
                Candidate {
                    coord,
                    visits: stats.map_or(0, |node| node.visit_count()),
                    mean_value: stats.map_or(0.0, |node| node.mean_value()),
                }
            })
            .collect()
    }
}

/// Convenience wrapper: runs one full search for `color` on `board`
pub fn search<R: Rng>(
    board: Board,
    color: Color,
    params: SearchParams,
    deadline: &Deadline,
    rng: R,
) -> Result<SearchReport> {
    MctsSearch::new(board, color, params, rng).run(deadline)
}
