// Othello move selector
//
// `Bot` is the caller-facing agent: it is built once per game with the board
// size, its color and the per-move time budget, and answers `go` requests
// with a best-first candidate list.

use log::{error, info};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::error::{EngineError, Result};
use crate::search::{self, Deadline, SearchParams, SearchReport, StopSignal};
use crate::simple_profiler;
use crate::types::{Color, Coord};

/// Othello agent with OOP-style API
/// Takes static configuration dependencies and exposes one method per request
pub struct Bot {
    config: Config,
    size: usize,
    color: Color,
    time_out: Duration,
    debug_logger: DebugLogger,
    /// Ranked answer of the most recent request
    candidate_list: Mutex<Vec<Coord>>,
}

impl Bot {
    /// Creates a new Bot instance
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    /// * `size` - Board dimension N
    /// * `color` - Side this bot plays
    /// * `time_out` - Wall-clock limit per move; the configured safety margin is held back
    pub fn new(config: Config, size: usize, color: Color, time_out: Duration) -> Self {
        Bot {
            config,
            size,
            color,
            time_out,
            debug_logger: DebugLogger::disabled(),
            candidate_list: Mutex::new(Vec::new()),
        }
    }

    /// Attaches a decision logger
    pub fn with_debug_logger(mut self, debug_logger: DebugLogger) -> Self {
        self.debug_logger = debug_logger;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn time_out(&self) -> Duration {
        self.time_out
    }

    /// Candidates from the most recent request, best first; empty means pass
    pub fn candidate_list(&self) -> Vec<Coord> {
        self.candidate_list.lock().clone()
    }

    /// Computes the ranked candidate moves for `chessboard`
    ///
    /// This method orchestrates the async polling and CPU-bound search:
    /// 1. Spawns the search on tokio's blocking pool
    /// 2. Polls until the worker finishes or the budget runs out
    /// 3. Raises the stop signal and collects the ranking (anytime property)
    ///
    /// # Arguments
    /// * `chessboard` - N rows of N cells, -1 black / 1 white / 0 empty
    ///
    /// # Returns
    /// * `Ok(SearchReport)` - Ranked candidates; empty when the bot must pass
    /// * `Err(EngineError)` - Malformed board or an aborted search
    pub async fn go(&self, chessboard: &[Vec<i8>]) -> Result<SearchReport> {
        let start_time = Instant::now();
        let board = Board::from_rows(self.size, chessboard)?;
        let deadline = self.deadline_from(start_time);

        info!(
            "Computing move for {} ({}ms budget)",
            self.color.as_str(),
            deadline.remaining().as_millis()
        );

        let worker_deadline = deadline.clone();
        let worker_board = board.clone();
        let color = self.color;
        let params = SearchParams::from(&self.config.search);
        let seed = self.config.search.seed;

        let handle = tokio::task::spawn_blocking(move || {
            Bot::compute_candidates_internal(worker_board, color, params, seed, &worker_deadline)
        });

        // Polling loop: check for results or timeout
        let polling_interval = self.config.timing.polling_interval();
        while !deadline.expired() && !handle.is_finished() {
            tokio::time::sleep(polling_interval.min(deadline.remaining())).await;
        }
        deadline.stop_signal().raise();

        let result = handle
            .await
            .map_err(|e| EngineError::Worker(e.to_string()))
            .and_then(|inner| inner);
        self.finish(result, &board, start_time)
    }

    /// Synchronous variant of [`Bot::go`] running the search on the calling thread
    ///
    /// The deadline is only checked between search iterations.
    pub fn go_blocking(&self, chessboard: &[Vec<i8>]) -> Result<SearchReport> {
        let start_time = Instant::now();
        let board = Board::from_rows(self.size, chessboard)?;
        let deadline = self.deadline_from(start_time);

        let result = Bot::compute_candidates_internal(
            board.clone(),
            self.color,
            SearchParams::from(&self.config.search),
            self.config.search.seed,
            &deadline,
        );
        self.finish(result, &board, start_time)
    }

    fn deadline_from(&self, start_time: Instant) -> Deadline {
        let budget = self.config.timing.effective_budget(self.time_out);
        Deadline::new(start_time + budget, StopSignal::new())
    }

    /// Internal computation engine - runs on the blocking pool or the caller's thread
    fn compute_candidates_internal(
        board: Board,
        color: Color,
        params: SearchParams,
        seed: Option<u64>,
        deadline: &Deadline,
    ) -> Result<SearchReport> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        search::search(board, color, params, deadline, rng)
    }

    /// Records and logs the outcome of a request, including the debug log entry
    fn finish(
        &self,
        result: Result<SearchReport>,
        board: &Board,
        start_time: Instant,
    ) -> Result<SearchReport> {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                error!("Search aborted for {}: {}", self.color.as_str(), e);
                self.candidate_list.lock().clear();
                return Err(e);
            }
        };

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        *self.candidate_list.lock() = report.moves();

        match report.best_move() {
            Some(best) => info!(
                "{} chose ({}, {}) of {} candidates ({:?}, root visits: {}, iterations: {}, time: {}ms)",
                self.color.as_str(),
                best.row,
                best.col,
                report.candidates.len(),
                report.stop_reason,
                report.root_visits,
                report.iterations,
                elapsed_ms
            ),
            None => info!("{} has no legal move, passing", self.color.as_str()),
        }

        simple_profiler::print_report(elapsed_ms, report.root_visits);
        simple_profiler::reset();

        self.debug_logger
            .log_decision(self.color, board.to_rows(), &report);
        Ok(report)
    }
}
