// Library exports for the Othello move selector
// The demo binary and the integration tests use the engine through this crate

pub mod board;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod playout;
pub mod rules;
pub mod search;
pub mod simple_profiler;
pub mod tree;
pub mod types;
pub mod uct;

pub use board::Board;
pub use bot::Bot;
pub use error::EngineError;
pub use search::{Deadline, SearchReport, StopReason, StopSignal};
pub use types::{Cell, Color, Coord};
