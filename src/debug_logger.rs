// Debug logging module for asynchronous decision logging
//
// Fire-and-forget: each decision is appended to a JSONL file by a spawned
// tokio task, so the caller never waits on disk.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::runtime::{Builder, Handle};
use tokio::sync::Mutex;

use crate::search::{Candidate, SearchReport, StopReason};
use crate::types::Color;

/// Represents a single debug log entry
#[derive(Debug, Serialize)]
struct DebugLogEntry {
    color: Color,
    board: Vec<Vec<i8>>,
    candidates: Vec<Candidate>,
    stop_reason: StopReason,
    root_visits: u32,
    iterations: u64,
    simulations: u64,
    elapsed_ms: u64,
    timestamp: String,
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a decision asynchronously (fire-and-forget)
    ///
    /// Inside a tokio runtime the write is spawned. Outside one (the blocking
    /// entry point) it is written before returning on a throwaway runtime.
    pub fn log_decision(&self, color: Color, board: Vec<Vec<i8>>, report: &SearchReport) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        let entry = DebugLogEntry {
            color,
            board,
            candidates: report.candidates.clone(),
            stop_reason: report.stop_reason,
            root_visits: report.root_visits,
            iterations: report.iterations,
            simulations: report.simulations,
            elapsed_ms: report.elapsed_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    Self::write_entry(file_handle, entry).await;
                });
            }
            Err(_) => match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(Self::write_entry(file_handle, entry)),
                Err(e) => error!("Failed to start runtime for debug log write: {}", e),
            },
        }
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DebugLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;
    use std::time::Duration;

    fn sample_report() -> SearchReport {
        SearchReport {
            candidates: vec![Candidate {
                coord: Coord::new(2, 3),
                visits: 5,
                mean_value: 0.2,
            }],
            stop_reason: StopReason::Deadline,
            root_visits: 5,
            iterations: 1,
            simulations: 5,
            tree_size: 6,
            elapsed_ms: 12,
        }
    }

    #[tokio::test]
    async fn test_disabled_logger_is_a_no_op() {
        let logger = DebugLogger::new(false, "unused.jsonl").await;
        assert!(!logger.is_enabled());
        logger.log_decision(Color::Black, vec![vec![0]], &sample_report());
    }

    #[tokio::test]
    async fn test_enabled_logger_writes_one_json_line_per_decision() {
        let path = std::env::temp_dir().join(format!("othello_debug_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        let logger = DebugLogger::new(true, &path_str).await;
        assert!(logger.is_enabled());
        logger.log_decision(Color::White, vec![vec![0, 1], vec![-1, 0]], &sample_report());

        let mut contents = String::new();
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            contents = tokio::fs::read_to_string(&path).await.unwrap_or_default();
            if contents.ends_with('\n') {
                break;
            }
        }

        let line: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(line["color"], "white");
        assert_eq!(line["stop_reason"], "deadline");
        assert_eq!(line["candidates"][0]["coord"]["row"], 2);
        assert_eq!(line["board"][1][0], -1);

        let _ = std::fs::remove_file(&path);
    }
}
