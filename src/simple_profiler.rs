//! Simple profiling of the search phases using thread-local accumulators
//!
//! This module provides lightweight profiling without changing function signatures.
//! Enable with environment variable: OTHELLO_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Search phase being timed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Select,
    Expand,
    Playout,
    Backup,
}

impl Phase {
    const ALL: [Phase; 4] = [Phase::Select, Phase::Expand, Phase::Playout, Phase::Backup];

    fn slot(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Phase::Select => "Select",
            Phase::Expand => "Expand",
            Phase::Playout => "Playout",
            Phase::Backup => "Backup",
        }
    }
}

thread_local! {
    // (elapsed ns, calls) per phase
    static LOCAL: RefCell<[(u64, u64); 4]> = const { RefCell::new([(0, 0); 4]) };
}

static GLOBAL_TIME_NS: [AtomicU64; 4] = [
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
];
static GLOBAL_CALLS: [AtomicU64; 4] = [
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
];

#[inline]
pub fn is_profiling_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("OTHELLO_PROFILE").is_ok())
}

pub struct ProfileGuard {
    start: Instant,
    phase: Phase,
}

impl ProfileGuard {
    pub fn new(phase: Phase) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                phase,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        let slot = self.phase.slot();
        LOCAL.with(|local| {
            let mut local = local.borrow_mut();
            local[slot].0 += elapsed_ns;
            local[slot].1 += 1;
        });
    }
}

/// Folds this thread's accumulators into the global totals and clears them
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    LOCAL.with(|local| {
        let mut local = local.borrow_mut();
        for phase in Phase::ALL {
            let slot = phase.slot();
            GLOBAL_TIME_NS[slot].fetch_add(local[slot].0, Ordering::Relaxed);
            GLOBAL_CALLS[slot].fetch_add(local[slot].1, Ordering::Relaxed);
            local[slot] = (0, 0);
        }
    });
}

pub fn print_report(total_time_ms: u64, root_visits: u32) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 SEARCH PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time:  {}ms", total_time_ms);
    eprintln!("Root Visits: {}\n", root_visits);

    for phase in Phase::ALL {
        let slot = phase.slot();
        let time_ns = GLOBAL_TIME_NS[slot].load(Ordering::Relaxed);
        let calls = GLOBAL_CALLS[slot].load(Ordering::Relaxed);
        let ms = time_ns as f64 / 1_000_000.0;
        let pct = if total_ns > 0 { 100.0 * time_ns as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if calls > 0 { time_ns as f64 / (calls * 1000) as f64 } else { 0.0 };

        eprintln!(
            "{:<8} {:>10.2}ms ({:>5.1}%) - {} calls, {:.2}µs avg",
            phase.label(),
            ms,
            pct,
            calls,
            avg_us
        );
    }

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    for slot in 0..Phase::ALL.len() {
        GLOBAL_TIME_NS[slot].store(0, Ordering::Relaxed);
        GLOBAL_CALLS[slot].store(0, Ordering::Relaxed);
    }
}

#[macro_export]
macro_rules! profile {
    ($phase:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($phase);
        $code
    }};
}
