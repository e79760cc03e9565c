//! Best-first (A*) search for a shortest move sequence.
//!
//! The frontier is a binary heap ordered by `cost + heuristic`, ties going
//! to the state inserted first. Expanded assignments are remembered by
//! their packed [`StateKey`], so no assignment is expanded twice. Because
//! the misplaced-marble count never overestimates, the first goal state
//! popped is an optimal one.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::assignment::{Assignment, StateKey};
use crate::board::{Board, STANDARD_BOARD};
use crate::error::SolverError;
use crate::moves::{successors, Move, SearchState};

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Stop after expanding this many states
    pub max_expansions: Option<usize>,
    /// Maximum time to search
    pub timeout: Option<Duration>,
}

impl SolverConfig {
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Why a search stopped before reaching a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Cancelled,
    Timeout,
    ExpansionLimit,
}

/// How a search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Shortest move sequence to the goal; empty if already solved
    Solved(Vec<Move>),
    /// The frontier ran dry without reaching the goal
    NoSolution,
    /// A limit or the cancellation flag stopped the search
    Interrupted(StopReason),
}

/// Counters collected during a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub states_expanded: usize,
    pub states_generated: usize,
    pub max_frontier: usize,
    pub time_elapsed_ms: u64,
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub outcome: SolveOutcome,
    pub stats: SearchStats,
}

/// Answer of [`solve`]: either a move list or a definite "no solution".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    Moves(Vec<Move>),
    NoSolution,
}

impl Solution {
    pub fn moves(&self) -> Option<&[Move]> {
        match self {
            Solution::Moves(moves) => Some(moves),
            Solution::NoSolution => None,
        }
    }

    /// Human-readable description of each move
    pub fn descriptions(&self) -> Option<Vec<String>> {
        self.moves()
            .map(|moves| moves.iter().map(Move::to_string).collect())
    }
}

/// A frontier entry. Ordered so that `BinaryHeap` pops the lowest
/// estimate first and, among equal estimates, the oldest entry.
#[derive(Debug)]
struct FrontierEntry {
    estimate: u32,
    sequence: u64,
    state: SearchState,
}

impl FrontierEntry {
    fn priority(&self) -> Reverse<(u32, u64)> {
        Reverse((self.estimate, self.sequence))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority() == other.priority()
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

/// A* search over a board.
pub struct Solver<'a> {
    board: &'a Board,
    config: SolverConfig,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Solver<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            config: SolverConfig::default(),
            cancel: None,
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop the search as soon as `flag` is set. Checked before each expansion.
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn stop_reason(&self, deadline: Option<Instant>, expanded: usize) -> Option<StopReason> {
        if self
            .cancel
            .is_some_and(|flag| flag.load(AtomicOrdering::Relaxed))
        {
            return Some(StopReason::Cancelled);
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(StopReason::Timeout);
        }
        if self
            .config
            .max_expansions
            .is_some_and(|limit| expanded >= limit)
        {
            return Some(StopReason::ExpansionLimit);
        }
        None
    }

    /// Search for a shortest move sequence from `initial` to the solved state.
    ///
    /// Fails with [`SolverError::InvalidInput`] before any search work if two
    /// marbles share a hole.
    pub fn run(&self, initial: &Assignment) -> Result<SolverResult, SolverError> {
        let violations = initial.violations();
        if !violations.is_empty() {
            return Err(SolverError::InvalidInput(violations));
        }

        let start_time = Instant::now();
        let deadline = self.config.timeout.map(|timeout| start_time + timeout);
        let mut stats = SearchStats::default();

        let initial = SearchState::initial(*initial);
        tracing::debug!(heuristic = initial.heuristic, "starting search");

        let mut sequence: u64 = 0;
        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry {
            estimate: initial.estimate(),
            sequence,
            state: initial,
        });
        let mut visited: FxHashSet<StateKey> = FxHashSet::default();

        let outcome = loop {
            let Some(FrontierEntry { state, .. }) = frontier.pop() else {
                break SolveOutcome::NoSolution;
            };

            if state.heuristic == 0 {
                break SolveOutcome::Solved(state.moves);
            }

            // Limits only cut expansion work; a goal already in hand is returned.
            if let Some(reason) = self.stop_reason(deadline, stats.states_expanded) {
                tracing::warn!(?reason, expanded = stats.states_expanded, "search interrupted");
                break SolveOutcome::Interrupted(reason);
            }

            if !visited.insert(state.marbles.key()) {
                continue;
            }
            stats.states_expanded += 1;
            tracing::trace!(
                cost = state.cost,
                heuristic = state.heuristic,
                frontier = frontier.len(),
                "expanding"
            );

            for child in successors(self.board, &state)? {
                if visited.contains(&child.marbles.key()) {
                    continue;
                }
                sequence += 1;
                stats.states_generated += 1;
                frontier.push(FrontierEntry {
                    estimate: child.estimate(),
                    sequence,
                    state: child,
                });
            }
            stats.max_frontier = stats.max_frontier.max(frontier.len());
        };

        stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
        tracing::debug!(
            expanded = stats.states_expanded,
            generated = stats.states_generated,
            elapsed_ms = stats.time_elapsed_ms,
            solved = matches!(outcome, SolveOutcome::Solved(_)),
            "search finished"
        );

        Ok(SolverResult { outcome, stats })
    }
}

/// Solve `assignment` on the standard board without limits.
///
/// The search runs with no expansion limit, no timeout and no cancel flag,
/// so it always ends in a move list or [`Solution::NoSolution`]; use
/// [`Solver`] directly when the search must be bounded.
pub fn solve(assignment: &Assignment) -> Result<Solution, SolverError> {
    let result = Solver::new(&STANDARD_BOARD).run(assignment)?;
    match result.outcome {
        SolveOutcome::Solved(moves) => Ok(Solution::Moves(moves)),
        SolveOutcome::NoSolution => Ok(Solution::NoSolution),
        // No limits or cancel flag are configured, so the search cannot be cut short.
        SolveOutcome::Interrupted(_) => unreachable!("unbounded search was interrupted"),
    }
}
