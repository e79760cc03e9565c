//! Optimal solver for the twelve-hole sliding marble puzzle.
//!
//! Eleven colored marbles sit in twelve holes laid out as the vertices of
//! an icosahedron. A move slides a marble into the adjacent empty hole.
//! This crate validates a starting position and finds a shortest sequence
//! of moves that brings every marble home.

pub mod assignment;
pub mod board;
pub mod error;
pub mod hole;
pub mod moves;
pub mod scramble;
pub mod solver;

// Re-export main types
pub use assignment::{Assignment, StateKey};
pub use board::{Board, STANDARD_BOARD};
pub use error::{BoardError, SolverError};
pub use hole::{Hole, Marble, HOLE_COUNT, MARBLE_COUNT};
pub use moves::{replay, successors, Move, SearchState};
pub use scramble::scramble;
pub use solver::{
    solve, SearchStats, Solution, SolveOutcome, Solver, SolverConfig, SolverResult, StopReason,
};

/// Describe every duplicate occupancy in `assignment`; empty when valid.
pub fn violations(assignment: &Assignment) -> Vec<String> {
    assignment.violations()
}

/// The single hole no marble occupies.
pub fn empty_hole(assignment: &Assignment) -> Result<Hole, SolverError> {
    assignment.empty_hole()
}

/// Number of marbles away from their home hole.
pub fn heuristic(assignment: &Assignment) -> u32 {
    assignment.heuristic()
}
