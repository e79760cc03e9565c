//! Error types for the solver library.

use thiserror::Error;

use crate::hole::{Hole, Marble};

/// Errors raised while validating, replaying or solving an assignment.
///
/// An exhausted search is not an error; see [`crate::solver::Solution`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("Invalid input: {}", .0.join(" "))]
    InvalidInput(Vec<String>),
    #[error("Unable to derive the empty hole: {} holes unaccounted for", .missing.len())]
    AmbiguousEmptyHole { missing: Vec<Hole> },
    #[error("Expected {expected} marble positions but got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("Unknown hole '{0}'")]
    UnknownHole(String),
    #[error("Cannot move marble {marble} into {to}: the hole is occupied")]
    DestinationOccupied { marble: Marble, to: Hole },
    #[error("Marble {marble} is not in hole {from}")]
    MarbleNotAtSource { marble: Marble, from: Hole },
    #[error("Holes {from} and {to} are not adjacent")]
    NotAdjacent { from: Hole, to: Hole },
}

/// Errors raised while building a custom board.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("Hole {0} cannot be its own neighbor")]
    SelfLoop(Hole),
}
