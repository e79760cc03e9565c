//! Moves and successor generation.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::assignment::Assignment;
use crate::board::Board;
use crate::error::SolverError;
use crate::hole::{Hole, Marble};

/// A marble sliding from `from` into the empty hole `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub marble: Marble,
    pub from: Hole,
    pub to: Hole,
}

impl Move {
    pub fn new(marble: Marble, from: Hole, to: Hole) -> Self {
        Self { marble, from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move marble {} from {} to {}.",
            self.marble, self.from, self.to
        )
    }
}

/// A node of the search: an assignment plus the path that reached it.
///
/// States are never mutated once built; expanding one produces new states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub marbles: Assignment,
    pub moves: Vec<Move>,
    /// Moves taken from the initial state (g)
    pub cost: u32,
    /// Cached [`Assignment::heuristic`] of `marbles` (h)
    pub heuristic: u32,
}

impl SearchState {
    pub fn initial(marbles: Assignment) -> Self {
        Self {
            heuristic: marbles.heuristic(),
            marbles,
            moves: Vec::new(),
            cost: 0,
        }
    }

    /// Estimated total path length through this state (f = g + h)
    #[inline]
    pub fn estimate(&self) -> u32 {
        self.cost + self.heuristic
    }

    fn child(&self, mv: Move) -> Self {
        let marbles = self.marbles.with_marble_at(mv.marble, mv.to);
        let mut moves = Vec::with_capacity(self.moves.len() + 1);
        moves.extend_from_slice(&self.moves);
        moves.push(mv);
        Self {
            heuristic: marbles.heuristic(),
            marbles,
            moves,
            cost: self.cost + 1,
        }
    }
}

/// Every state reachable from `state` with a single slide.
///
/// Children follow the neighbor order of the empty hole. Fails only if the
/// assignment is invalid, which callers rule out before searching.
pub fn successors(
    board: &Board,
    state: &SearchState,
) -> Result<SmallVec<[SearchState; 5]>, SolverError> {
    let empty = state.marbles.empty_hole()?;
    let children = board
        .neighbors(empty)
        .filter_map(|neighbor| {
            state
                .marbles
                .occupant(neighbor)
                .map(|marble| state.child(Move::new(marble, neighbor, empty)))
        })
        .collect();
    Ok(children)
}

/// Replay `moves` from `start`, returning every intermediate assignment
/// (including `start` itself).
pub fn replay(
    board: &Board,
    start: &Assignment,
    moves: &[Move],
) -> Result<Vec<Assignment>, SolverError> {
    let mut trail = Vec::with_capacity(moves.len() + 1);
    trail.push(*start);
    let mut current = *start;
    for mv in moves {
        current = current.apply(board, mv)?;
        trail.push(current);
    }
    Ok(trail)
}
