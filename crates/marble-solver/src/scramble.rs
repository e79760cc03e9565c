//! Random start positions.
//!
//! A scramble walks the empty hole around the board from the solved
//! position, so every result is reachable and therefore solvable.

use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use crate::assignment::Assignment;
use crate::board::Board;
use crate::hole::Hole;

/// Perform `steps` random slides starting from the solved assignment.
///
/// A slide that would undo the previous one is avoided whenever the empty
/// hole has another occupied neighbor.
pub fn scramble<R: Rng + ?Sized>(board: &Board, steps: usize, rng: &mut R) -> Assignment {
    let mut current = Assignment::solved();
    let mut previous_empty: Option<Hole> = None;

    for _ in 0..steps {
        let Ok(empty) = current.empty_hole() else {
            break;
        };
        let candidates: SmallVec<[Hole; 5]> = board
            .neighbors(empty)
            .filter(|&hole| current.occupant(hole).is_some())
            .collect();
        let forward: SmallVec<[Hole; 5]> = candidates
            .iter()
            .copied()
            .filter(|&hole| Some(hole) != previous_empty)
            .collect();
        let pool = if forward.is_empty() { &candidates } else { &forward };

        let Some(&source) = pool.choose(rng) else {
            break;
        };
        let Some(marble) = current.occupant(source) else {
            break;
        };
        current = current.with_marble_at(marble, empty);
        previous_empty = Some(empty);
    }

    current
}
