//! Marble assignments, their validation and the search heuristic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::SolverError;
use crate::hole::{Hole, Marble, HOLE_COUNT, MARBLE_COUNT};
use crate::moves::Move;

/// Bits used per marble in a [`StateKey`].
const KEY_BITS: u32 = 4;

/// Compact, collision-free encoding of an assignment.
///
/// Marble `i` occupies bits `4i..4i+4`, so 44 bits are used in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(u64);

impl StateKey {
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Where every marble currently sits: `holes[i]` is the hole of marble `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment([Hole; MARBLE_COUNT]);

impl Assignment {
    pub const fn new(holes: [Hole; MARBLE_COUNT]) -> Self {
        Self(holes)
    }

    /// Every marble in its home hole; `White` is empty.
    pub const fn solved() -> Self {
        let mut holes = [Hole::Red; MARBLE_COUNT];
        let mut i = 0;
        while i < MARBLE_COUNT {
            holes[i] = Hole::ALL[i];
            i += 1;
        }
        Self(holes)
    }

    #[inline]
    pub fn holes(&self) -> &[Hole; MARBLE_COUNT] {
        &self.0
    }

    /// The hole currently holding `marble`
    #[inline]
    pub fn position(&self, marble: Marble) -> Hole {
        self.0[marble.index()]
    }

    /// The first marble found in `hole`, if any
    pub fn occupant(&self, hole: Hole) -> Option<Marble> {
        self.0
            .iter()
            .position(|&h| h == hole)
            .and_then(Marble::new)
    }

    pub fn key(&self) -> StateKey {
        let packed = self
            .0
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, hole)| {
                acc | (hole.index() as u64) << (KEY_BITS * i as u32)
            });
        StateKey(packed)
    }

    /// Describe every duplicate occupancy in the assignment.
    ///
    /// For each hole shared by `k > 1` marbles, one diagnostic is emitted
    /// per marble in it. Holes are reported in order of first occurrence,
    /// marbles in index order. An empty result means the assignment is valid.
    pub fn violations(&self) -> Vec<String> {
        let mut counts = [0usize; HOLE_COUNT];
        let mut first_seen: Vec<Hole> = Vec::new();
        for &hole in &self.0 {
            if counts[hole.index()] == 0 {
                first_seen.push(hole);
            }
            counts[hole.index()] += 1;
        }

        let mut violations = Vec::new();
        for hole in first_seen {
            let count = counts[hole.index()];
            if count < 2 {
                continue;
            }
            for marble in Marble::ALL {
                if self.position(marble) == hole {
                    violations.push(format!(
                        "Marble {} shares the hole {} with {} more marbles.",
                        marble,
                        hole,
                        count - 1
                    ));
                }
            }
        }
        violations
    }

    pub fn is_valid(&self) -> bool {
        let mut occupied = 0u16;
        for hole in &self.0 {
            if occupied & hole.bit() != 0 {
                return false;
            }
            occupied |= hole.bit();
        }
        true
    }

    /// The single hole no marble occupies.
    ///
    /// Fails with [`SolverError::AmbiguousEmptyHole`] unless exactly one
    /// hole is unaccounted for, which only happens for invalid assignments.
    pub fn empty_hole(&self) -> Result<Hole, SolverError> {
        let occupied = self.0.iter().fold(0u16, |acc, hole| acc | hole.bit());
        let missing: Vec<Hole> = Hole::ALL
            .into_iter()
            .filter(|hole| occupied & hole.bit() == 0)
            .collect();
        match missing.as_slice() {
            [only] => Ok(*only),
            _ => Err(SolverError::AmbiguousEmptyHole { missing }),
        }
    }

    /// Number of marbles away from home.
    ///
    /// A move relocates one marble, so it fixes at most one mismatch; the
    /// count never exceeds the true number of remaining moves.
    pub fn heuristic(&self) -> u32 {
        Marble::ALL
            .iter()
            .filter(|&&marble| self.position(marble) != marble.home())
            .count() as u32
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.heuristic() == 0
    }

    /// Replay a move, checking it is legal on `board`.
    pub fn apply(&self, board: &Board, mv: &Move) -> Result<Assignment, SolverError> {
        if self.position(mv.marble) != mv.from {
            return Err(SolverError::MarbleNotAtSource {
                marble: mv.marble,
                from: mv.from,
            });
        }
        if self.empty_hole()? != mv.to {
            return Err(SolverError::DestinationOccupied {
                marble: mv.marble,
                to: mv.to,
            });
        }
        if !board.are_adjacent(mv.from, mv.to) {
            return Err(SolverError::NotAdjacent {
                from: mv.from,
                to: mv.to,
            });
        }
        Ok(self.with_marble_at(mv.marble, mv.to))
    }

    /// Clone with one marble relocated, without any legality checks
    pub(crate) fn with_marble_at(&self, marble: Marble, hole: Hole) -> Assignment {
        let mut holes = self.0;
        holes[marble.index()] = hole;
        Assignment(holes)
    }
}

impl Default for Assignment {
    fn default() -> Self {
        Self::solved()
    }
}

impl From<[Hole; MARBLE_COUNT]> for Assignment {
    fn from(holes: [Hole; MARBLE_COUNT]) -> Self {
        Self(holes)
    }
}

impl TryFrom<&[Hole]> for Assignment {
    type Error = SolverError;

    fn try_from(holes: &[Hole]) -> Result<Self, Self::Error> {
        let holes: [Hole; MARBLE_COUNT] =
            holes.try_into().map_err(|_| SolverError::WrongLength {
                expected: MARBLE_COUNT,
                actual: holes.len(),
            })?;
        Ok(Self(holes))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for marble in Marble::ALL {
            writeln!(f, "{:>10} -> {}", marble, self.position(marble))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Hole::*;

    fn swapped(a: usize, b: usize) -> Assignment {
        let mut holes = *Assignment::solved().holes();
        holes.swap(a, b);
        Assignment::new(holes)
    }

    #[test]
    fn test_solved_assignment() {
        let solved = Assignment::solved();
        assert!(solved.violations().is_empty());
        assert!(solved.is_valid());
        assert_eq!(solved.empty_hole(), Ok(White));
        assert_eq!(solved.heuristic(), 0);
        assert!(solved.is_solved());
    }

    #[test]
    fn test_violations_for_shared_hole() {
        let mut holes = *Assignment::solved().holes();
        holes[3] = Red;
        let assignment = Assignment::new(holes);

        assert!(!assignment.is_valid());
        assert_eq!(
            assignment.violations(),
            vec![
                "Marble Red shares the hole Red with 1 more marbles.".to_string(),
                "Marble Yellow shares the hole Red with 1 more marbles.".to_string(),
            ]
        );
    }

    #[test]
    fn test_violations_for_three_way_share() {
        let assignment = Assignment::new([
            Cyan, Cyan, DarkGreen, Yellow, Purple, Orange, Black, LightGreen, Pink, Pink, Cyan,
        ]);
        let violations = assignment.violations();
        assert_eq!(violations.len(), 5);
        assert_eq!(
            violations[0],
            "Marble Red shares the hole Cyan with 2 more marbles."
        );
        assert_eq!(
            violations[2],
            "Marble Cyan shares the hole Cyan with 2 more marbles."
        );
        assert_eq!(
            violations[3],
            "Marble DarkBlue shares the hole Pink with 1 more marbles."
        );
    }

    #[test]
    fn test_empty_hole_is_ambiguous_for_invalid_input() {
        let mut holes = *Assignment::solved().holes();
        holes[0] = LightBlue;
        let err = Assignment::new(holes).empty_hole().unwrap_err();
        assert_eq!(
            err,
            SolverError::AmbiguousEmptyHole {
                missing: vec![Red, White]
            }
        );
    }

    #[test]
    fn test_empty_hole_follows_moved_marble() {
        let mut holes = *Assignment::solved().holes();
        holes[0] = White;
        assert_eq!(Assignment::new(holes).empty_hole(), Ok(Red));
    }

    #[test]
    fn test_heuristic_counts_misplaced_marbles() {
        assert_eq!(swapped(0, 1).heuristic(), 2);
        assert_eq!(swapped(4, 9).heuristic(), 2);
    }

    #[test]
    fn test_key_distinguishes_assignments() {
        let a = swapped(0, 1);
        let b = swapped(0, 2);
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), swapped(1, 0).key());
        assert!(Assignment::solved().key().value() < 1 << 44);
    }

    #[test]
    fn test_occupant() {
        let assignment = swapped(0, 1);
        assert_eq!(assignment.occupant(Red), Marble::new(1));
        assert_eq!(assignment.occupant(White), None);
    }

    #[test]
    fn test_try_from_slice_checks_length() {
        let holes = [Red, LightBlue];
        assert_eq!(
            Assignment::try_from(&holes[..]),
            Err(SolverError::WrongLength {
                expected: 11,
                actual: 2
            })
        );
        let full = *Assignment::solved().holes();
        assert_eq!(Assignment::try_from(&full[..]), Ok(Assignment::solved()));
    }

    #[test]
    fn test_apply_checks_legality() {
        let board = Board::standard();
        let solved = Assignment::solved();
        let red = Marble::new(0).unwrap();

        let moved = solved
            .apply(&board, &Move::new(red, Red, White))
            .unwrap();
        assert_eq!(moved.empty_hole(), Ok(Red));

        assert!(matches!(
            solved.apply(&board, &Move::new(red, LightBlue, White)),
            Err(SolverError::MarbleNotAtSource { .. })
        ));
        assert!(matches!(
            solved.apply(&board, &Move::new(red, Red, Cyan)),
            Err(SolverError::DestinationOccupied { .. })
        ));

        // Pink is not next to White.
        let pink = Marble::new(9).unwrap();
        assert!(matches!(
            solved.apply(&board, &Move::new(pink, Pink, White)),
            Err(SolverError::NotAdjacent { .. })
        ));
    }
}
