//! Board topology.
//!
//! The physical board is an icosahedron: twelve holes, each touching
//! exactly five others. Adjacency is stored as one bitmask per hole, so
//! neighbor iteration and adjacency tests are branch-free lookups.

use crate::error::BoardError;
use crate::hole::{Hole, HOLE_COUNT};

use Hole::*;

/// Neighbor lists of the physical board, one row per hole in index order.
const STANDARD_NEIGHBORS: [[Hole; 5]; HOLE_COUNT] = [
    /* Red        */ [LightBlue, DarkGreen, Purple, Cyan, White],
    /* LightBlue  */ [Red, White, Black, LightGreen, DarkGreen],
    /* DarkGreen  */ [Red, LightBlue, LightGreen, DarkBlue, Purple],
    /* Yellow     */ [Pink, Orange, Black, White, Cyan],
    /* Purple     */ [Red, DarkGreen, DarkBlue, Pink, Cyan],
    /* Orange     */ [Black, Yellow, Pink, DarkBlue, LightGreen],
    /* Black      */ [LightBlue, White, Yellow, Orange, LightGreen],
    /* LightGreen */ [LightBlue, Black, Orange, DarkBlue, DarkGreen],
    /* DarkBlue   */ [Pink, Purple, DarkGreen, LightGreen, Orange],
    /* Pink       */ [Yellow, Cyan, Purple, DarkBlue, Orange],
    /* Cyan       */ [Yellow, White, Red, Purple, Pink],
    /* White      */ [LightBlue, Red, Cyan, Yellow, Black],
];

/// The board every puzzle is played on.
pub static STANDARD_BOARD: Board = Board::standard();

/// An undirected adjacency graph over the twelve holes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    adjacency: [u16; HOLE_COUNT],
}

impl Board {
    /// The physical board.
    pub const fn standard() -> Board {
        let mut adjacency = [0u16; HOLE_COUNT];
        let mut hole = 0;
        while hole < HOLE_COUNT {
            let mut i = 0;
            while i < 5 {
                let neighbor = STANDARD_NEIGHBORS[hole][i];
                adjacency[hole] |= neighbor.bit();
                adjacency[neighbor.index()] |= Hole::ALL[hole].bit();
                i += 1;
            }
            hole += 1;
        }
        Board { adjacency }
    }

    /// Build a board from a list of undirected edges.
    ///
    /// Edges are symmetrized; listing an edge twice is harmless.
    pub fn from_edges(edges: &[(Hole, Hole)]) -> Result<Board, BoardError> {
        let mut adjacency = [0u16; HOLE_COUNT];
        for &(a, b) in edges {
            if a == b {
                return Err(BoardError::SelfLoop(a));
            }
            adjacency[a.index()] |= b.bit();
            adjacency[b.index()] |= a.bit();
        }
        Ok(Board { adjacency })
    }

    /// Neighbors of `hole`, in ascending index order
    pub fn neighbors(&self, hole: Hole) -> impl Iterator<Item = Hole> + '_ {
        let mask = self.adjacency[hole.index()];
        Hole::ALL
            .into_iter()
            .filter(move |neighbor| mask & neighbor.bit() != 0)
    }

    #[inline]
    pub fn are_adjacent(&self, a: Hole, b: Hole) -> bool {
        self.adjacency[a.index()] & b.bit() != 0
    }

    #[inline]
    pub fn degree(&self, hole: Hole) -> usize {
        self.adjacency[hole.index()].count_ones() as usize
    }

    /// All undirected edges, each listed once with the lower index first
    pub fn edges(&self) -> Vec<(Hole, Hole)> {
        let mut edges = Vec::new();
        for a in Hole::ALL {
            for b in self.neighbors(a) {
                if a < b {
                    edges.push((a, b));
                }
            }
        }
        edges
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::standard()
    }
}
