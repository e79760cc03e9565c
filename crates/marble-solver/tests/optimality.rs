//! Checks search results against an independent breadth-first search on
//! the same board.

use std::collections::HashMap;

use marble_solver::{
    replay, scramble, solve, Assignment, Hole, Marble, Move, Solution, HOLE_COUNT, MARBLE_COUNT,
    STANDARD_BOARD,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Every assignment one slide away, built straight from the board without
/// going through the library's move generator.
fn neighbors_of(state: &[Hole; MARBLE_COUNT]) -> Vec<[Hole; MARBLE_COUNT]> {
    let mut occupied = [false; HOLE_COUNT];
    for hole in state {
        occupied[hole.index()] = true;
    }
    let empty = Hole::ALL
        .into_iter()
        .find(|hole| !occupied[hole.index()])
        .expect("valid state has an empty hole");

    let mut out = Vec::new();
    for neighbor in STANDARD_BOARD.neighbors(empty) {
        if let Some(marble) = state.iter().position(|&h| h == neighbor) {
            let mut next = *state;
            next[marble] = empty;
            out.push(next);
        }
    }
    out
}

/// Expand one full BFS level of `frontier`, returning the shortest meeting
/// length with the opposite side, if any.
fn expand_level(
    frontier: &mut Vec<[Hole; MARBLE_COUNT]>,
    seen: &mut HashMap<[Hole; MARBLE_COUNT], usize>,
    other: &HashMap<[Hole; MARBLE_COUNT], usize>,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut next_frontier = Vec::new();
    for state in frontier.drain(..) {
        let depth = seen[&state];
        for next in neighbors_of(&state) {
            if seen.contains_key(&next) {
                continue;
            }
            seen.insert(next, depth + 1);
            if let Some(rest) = other.get(&next) {
                let total = depth + 1 + rest;
                best = Some(best.map_or(total, |b| b.min(total)));
            }
            next_frontier.push(next);
        }
    }
    *frontier = next_frontier;
    best
}

/// Length of a shortest path from `start` to the solved assignment, using
/// bidirectional breadth-first search. Slides are reversible, so the
/// backward side uses the same neighbor function.
fn shortest_path_length(start: &Assignment) -> usize {
    let start = *start.holes();
    let goal = *Assignment::solved().holes();
    if start == goal {
        return 0;
    }

    let mut forward_seen = HashMap::from([(start, 0)]);
    let mut backward_seen = HashMap::from([(goal, 0)]);
    let mut forward = vec![start];
    let mut backward = vec![goal];

    loop {
        assert!(
            !forward.is_empty() && !backward.is_empty(),
            "goal unreachable"
        );
        let found = if forward.len() <= backward.len() {
            expand_level(&mut forward, &mut forward_seen, &backward_seen)
        } else {
            expand_level(&mut backward, &mut backward_seen, &forward_seen)
        };
        if let Some(length) = found {
            return length;
        }
    }
}

fn swapped(a: usize, b: usize) -> Assignment {
    let mut holes = *Assignment::solved().holes();
    holes.swap(a, b);
    Assignment::new(holes)
}

fn solution_moves(assignment: &Assignment) -> Vec<Move> {
    match solve(assignment).expect("valid input") {
        Solution::Moves(moves) => moves,
        Solution::NoSolution => panic!("standard board always has a solution"),
    }
}

fn assert_optimal(start: &Assignment) -> Vec<Move> {
    let moves = solution_moves(start);
    let trail = replay(&STANDARD_BOARD, start, &moves).expect("moves are legal");
    assert!(trail.last().unwrap().is_solved());
    assert_eq!(
        moves.len(),
        shortest_path_length(start),
        "suboptimal solution for {:?}",
        start
    );
    moves
}

#[test]
fn test_every_pair_swap_is_solved_optimally() {
    for a in 0..MARBLE_COUNT {
        for b in (a + 1)..MARBLE_COUNT {
            let start = swapped(a, b);
            let moves = assert_optimal(&start);
            assert!(!moves.is_empty());
        }
    }
}

#[test]
fn test_known_swap_lengths() {
    // Red/LightBlue share a triangle with White; Red/Orange sit far apart.
    assert_eq!(solution_moves(&swapped(0, 1)).len(), 3);
    assert_eq!(solution_moves(&swapped(0, 5)).len(), 13);
}

#[test]
fn test_moves_name_marbles_by_identity() {
    let start = swapped(0, 1);
    let moves = solution_moves(&start);
    let red = Marble::new(0).unwrap();
    let light_blue = Marble::new(1).unwrap();
    assert!(moves
        .iter()
        .all(|mv| mv.marble == red || mv.marble == light_blue));
    for mv in &moves {
        assert!(mv.to_string().starts_with("Move marble "));
    }
}

#[test]
fn test_heuristic_drops_by_one_when_path_is_tight() {
    // Red slid into White, then LightBlue into Red: two moves, two misplaced.
    let red = Marble::new(0).unwrap();
    let light_blue = Marble::new(1).unwrap();
    let start = Assignment::solved()
        .apply(&STANDARD_BOARD, &Move::new(red, Hole::Red, Hole::White))
        .and_then(|a| {
            a.apply(
                &STANDARD_BOARD,
                &Move::new(light_blue, Hole::LightBlue, Hole::Red),
            )
        })
        .unwrap();
    assert_eq!(start.heuristic(), 2);

    let moves = solution_moves(&start);
    assert_eq!(moves.len(), 2);
    let trail = replay(&STANDARD_BOARD, &start, &moves).unwrap();
    let heuristics: Vec<u32> = trail.iter().map(Assignment::heuristic).collect();
    assert_eq!(heuristics, vec![2, 1, 0]);
}

fn valid_assignment() -> impl Strategy<Value = Assignment> {
    Just(Hole::ALL.to_vec())
        .prop_shuffle()
        .prop_map(|holes| Assignment::try_from(&holes[..MARBLE_COUNT]).unwrap())
}

fn scrambled_assignment() -> impl Strategy<Value = Assignment> {
    (any::<u64>(), 0usize..8).prop_map(|(seed, steps)| {
        scramble(&STANDARD_BOARD, steps, &mut StdRng::seed_from_u64(seed))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_distinct_assignments_have_no_violations(assignment in valid_assignment()) {
        prop_assert!(assignment.violations().is_empty());
        prop_assert!(assignment.empty_hole().is_ok());
    }

    #[test]
    fn prop_validation_is_pure(assignment in valid_assignment()) {
        prop_assert_eq!(assignment.violations(), assignment.violations());
        prop_assert_eq!(assignment.empty_hole(), assignment.empty_hole());
    }

    #[test]
    fn prop_shared_hole_reports_each_marble(
        assignment in valid_assignment(),
        a in 0usize..MARBLE_COUNT,
        b in 0usize..MARBLE_COUNT,
    ) {
        prop_assume!(a != b);
        let mut holes = *assignment.holes();
        holes[b] = holes[a];
        let broken = Assignment::new(holes);
        let shared = holes[a];

        let violations = broken.violations();
        prop_assert_eq!(violations.len(), 2);
        for violation in &violations {
            let expected = format!("shares the hole {} with 1 more marbles.", shared);
            prop_assert!(violation.ends_with(&expected));
        }
        prop_assert!(broken.empty_hole().is_err());
    }

    #[test]
    fn prop_heuristic_is_admissible(start in scrambled_assignment()) {
        prop_assert!(start.heuristic() as usize <= shortest_path_length(&start));
    }

    #[test]
    fn prop_solutions_are_optimal_and_replayable(start in scrambled_assignment()) {
        let moves = solution_moves(&start);
        prop_assert_eq!(moves.len(), shortest_path_length(&start));

        let trail = replay(&STANDARD_BOARD, &start, &moves).unwrap();
        prop_assert!(trail.last().unwrap().is_solved());
        // A single slide changes the misplaced count by at most one.
        for pair in trail.windows(2) {
            let before = pair[0].heuristic() as i64;
            let after = pair[1].heuristic() as i64;
            prop_assert!((before - after).abs() <= 1);
        }
        if moves.len() == start.heuristic() as usize {
            for pair in trail.windows(2) {
                prop_assert_eq!(pair[0].heuristic(), pair[1].heuristic() + 1);
            }
        }
    }
}
