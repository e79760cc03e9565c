//! CLI entry point for the marble solver.
//!
//! Usage:
//!   marble-solver solve <HOLE x11> [options]
//!   marble-solver solve --file <puzzle.json> [options]
//!   marble-solver solve --stdin [options]
//!   marble-solver validate <HOLE x11>
//!   marble-solver scramble [--steps <n>] [--seed <n>]
//!   marble-solver board
//!
//! Holes are listed in marble order (Red, LightBlue, ..., Cyan): the n-th
//! value names the hole the n-th marble currently sits in. A puzzle file
//! looks like `{"marbles": ["Red", "LightBlue", ...]}`.
//!
//! Options:
//!   --json                  Print a JSON report instead of text
//!   --max-expansions <n>    Give up after expanding n states
//!   --timeout <seconds>     Give up after this many seconds
//!   -v, -vv                 Log search progress to stderr

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use marble_solver::{
    replay, scramble, Assignment, Hole, Marble, Move, SearchStats, SolveOutcome, Solver,
    SolverConfig, StopReason, STANDARD_BOARD,
};

#[derive(Parser)]
#[command(name = "marble-solver")]
#[command(about = "Optimal solver for the twelve-hole sliding marble puzzle")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest move sequence that brings every marble home
    Solve {
        #[command(flatten)]
        input: PuzzleInput,

        /// Print a JSON report
        #[arg(long)]
        json: bool,

        /// Stop after expanding this many states
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Check that no two marbles share a hole
    Validate {
        #[command(flatten)]
        input: PuzzleInput,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },
    /// Print a random solvable position
    Scramble {
        /// Number of random slides from the solved position
        #[arg(long, default_value = "30")]
        steps: usize,

        /// Seed for a reproducible scramble
        #[arg(long)]
        seed: Option<u64>,

        /// Print the position as a puzzle file
        #[arg(long)]
        json: bool,
    },
    /// Print the neighbors of every hole
    Board,
}

#[derive(Args)]
struct PuzzleInput {
    /// Hole of each marble, in marble order
    #[arg(value_name = "HOLE", num_args = 0..)]
    holes: Vec<Hole>,

    /// Path to a puzzle JSON file
    #[arg(long, conflicts_with_all = ["holes", "stdin"])]
    file: Option<PathBuf>,

    /// Read a puzzle JSON document from stdin
    #[arg(long, conflicts_with = "holes")]
    stdin: bool,
}

/// Puzzle file format
#[derive(Debug, Serialize, Deserialize)]
struct PuzzleFile {
    marbles: Vec<Hole>,
}

/// Output format for a solve run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_hole: Option<Hole>,
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    move_count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    moves: Vec<MoveOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SearchStats>,
}

#[derive(Debug, Serialize)]
struct MoveOutput {
    marble: Marble,
    from: Hole,
    to: Hole,
    description: String,
}

impl From<&Move> for MoveOutput {
    fn from(mv: &Move) -> Self {
        Self {
            marble: mv.marble,
            from: mv.from,
            to: mv.to,
            description: mv.to_string(),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Solve {
            input,
            json,
            max_expansions,
            timeout,
        } => {
            let assignment = read_assignment(&input)?;
            let mut config = SolverConfig::default();
            if let Some(limit) = max_expansions {
                config = config.with_max_expansions(limit);
            }
            if let Some(seconds) = timeout {
                config = config.with_timeout(Duration::from_secs(seconds));
            }
            run_solve(&assignment, config, json)
        }
        Commands::Validate { input, json } => {
            let assignment = read_assignment(&input)?;
            run_validate(&assignment, json)
        }
        Commands::Scramble { steps, seed, json } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let assignment = scramble(&STANDARD_BOARD, steps, &mut rng);
            tracing::debug!(steps, seed = ?seed, "scrambled");
            if json {
                let file = PuzzleFile {
                    marbles: assignment.holes().to_vec(),
                };
                println!("{}", serde_json::to_string_pretty(&file)?);
            } else {
                let names: Vec<&str> = assignment.holes().iter().map(|h| h.name()).collect();
                println!("{}", names.join(" "));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Board => {
            for hole in Hole::ALL {
                let neighbors: Vec<&str> =
                    STANDARD_BOARD.neighbors(hole).map(|h| h.name()).collect();
                println!("{:>10}: {}", hole, neighbors.join(", "));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_assignment(input: &PuzzleInput) -> Result<Assignment> {
    let holes = if input.stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        parse_puzzle(&buffer)?
    } else if let Some(path) = &input.file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        parse_puzzle(&content).with_context(|| format!("Invalid puzzle file {}", path.display()))?
    } else if !input.holes.is_empty() {
        input.holes.clone()
    } else {
        bail!("Must provide 11 holes, --file or --stdin");
    };

    Ok(Assignment::try_from(holes.as_slice())?)
}

fn parse_puzzle(json: &str) -> Result<Vec<Hole>> {
    let puzzle: PuzzleFile = serde_json::from_str(json).context("Error parsing puzzle JSON")?;
    Ok(puzzle.marbles)
}

fn run_validate(assignment: &Assignment, json: bool) -> Result<ExitCode> {
    let violations = assignment.violations();
    let empty_hole = if violations.is_empty() {
        Some(assignment.empty_hole()?)
    } else {
        None
    };

    if json {
        let output = SolveOutput {
            valid: violations.is_empty(),
            empty_hole,
            solved: assignment.is_valid() && assignment.is_solved(),
            violations: violations.clone(),
            stop_reason: None,
            move_count: None,
            moves: Vec::new(),
            stats: None,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if let Some(empty) = empty_hole {
        println!("Input is valid; the empty hole is {}.", empty);
    } else {
        print_violations(&violations);
    }

    Ok(exit_code(violations.is_empty()))
}

fn run_solve(assignment: &Assignment, config: SolverConfig, json: bool) -> Result<ExitCode> {
    let violations = assignment.violations();
    if !violations.is_empty() {
        if json {
            let output = SolveOutput {
                valid: false,
                violations,
                empty_hole: None,
                solved: false,
                stop_reason: None,
                move_count: None,
                moves: Vec::new(),
                stats: None,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_violations(&violations);
        }
        return Ok(ExitCode::FAILURE);
    }

    let result = Solver::new(&STANDARD_BOARD)
        .with_config(config)
        .run(assignment)?;

    if json {
        let (solved, stop_reason, moves): (bool, Option<StopReason>, Vec<MoveOutput>) =
            match &result.outcome {
                SolveOutcome::Solved(moves) => {
                    (true, None, moves.iter().map(MoveOutput::from).collect())
                }
                SolveOutcome::NoSolution => (false, None, Vec::new()),
                SolveOutcome::Interrupted(reason) => (false, Some(*reason), Vec::new()),
            };
        let output = SolveOutput {
            valid: true,
            violations: Vec::new(),
            empty_hole: Some(assignment.empty_hole()?),
            solved,
            stop_reason,
            move_count: solved.then_some(moves.len()),
            moves,
            stats: Some(result.stats.clone()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match &result.outcome {
            SolveOutcome::Solved(moves) if moves.is_empty() => {
                println!("Already solved.");
            }
            SolveOutcome::Solved(moves) => {
                println!("Solution Steps ({} moves):", moves.len());
                let trail = replay(&STANDARD_BOARD, assignment, moves)?;
                for (step, (mv, after)) in moves.iter().zip(trail.iter().skip(1)).enumerate() {
                    println!(
                        "{:>3}. {} (empty: {})",
                        step + 1,
                        mv,
                        after.empty_hole()?
                    );
                }
            }
            SolveOutcome::NoSolution => println!("No solution found."),
            SolveOutcome::Interrupted(reason) => {
                println!("Search stopped early ({:?}).", reason);
            }
        }
    }

    Ok(exit_code(matches!(result.outcome, SolveOutcome::Solved(_))))
}

fn print_violations(violations: &[String]) {
    println!("Input is invalid:");
    for violation in violations {
        println!("  - {}", violation);
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
