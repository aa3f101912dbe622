//! CLI entry point for the Rush Hour solver.
//!
//! Usage:
//!   rush-hour solve <puzzle.csv> [--algorithm <name>] [--show]
//!   rush-hour solve --stdin [--algorithm <name>]
//!   rush-hour parse <puzzle.csv>
//!   rush-hour validate-move <puzzle.csv> --vehicle <id> --direction <dir>
//!   rush-hour compare <puzzle.csv>
//!
//! Algorithms: bfs (default), astar_h1, astar_h2, astar_h3.
//! Results are printed as JSON on stdout. Repeat -v for more log output.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::{info, LevelFilter};
use serde::Serialize;

use rush_hour::{
    find_move, load_puzzle, parse_puzzle, solve, Action, Algorithm, Board, Direction, LoadError,
    PuzzleDefinition, SearchStats, SolverConfig,
};

#[derive(Parser)]
#[command(name = "rush-hour")]
#[command(about = "Shortest-move solver for Rush Hour puzzles")]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Input {
    /// Path to the puzzle definition (use --stdin to read from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read the puzzle from stdin instead of a file
    #[arg(long)]
    stdin: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the shortest sequence of slides that frees the X vehicle
    Solve {
        #[command(flatten)]
        input: Input,

        /// Search algorithm: bfs, astar_h1, astar_h2 or astar_h3
        #[arg(long, default_value = "bfs")]
        algorithm: Algorithm,

        /// Print every board of the solution to stderr
        #[arg(long)]
        show: bool,
    },

    /// Print the parsed puzzle
    Parse {
        #[command(flatten)]
        input: Input,
    },

    /// Check whether a vehicle can slide in a direction
    ValidateMove {
        #[command(flatten)]
        input: Input,

        /// Vehicle identifier
        #[arg(long)]
        vehicle: String,

        /// up, down, left or right
        #[arg(long)]
        direction: String,
    },

    /// Run every algorithm on the same puzzle
    Compare {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    success: bool,
    algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<Vec<Action>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    stats: SearchStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseOutput {
    success: bool,
    puzzle: PuzzleDefinition,
    board: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            input,
            algorithm,
            show,
        } => {
            let board = load_board(&input);
            let output = run_solver(&board, algorithm, show);
            let solved = output.success;
            print_json(&output);

            process::exit(if solved { 0 } else { 1 });
        }

        Commands::Parse { input } => {
            let board = load_board(&input);
            print_json(&ParseOutput {
                success: true,
                puzzle: PuzzleDefinition::from_board(&board),
                board: board.to_string(),
            });
        }

        Commands::ValidateMove {
            input,
            vehicle,
            direction,
        } => {
            let board = load_board(&input);
            let action = Direction::from_name(&direction)
                .and_then(|direction| find_move(&board, &vehicle, direction));

            print_json(&ValidateOutput {
                valid: action.is_some(),
                step: action.map(|a| a.steps),
            });
        }

        Commands::Compare { input } => {
            let board = load_board(&input);
            let rows: Vec<SolveOutput> = Algorithm::ALL
                .into_iter()
                .map(|algorithm| run_solver(&board, algorithm, false))
                .collect();
            print_json(&rows);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run_solver(board: &Board, algorithm: Algorithm, show: bool) -> SolveOutput {
    let result = solve(board, &SolverConfig { algorithm });
    let stats = result.stats.clone();

    match result.solution() {
        Some(solution) => {
            info!(
                "{}: {} moves, {} generated, {} expanded, {} reopened in {:.2?}",
                algorithm,
                solution.moves(),
                stats.generated,
                stats.expanded,
                stats.reopened,
                stats.elapsed
            );
            if show {
                for (step, board) in solution.boards.iter().enumerate() {
                    match step.checked_sub(1).map(|i| &solution.actions[i]) {
                        Some(action) => eprintln!("{}. {}", step, action),
                        None => eprintln!("start"),
                    }
                    eprintln!("{}\n", board);
                }
            }

            SolveOutput {
                success: true,
                algorithm,
                moves: Some(solution.moves()),
                solution: Some(solution.actions.clone()),
                error: None,
                stats,
            }
        }
        None => {
            info!(
                "{}: no solution, {} generated, {} expanded in {:.2?}",
                algorithm, stats.generated, stats.expanded, stats.elapsed
            );

            SolveOutput {
                success: false,
                algorithm,
                solution: None,
                moves: None,
                error: Some("no solution found".to_string()),
                stats,
            }
        }
    }
}

fn load_board(input: &Input) -> Board {
    let loaded = if input.stdin {
        read_stdin()
            .map_err(LoadError::from)
            .and_then(|text| Ok(parse_puzzle(&text)?))
    } else if let Some(path) = &input.file {
        load_puzzle(path)
    } else {
        eprintln!("Error: Must provide either a file path or --stdin");
        process::exit(2);
    };

    match loaded {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn read_stdin() -> io::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error writing output: {}", e);
            process::exit(2);
        }
    }
}
