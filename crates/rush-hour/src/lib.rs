//! Rush Hour solver library.
//!
//! This crate models Rush Hour boards (vehicles sliding along their own axis,
//! fixed walls) and finds the shortest sequence of slides that brings the
//! `X` vehicle to the exit, using breadth-first search or A* with one of
//! three heuristics.

pub mod error;
pub mod heuristic;
pub mod loading;
pub mod moves;
pub mod node;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use error::{AlgorithmError, LoadError, MoveError, PuzzleError};
pub use heuristic::Heuristic;
pub use loading::{load_puzzle, parse_puzzle, PuzzleDefinition};
pub use moves::{find_move, replay, successors, Action};
pub use puzzle::{Board, Cell, Direction, Orientation, Position, Vehicle, TARGET_ID};
pub use solver::{
    a_star, breadth_first, solve, Algorithm, Outcome, SearchStats, Solution, SolverConfig,
    SolverResult,
};
