//! Error types for puzzle loading, manual moves and algorithm dispatch.
//!
//! A search that runs out of states is not an error; see
//! [`crate::solver::Outcome::NoSolution`].

use std::io;

use thiserror::Error;

use crate::puzzle::Direction;

/// A puzzle definition that could not be turned into a [`crate::Board`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("puzzle definition is empty, expected `height,width` on the first line")]
    MissingDimensions,

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: &'static str,
        found: usize,
    },

    #[error("line {line}: invalid {field} `{value}`, expected a non-negative integer")]
    InvalidInteger {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: unknown orientation code `{code}`, expected `H` or `V`")]
    UnknownOrientation { line: usize, code: String },

    #[error("line {line}: vehicle `{id}` must have a length of at least 1")]
    ZeroLength { line: usize, id: String },

    #[error("board dimensions {height}x{width} must both be positive")]
    EmptyBoard { height: usize, width: usize },

    #[error("board dimensions {height}x{width} exceed the supported size")]
    BoardTooLarge { height: usize, width: usize },

    #[error("vehicle `{id}` is defined more than once")]
    DuplicateVehicle { id: String },

    #[error("vehicle `{id}` does not fit inside the board")]
    VehicleOutOfBounds { id: String },

    #[error("wall at ({x}, {y}) lies outside the board")]
    WallOutOfBounds { x: usize, y: usize },

    #[error("vehicles `{first}` and `{second}` overlap at ({x}, {y})")]
    Overlap {
        first: String,
        second: String,
        x: usize,
        y: usize,
    },

    #[error("vehicle `{id}` overlaps the wall at ({x}, {y})")]
    WallCollision { id: String, x: usize, y: usize },
}

/// A requested slide that is not legal on the current board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no vehicle named `{0}` on the board")]
    UnknownVehicle(String),

    #[error("vehicle `{id}` cannot move {direction}")]
    WrongAxis { id: String, direction: Direction },

    #[error("a move must cover at least one cell")]
    ZeroSteps,

    #[error("vehicle `{id}` is blocked after {free} of {steps} cells moving {direction}")]
    Blocked {
        id: String,
        direction: Direction,
        steps: usize,
        free: usize,
    },
}

/// An algorithm selector outside of `bfs`, `astar_h1`, `astar_h2`, `astar_h3`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgorithmError {
    #[error("unknown algorithm `{0}`, expected one of bfs, astar_h1, astar_h2, astar_h3")]
    Unknown(String),
}

/// Failure to read a puzzle definition file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read puzzle definition: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}
