//! Remaining-cost estimates for informed search.
//!
//! All three estimates start from the number of cells between the target's
//! leading edge and the right edge of the board, then add a penalty for the
//! vehicles standing in the way on the exit row.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::puzzle::{Board, Cell, Orientation, Vehicle};

/// Added per blocking vehicle so that boards with fewer blockers win ties.
pub const TIE_BREAK: f64 = 1e-3;

/// The published heuristics, selected as `astar_h1`, `astar_h2`, `astar_h3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heuristic {
    /// h1: cells left between the target and the exit
    #[serde(rename = "h1")]
    Distance,
    /// h2: h1 plus one per distinct blocking vehicle
    #[serde(rename = "h2")]
    BlockerCount,
    /// h3: h1 plus the cells each blocker must travel to clear the exit row
    #[serde(rename = "h3")]
    BlockerClearance,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Distance,
        Heuristic::BlockerCount,
        Heuristic::BlockerClearance,
    ];

    pub fn estimate(self, board: &Board) -> f64 {
        match self {
            Heuristic::Distance => distance_to_exit(board),
            Heuristic::BlockerCount => blocker_count(board),
            Heuristic::BlockerClearance => blocker_clearance(board),
        }
    }
}

/// h1. Zero when the board has no target vehicle.
pub fn distance_to_exit(board: &Board) -> f64 {
    board
        .target()
        .map_or(0.0, |t| board.width().saturating_sub(t.end().x + 1) as f64)
}

/// h2
pub fn blocker_count(board: &Board) -> f64 {
    let count = blockers(board).len() as f64;
    distance_to_exit(board) + count + TIE_BREAK * count
}

/// h3
pub fn blocker_clearance(board: &Board) -> f64 {
    let Some(row) = board.exit_row() else {
        return distance_to_exit(board);
    };
    let found = blockers(board);
    let clearance: usize = found
        .iter()
        .map(|&i| clearance(board, &board.vehicles()[i], row))
        .sum();
    distance_to_exit(board) + clearance as f64 + TIE_BREAK * found.len() as f64
}

/// Distinct vehicles on the exit row between the target and the right edge,
/// nearest first.
fn blockers(board: &Board) -> SmallVec<[usize; 4]> {
    let mut found = SmallVec::new();
    let (Some(target_index), Some(row)) = (board.target_index(), board.exit_row()) else {
        return found;
    };
    let target = &board.vehicles()[target_index];

    for x in (target.end().x + 1)..board.width() {
        if let Some(Cell::Vehicle(i)) = board.cell(x, row) {
            if i != target_index && !found.contains(&i) {
                found.push(i);
            }
        }
    }
    found
}

/// Fewest cells `vehicle` must slide to leave `row`. Horizontal vehicles can
/// never leave their row and count as one move.
fn clearance(board: &Board, vehicle: &Vehicle, row: usize) -> usize {
    if vehicle.orientation == Orientation::Horizontal {
        return 1;
    }

    let up = vehicle.y + vehicle.length - row;
    let down = row + 1 - vehicle.y;
    let fits_above = row >= vehicle.length;
    let fits_below = row + vehicle.length < board.height();

    match (fits_above, fits_below) {
        (true, false) => up,
        (false, true) => down,
        _ => up.min(down),
    }
}
