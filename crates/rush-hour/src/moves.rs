//! Legal slides and successor generation.
//!
//! A slide moves one vehicle any number of free cells along its axis and
//! always counts as a single move.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::MoveError;
use crate::puzzle::{Board, Direction, Position, Vehicle};

/// One slide: which vehicle, which way and how many cells
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub vehicle: Arc<str>,
    pub direction: Direction,
    pub steps: usize,
}

impl Action {
    pub fn new(vehicle: &str, direction: Direction, steps: usize) -> Self {
        Self {
            vehicle: Arc::from(vehicle),
            direction,
            steps,
        }
    }

    /// The slide that undoes this one.
    pub fn inverse(&self) -> Action {
        Action {
            vehicle: Arc::clone(&self.vehicle),
            direction: self.direction.opposite(),
            steps: self.steps,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.vehicle, self.direction, self.steps)
    }
}

/// Every legal slide from `board` with the board it leads to.
///
/// Vehicles are visited in definition order, left before right (up before
/// down), and shorter slides before longer ones. Search exploration order
/// and tie resolution between equally short solutions follow this order.
pub fn successors(board: &Board) -> Vec<(Action, Board)> {
    let mut out = Vec::new();

    for (index, vehicle) in board.vehicles().iter().enumerate() {
        for direction in vehicle.orientation.directions() {
            let free = free_run(board, vehicle, direction);
            for steps in 1..=free {
                out.push((
                    Action {
                        vehicle: Arc::clone(&vehicle.id),
                        direction,
                        steps,
                    },
                    slide(board, index, direction, steps),
                ));
            }
        }
    }

    out
}

/// The shortest legal slide of `vehicle` towards `direction`, if there is
/// room to move at all.
pub fn find_move(board: &Board, vehicle: &str, direction: Direction) -> Option<Action> {
    let current = board.vehicle(vehicle)?;
    if current.orientation != direction.orientation() {
        return None;
    }
    if free_run(board, current, direction) == 0 {
        return None;
    }
    Some(Action {
        vehicle: Arc::clone(&current.id),
        direction,
        steps: 1,
    })
}

/// Apply a sequence of actions, returning every board along the way
/// starting with `board` itself.
pub fn replay(board: &Board, actions: &[Action]) -> Result<Vec<Board>, MoveError> {
    let mut boards = Vec::with_capacity(actions.len() + 1);
    boards.push(board.clone());
    for action in actions {
        let next = boards[boards.len() - 1].apply(action)?;
        boards.push(next);
    }
    Ok(boards)
}

impl Board {
    /// The board after `action`, or why the slide is illegal here.
    pub fn apply(&self, action: &Action) -> Result<Board, MoveError> {
        let index = self
            .vehicle_index(&action.vehicle)
            .ok_or_else(|| MoveError::UnknownVehicle(action.vehicle.to_string()))?;
        let vehicle = &self.vehicles()[index];

        if vehicle.orientation != action.direction.orientation() {
            return Err(MoveError::WrongAxis {
                id: vehicle.id.to_string(),
                direction: action.direction,
            });
        }
        if action.steps == 0 {
            return Err(MoveError::ZeroSteps);
        }

        let free = free_run(self, vehicle, action.direction);
        if free < action.steps {
            return Err(MoveError::Blocked {
                id: vehicle.id.to_string(),
                direction: action.direction,
                steps: action.steps,
                free,
            });
        }

        Ok(slide(self, index, action.direction, action.steps))
    }
}

/// Number of empty cells in front of the vehicle's leading edge.
fn free_run(board: &Board, vehicle: &Vehicle, direction: Direction) -> usize {
    let lead = match direction {
        Direction::Left | Direction::Up => Position::new(vehicle.x, vehicle.y),
        Direction::Right | Direction::Down => vehicle.end(),
    };
    let (dx, dy) = direction.delta();

    let mut free = 0;
    let mut pos = lead;
    loop {
        let next = match (
            pos.x.checked_add_signed(dx),
            pos.y.checked_add_signed(dy),
        ) {
            (Some(x), Some(y)) => Position::new(x, y),
            _ => break,
        };
        if !board.is_free(next.x, next.y) {
            break;
        }
        free += 1;
        pos = next;
    }
    free
}

fn slide(board: &Board, index: usize, direction: Direction, steps: usize) -> Board {
    let mut vehicles = board.vehicles().to_vec();
    vehicles[index] = vehicles[index].shifted(direction, steps);
    board.with_vehicles(vehicles)
}
