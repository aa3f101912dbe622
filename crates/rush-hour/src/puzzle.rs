//! Board model for Rush Hour puzzles.
//!
//! A [`Board`] is an immutable snapshot: vehicle positions plus the walls and
//! dimensions shared by every state derived from the same puzzle. The
//! occupancy grid is always rebuilt from the vehicle list and never edited in
//! place.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

/// Identifier of the vehicle that has to reach the exit.
pub const TARGET_ID: &str = "X";

/// Largest accepted board, in cells.
pub const MAX_CELLS: usize = 1 << 20;

/// Vehicle orientation, written `H` or `V` in puzzle definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "H")]
    Horizontal,
    #[serde(rename = "V")]
    Vertical,
}

impl Orientation {
    pub fn from_code(code: &str) -> Option<Orientation> {
        match code {
            "H" => Some(Orientation::Horizontal),
            "V" => Some(Orientation::Vertical),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Orientation::Horizontal => 'H',
            Orientation::Vertical => 'V',
        }
    }

    /// Directions along this axis, towards the origin first.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Orientation::Horizontal => [Direction::Left, Direction::Right],
            Orientation::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

/// Slide direction of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The axis a vehicle must lie on to move this way.
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn from_name(name: &str) -> Option<Direction> {
        match name {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cell on the board, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A vehicle occupying `length` contiguous cells from its origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Arc<str>,
    pub x: usize,
    pub y: usize,
    pub orientation: Orientation,
    pub length: usize,
}

impl Vehicle {
    pub fn new(id: &str, x: usize, y: usize, orientation: Orientation, length: usize) -> Self {
        Self {
            id: Arc::from(id),
            x,
            y,
            orientation,
            length,
        }
    }

    pub fn is_target(&self) -> bool {
        &*self.id == TARGET_ID
    }

    /// Cells covered by the vehicle, origin first.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.length).map(move |i| match self.orientation {
            Orientation::Horizontal => Position::new(self.x + i, self.y),
            Orientation::Vertical => Position::new(self.x, self.y + i),
        })
    }

    /// The last covered cell (right or bottom end).
    pub fn end(&self) -> Position {
        match self.orientation {
            Orientation::Horizontal => Position::new(self.x + self.length - 1, self.y),
            Orientation::Vertical => Position::new(self.x, self.y + self.length - 1),
        }
    }

    /// Whether every cell lies on a `width` by `height` board. Checked
    /// without computing the end cell, which may not be representable.
    fn fits(&self, width: usize, height: usize) -> bool {
        let (along, room, across, limit) = match self.orientation {
            Orientation::Horizontal => (self.x, width, self.y, height),
            Orientation::Vertical => (self.y, height, self.x, width),
        };
        across < limit && along < room && self.length <= room - along
    }

    /// Copy of this vehicle shifted by `steps` cells. The caller guarantees
    /// the destination stays on the board.
    pub(crate) fn shifted(&self, direction: Direction, steps: usize) -> Vehicle {
        let mut moved = self.clone();
        match direction {
            Direction::Up => moved.y -= steps,
            Direction::Down => moved.y += steps,
            Direction::Left => moved.x -= steps,
            Direction::Right => moved.x += steps,
        }
        moved
    }
}

/// Content of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    /// Index into the board's vehicle list
    Vehicle(usize),
}

/// Everything that is constant across the states of one puzzle.
#[derive(Debug)]
struct Layout {
    width: usize,
    height: usize,
    walls: Vec<Position>,
    /// Vehicle indices sorted by id, used for equality and hashing
    canonical: Vec<usize>,
    target: Option<usize>,
}

/// A puzzle state.
///
/// Equality and hashing only look at the vehicles, keyed by id, so two boards
/// compare equal regardless of the order their vehicles were defined in.
#[derive(Debug, Clone)]
pub struct Board {
    layout: Arc<Layout>,
    vehicles: Vec<Vehicle>,
    grid: Vec<Cell>,
}

impl Board {
    /// Build a board, checking that every vehicle and wall is inside the
    /// board and that nothing overlaps.
    pub fn new(
        height: usize,
        width: usize,
        vehicles: Vec<Vehicle>,
        walls: Vec<Position>,
    ) -> Result<Board, PuzzleError> {
        if height == 0 || width == 0 {
            return Err(PuzzleError::EmptyBoard { height, width });
        }
        let cells = height
            .checked_mul(width)
            .filter(|&cells| cells <= MAX_CELLS)
            .ok_or(PuzzleError::BoardTooLarge { height, width })?;

        let mut grid = vec![Cell::Empty; cells];

        for wall in &walls {
            if wall.x >= width || wall.y >= height {
                return Err(PuzzleError::WallOutOfBounds {
                    x: wall.x,
                    y: wall.y,
                });
            }
            grid[wall.y * width + wall.x] = Cell::Wall;
        }

        for (index, vehicle) in vehicles.iter().enumerate() {
            if vehicles[..index].iter().any(|v| v.id == vehicle.id) {
                return Err(PuzzleError::DuplicateVehicle {
                    id: vehicle.id.to_string(),
                });
            }
            if vehicle.length == 0 || !vehicle.fits(width, height) {
                return Err(PuzzleError::VehicleOutOfBounds {
                    id: vehicle.id.to_string(),
                });
            }
            for pos in vehicle.cells() {
                let cell = &mut grid[pos.y * width + pos.x];
                match *cell {
                    Cell::Empty => *cell = Cell::Vehicle(index),
                    Cell::Wall => {
                        return Err(PuzzleError::WallCollision {
                            id: vehicle.id.to_string(),
                            x: pos.x,
                            y: pos.y,
                        })
                    }
                    Cell::Vehicle(other) => {
                        return Err(PuzzleError::Overlap {
                            first: vehicles[other].id.to_string(),
                            second: vehicle.id.to_string(),
                            x: pos.x,
                            y: pos.y,
                        })
                    }
                }
            }
        }

        let mut canonical: Vec<usize> = (0..vehicles.len()).collect();
        canonical.sort_by(|&a, &b| vehicles[a].id.cmp(&vehicles[b].id));
        let target = vehicles.iter().position(Vehicle::is_target);

        Ok(Board {
            layout: Arc::new(Layout {
                width,
                height,
                walls,
                canonical,
                target,
            }),
            vehicles,
            grid,
        })
    }

    /// A sibling state sharing this board's layout. The vehicle list must be
    /// a legal rearrangement of the current one (same ids, same order).
    pub(crate) fn with_vehicles(&self, vehicles: Vec<Vehicle>) -> Board {
        let grid = rasterize(&self.layout, &vehicles);
        Board {
            layout: Arc::clone(&self.layout),
            vehicles,
            grid,
        }
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn walls(&self) -> &[Position] {
        &self.layout.walls
    }

    /// Vehicles in definition order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| &*v.id == id)
    }

    pub(crate) fn vehicle_index(&self, id: &str) -> Option<usize> {
        self.vehicles.iter().position(|v| &*v.id == id)
    }

    /// Content of a cell, `None` when outside the board.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.grid[y * self.width() + x])
    }

    pub(crate) fn is_free(&self, x: usize, y: usize) -> bool {
        self.cell(x, y) == Some(Cell::Empty)
    }

    pub fn target(&self) -> Option<&Vehicle> {
        self.layout.target.map(|i| &self.vehicles[i])
    }

    pub(crate) fn target_index(&self) -> Option<usize> {
        self.layout.target
    }

    /// The row the target leaves through, `height / 2 - 1`. Boards of height
    /// one have no exit row.
    pub fn exit_row(&self) -> Option<usize> {
        (self.height() / 2).checked_sub(1)
    }

    /// A horizontal target ends on the right edge of the exit row. A board
    /// without a target, or with a vertical one, is never solved.
    pub fn is_goal(&self) -> bool {
        match (self.target(), self.exit_row()) {
            (Some(target), Some(row)) => {
                target.orientation == Orientation::Horizontal
                    && target.end().x + 1 == self.width()
                    && target.y == row
            }
            _ => false,
        }
    }

    fn canonical(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        self.layout.canonical.iter().map(|&i| &self.vehicles[i])
    }
}

fn rasterize(layout: &Layout, vehicles: &[Vehicle]) -> Vec<Cell> {
    let mut grid = vec![Cell::Empty; layout.width * layout.height];
    for wall in &layout.walls {
        grid[wall.y * layout.width + wall.x] = Cell::Wall;
    }
    for (index, vehicle) in vehicles.iter().enumerate() {
        for pos in vehicle.cells() {
            grid[pos.y * layout.width + pos.x] = Cell::Vehicle(index);
        }
    }
    grid
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.vehicles.len() == other.vehicles.len() && self.canonical().eq(other.canonical())
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.vehicles.len());
        for vehicle in self.canonical() {
            vehicle.hash(state);
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.grid.chunks(self.width()).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, cell) in cells.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                match cell {
                    Cell::Empty => f.write_str(".")?,
                    Cell::Wall => f.write_str("#")?,
                    Cell::Vehicle(i) => {
                        let label = self.vehicles[*i].id.chars().next().unwrap_or('?');
                        write!(f, "{}", label)?
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(board: &Board) -> u64 {
        let mut hasher = DefaultHasher::new();
        board.hash(&mut hasher);
        hasher.finish()
    }

    fn sample_vehicles() -> Vec<Vehicle> {
        vec![
            Vehicle::new("X", 0, 2, Orientation::Horizontal, 2),
            Vehicle::new("B", 4, 1, Orientation::Vertical, 2),
        ]
    }

    #[test]
    fn test_grid_matches_vehicles_and_walls() {
        let board = Board::new(6, 6, sample_vehicles(), vec![Position::new(0, 0)]).unwrap();

        assert_eq!(board.cell(0, 0), Some(Cell::Wall));
        assert_eq!(board.cell(0, 2), Some(Cell::Vehicle(0)));
        assert_eq!(board.cell(1, 2), Some(Cell::Vehicle(0)));
        assert_eq!(board.cell(4, 1), Some(Cell::Vehicle(1)));
        assert_eq!(board.cell(4, 2), Some(Cell::Vehicle(1)));
        assert_eq!(board.cell(4, 3), Some(Cell::Empty));
        assert_eq!(board.cell(6, 0), None);
    }

    #[test]
    fn test_equality_ignores_definition_order() {
        let forward = Board::new(6, 6, sample_vehicles(), vec![]).unwrap();
        let mut reversed_vehicles = sample_vehicles();
        reversed_vehicles.reverse();
        let reversed = Board::new(6, 6, reversed_vehicles, vec![]).unwrap();

        assert_eq!(forward, reversed);
        assert_eq!(hash_of(&forward), hash_of(&reversed));
    }

    #[test]
    fn test_equality_sees_position_changes() {
        let board = Board::new(6, 6, sample_vehicles(), vec![]).unwrap();
        let mut vehicles = sample_vehicles();
        vehicles[1].y = 0;
        let moved = board.with_vehicles(vehicles);

        assert_ne!(board, moved);
        assert_eq!(moved.cell(4, 0), Some(Cell::Vehicle(1)));
        assert_eq!(moved.cell(4, 2), Some(Cell::Empty));
    }

    #[test]
    fn test_goal_requires_right_edge_on_exit_row() {
        let at_exit = Board::new(
            6,
            6,
            vec![Vehicle::new("X", 4, 2, Orientation::Horizontal, 2)],
            vec![],
        )
        .unwrap();
        assert_eq!(at_exit.exit_row(), Some(2));
        assert!(at_exit.is_goal());

        let one_short = Board::new(
            6,
            6,
            vec![Vehicle::new("X", 3, 2, Orientation::Horizontal, 2)],
            vec![],
        )
        .unwrap();
        assert!(!one_short.is_goal());

        let wrong_row = Board::new(
            6,
            6,
            vec![Vehicle::new("X", 4, 3, Orientation::Horizontal, 2)],
            vec![],
        )
        .unwrap();
        assert!(!wrong_row.is_goal());

        // Standing in the last column is not enough, the exit takes a horizontal X.
        let upright = Board::new(
            6,
            6,
            vec![Vehicle::new("X", 4, 2, Orientation::Vertical, 2)],
            vec![],
        )
        .unwrap();
        assert!(!upright.is_goal());
        let edge_column = Board::new(
            6,
            6,
            vec![Vehicle::new("X", 5, 1, Orientation::Vertical, 2)],
            vec![],
        )
        .unwrap();
        assert!(!edge_column.is_goal());
    }

    #[test]
    fn test_missing_target_is_never_goal() {
        let board = Board::new(
            6,
            6,
            vec![Vehicle::new("A", 4, 2, Orientation::Horizontal, 2)],
            vec![],
        )
        .unwrap();

        assert!(board.target().is_none());
        assert!(!board.is_goal());
    }

    #[test]
    fn test_rejects_overlap_and_out_of_bounds() {
        let overlap = Board::new(
            6,
            6,
            vec![
                Vehicle::new("X", 0, 2, Orientation::Horizontal, 3),
                Vehicle::new("A", 2, 0, Orientation::Vertical, 3),
            ],
            vec![],
        );
        assert_eq!(
            overlap.unwrap_err(),
            PuzzleError::Overlap {
                first: "X".to_string(),
                second: "A".to_string(),
                x: 2,
                y: 2,
            }
        );

        let outside = Board::new(
            6,
            6,
            vec![Vehicle::new("X", 5, 2, Orientation::Horizontal, 2)],
            vec![],
        );
        assert!(matches!(
            outside,
            Err(PuzzleError::VehicleOutOfBounds { .. })
        ));

        let on_wall = Board::new(
            6,
            6,
            vec![Vehicle::new("X", 0, 2, Orientation::Horizontal, 2)],
            vec![Position::new(1, 2)],
        );
        assert!(matches!(on_wall, Err(PuzzleError::WallCollision { .. })));

        let duplicate = Board::new(
            6,
            6,
            vec![
                Vehicle::new("A", 0, 0, Orientation::Horizontal, 2),
                Vehicle::new("A", 0, 1, Orientation::Horizontal, 2),
            ],
            vec![],
        );
        assert!(matches!(
            duplicate,
            Err(PuzzleError::DuplicateVehicle { .. })
        ));
    }

    #[test]
    fn test_display_renders_grid() {
        let board = Board::new(
            3,
            4,
            vec![Vehicle::new("X", 0, 0, Orientation::Horizontal, 2)],
            vec![Position::new(3, 2)],
        )
        .unwrap();

        assert_eq!(board.to_string(), "X X . .\n. . . .\n. . . #");
    }

    #[test]
    fn test_direction_helpers() {
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.orientation(), Orientation::Vertical);
        assert_eq!(Direction::from_name("right"), Some(Direction::Right));
        assert_eq!(Direction::from_name("sideways"), None);
        assert_eq!(
            Orientation::Horizontal.directions(),
            [Direction::Left, Direction::Right]
        );
    }
}
