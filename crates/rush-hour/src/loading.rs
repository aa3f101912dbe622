//! Reading puzzle definitions.
//!
//! The format is comma separated, one record per line:
//!
//! ```text
//! 6,6          height, width
//! X,0,2,H,2    vehicle id, x, y, orientation, length
//! #,3,0        wall marker, x, y
//! ```
//!
//! Blank lines are skipped. Any malformed record fails the whole load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, PuzzleError};
use crate::puzzle::{Board, Orientation, Position, Vehicle};

/// First field of a wall record.
pub const WALL_MARKER: &str = "#";

/// Describes a puzzle as plain data, the shape returned to callers that want
/// to inspect or draw a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    pub width: usize,
    pub height: usize,
    pub vehicles: Vec<Vehicle>,
    pub walls: Vec<Position>,
}

impl PuzzleDefinition {
    pub fn from_board(board: &Board) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            vehicles: board.vehicles().to_vec(),
            walls: board.walls().to_vec(),
        }
    }

    pub fn into_board(self) -> Result<Board, PuzzleError> {
        Board::new(self.height, self.width, self.vehicles, self.walls)
    }

    /// Write the definition back out in the text format.
    pub fn to_text(&self) -> String {
        let mut out = format!("{},{}\n", self.height, self.width);
        for vehicle in &self.vehicles {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                vehicle.id,
                vehicle.x,
                vehicle.y,
                vehicle.orientation.code(),
                vehicle.length
            ));
        }
        for wall in &self.walls {
            out.push_str(&format!("{},{},{}\n", WALL_MARKER, wall.x, wall.y));
        }
        out
    }
}

/// Parse a puzzle definition from text.
pub fn parse_puzzle(text: &str) -> Result<Board, PuzzleError> {
    parse_definition(text)?.into_board()
}

/// Read and parse a puzzle definition file.
pub fn load_puzzle(path: &Path) -> Result<Board, LoadError> {
    let text = fs::read_to_string(path)?;
    Ok(parse_puzzle(&text)?)
}

/// Parse the records without checking board invariants.
pub fn parse_definition(text: &str) -> Result<PuzzleDefinition, PuzzleError> {
    let mut records = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (line, header) = records.next().ok_or(PuzzleError::MissingDimensions)?;
    let fields = split_fields(header);
    if fields.len() != 2 {
        return Err(PuzzleError::FieldCount {
            line,
            expected: "2",
            found: fields.len(),
        });
    }
    let height = parse_number(line, "height", fields[0])?;
    let width = parse_number(line, "width", fields[1])?;

    let mut vehicles = Vec::new();
    let mut walls = Vec::new();

    for (line, record) in records {
        let fields = split_fields(record);

        if fields[0] == WALL_MARKER {
            if fields.len() != 3 {
                return Err(PuzzleError::FieldCount {
                    line,
                    expected: "3 for a wall",
                    found: fields.len(),
                });
            }
            walls.push(Position::new(
                parse_number(line, "x", fields[1])?,
                parse_number(line, "y", fields[2])?,
            ));
            continue;
        }

        if fields.len() != 5 {
            return Err(PuzzleError::FieldCount {
                line,
                expected: "5 for a vehicle",
                found: fields.len(),
            });
        }
        let id = fields[0];
        let x = parse_number(line, "x", fields[1])?;
        let y = parse_number(line, "y", fields[2])?;
        let orientation =
            Orientation::from_code(fields[3]).ok_or_else(|| PuzzleError::UnknownOrientation {
                line,
                code: fields[3].to_string(),
            })?;
        let length = parse_number(line, "length", fields[4])?;
        if length == 0 {
            return Err(PuzzleError::ZeroLength {
                line,
                id: id.to_string(),
            });
        }

        vehicles.push(Vehicle::new(id, x, y, orientation, length));
    }

    Ok(PuzzleDefinition {
        width,
        height,
        vehicles,
        walls,
    })
}

fn split_fields(record: &str) -> Vec<&str> {
    record.split(',').map(str::trim).collect()
}

fn parse_number(line: usize, field: &'static str, value: &str) -> Result<usize, PuzzleError> {
    value.parse().map_err(|_| PuzzleError::InvalidInteger {
        line,
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Cell;

    const SAMPLE: &str = "6,6
X,0,2,H,2

B,4,1,V,2
#,0,0
";

    #[test]
    fn test_parse_sample() {
        let board = parse_puzzle(SAMPLE).unwrap();

        assert_eq!(board.height(), 6);
        assert_eq!(board.width(), 6);
        assert_eq!(board.vehicles().len(), 2);
        assert_eq!(board.walls(), &[Position::new(0, 0)]);

        let b = board.vehicle("B").unwrap();
        assert_eq!((b.x, b.y, b.orientation, b.length), (4, 1, Orientation::Vertical, 2));
        assert_eq!(board.cell(0, 0), Some(Cell::Wall));
    }

    #[test]
    fn test_height_comes_before_width() {
        let board = parse_puzzle("4,7\nX,0,1,H,2\n").unwrap();
        assert_eq!(board.height(), 4);
        assert_eq!(board.width(), 7);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let board = parse_puzzle(" 6 , 6 \r\n X , 1 , 2 , H , 2 \r\n").unwrap();
        let x = board.vehicle("X").unwrap();
        assert_eq!((x.x, x.y), (1, 2));
    }

    #[test]
    fn test_malformed_records_fail_fast() {
        assert_eq!(parse_puzzle("").unwrap_err(), PuzzleError::MissingDimensions);
        assert_eq!(
            parse_puzzle("6\n").unwrap_err(),
            PuzzleError::FieldCount {
                line: 1,
                expected: "2",
                found: 1
            }
        );
        assert_eq!(
            parse_puzzle("6,6\nX,0,2,H\n").unwrap_err(),
            PuzzleError::FieldCount {
                line: 2,
                expected: "5 for a vehicle",
                found: 4
            }
        );
        assert_eq!(
            parse_puzzle("6,6\n#,1\n").unwrap_err(),
            PuzzleError::FieldCount {
                line: 2,
                expected: "3 for a wall",
                found: 2
            }
        );
        assert_eq!(
            parse_puzzle("6,6\nX,zero,2,H,2\n").unwrap_err(),
            PuzzleError::InvalidInteger {
                line: 2,
                field: "x",
                value: "zero".to_string()
            }
        );
        assert_eq!(
            parse_puzzle("6,6\nX,-1,2,H,2\n").unwrap_err(),
            PuzzleError::InvalidInteger {
                line: 2,
                field: "x",
                value: "-1".to_string()
            }
        );
        assert_eq!(
            parse_puzzle("6,6\nX,0,2,D,2\n").unwrap_err(),
            PuzzleError::UnknownOrientation {
                line: 2,
                code: "D".to_string()
            }
        );
        assert_eq!(
            parse_puzzle("6,6\nX,0,2,H,0\n").unwrap_err(),
            PuzzleError::ZeroLength {
                line: 2,
                id: "X".to_string()
            }
        );
    }

    #[test]
    fn test_invariants_checked_after_parse() {
        let err = parse_puzzle("6,6\nX,0,2,H,2\nA,1,0,V,3\n").unwrap_err();
        assert!(matches!(err, PuzzleError::Overlap { .. }));

        let err = parse_puzzle("6,6\n#,6,0\n").unwrap_err();
        assert_eq!(err, PuzzleError::WallOutOfBounds { x: 6, y: 0 });
    }

    #[test]
    fn test_oversized_board_is_rejected() {
        assert_eq!(
            parse_puzzle("4294967296,4294967296\n").unwrap_err(),
            PuzzleError::BoardTooLarge {
                height: 4294967296,
                width: 4294967296
            }
        );
        assert_eq!(
            parse_puzzle("100000,100000\n").unwrap_err(),
            PuzzleError::BoardTooLarge {
                height: 100000,
                width: 100000
            }
        );
    }

    #[test]
    fn test_huge_coordinates_are_out_of_bounds() {
        let max = usize::MAX;
        for record in [
            format!("X,{max},2,H,2"),
            format!("X,0,{max},H,2"),
            format!("A,3,{max},V,2"),
            format!("A,{max},0,V,2"),
            format!("X,1,2,H,{max}"),
            format!("A,3,1,V,{max}"),
        ] {
            let err = parse_puzzle(&format!("6,6\n{record}\n")).unwrap_err();
            assert!(
                matches!(err, PuzzleError::VehicleOutOfBounds { .. }),
                "{record}: {err:?}"
            );
        }
    }

    #[test]
    fn test_definition_text_reparses() {
        let board = parse_puzzle(SAMPLE).unwrap();
        let text = PuzzleDefinition::from_board(&board).to_text();

        assert_eq!(text, "6,6\nX,0,2,H,2\nB,4,1,V,2\n#,0,0\n");
        assert_eq!(parse_puzzle(&text).unwrap(), board);
    }
}
