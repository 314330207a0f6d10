// ═══════════════════════════════════════════════════════════════════════
// Core types — cells, directions, actions, percepts
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

// ── Cell ───────────────────────────────────────────────────────────────
// Compact, copyable grid coordinate. Coordinates are 1-based: both axes
// run over [1, size]. Cells are never mutated, only classified.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub const fn new(x: u8, y: u8) -> Self {
        Cell { x, y }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Direction ──────────────────────────────────────────────────────────

/// Facing on the 4-direction compass, as a unit vector with North = (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn from_delta(dx: i8, dy: i8) -> Option<Direction> {
        match (dx, dy) {
            (0, 1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, -1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// 90° clockwise rotation: (dx, dy) → (dy, -dx).
    pub fn right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// 90° counterclockwise rotation.
    pub fn left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// The cell one step ahead, or None when that step leaves the grid.
    pub fn step(self, from: Cell, size: u8) -> Option<Cell> {
        let (dx, dy) = self.delta();
        let x = from.x as i16 + dx as i16;
        let y = from.y as i16 + dy as i16;
        if x < 1 || y < 1 || x > size as i16 || y > size as i16 {
            None
        } else {
            Some(Cell::new(x as u8, y as u8))
        }
    }
}

// ── Action ─────────────────────────────────────────────────────────────

/// The six primitive actions the player may submit each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Forward,
    TurnLeft,
    TurnRight,
    Grab,
    Climb,
    Shoot,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Forward => write!(f, "forward"),
            Action::TurnLeft => write!(f, "left"),
            Action::TurnRight => write!(f, "right"),
            Action::Grab => write!(f, "grab"),
            Action::Climb => write!(f, "climb"),
            Action::Shoot => write!(f, "shoot"),
        }
    }
}

// ── Percept ────────────────────────────────────────────────────────────

/// The five sensory indicators produced for the player's current cell.
///
/// The first three describe persistent properties of the surroundings;
/// `bumped` and `monster_killed` are event flags valid only for the turn
/// on which they occur.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percept {
    /// The monster occupies an adjacent cell.
    pub monster_nearby: bool,
    /// At least one pit lies in an adjacent cell.
    pub pit_nearby: bool,
    /// The treasure sits in this cell.
    pub treasure_here: bool,
    /// The last forward move hit a wall.
    pub bumped: bool,
    /// The monster was killed last turn.
    pub monster_killed: bool,
}

impl Percept {
    /// Either hazard indicator is present.
    pub fn hazard_nearby(&self) -> bool {
        self.monster_nearby || self.pit_nearby
    }
}

// ── Grid configuration ─────────────────────────────────────────────────

/// World parameters. Grid size and start cell are configuration, never
/// hardcoded, so everything stays testable on non-default grids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridConfig {
    /// Side length of the square grid.
    pub size: u8,
    /// The player spawns here and must return here to climb out.
    pub start: Cell,
    /// Probability that any given non-start cell contains a pit.
    pub pit_chance: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            size: 4,
            start: Cell::new(1, 1),
            pit_chance: 0.2,
        }
    }
}
