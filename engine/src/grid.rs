// ═══════════════════════════════════════════════════════════════════════
// Spatial utilities — pure functions over the bounded square grid
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{Cell, Direction};
use std::collections::BTreeSet;

/// Manhattan distance between two cells.
pub fn distance(a: Cell, b: Cell) -> u32 {
    let dx = (a.x as i16 - b.x as i16).unsigned_abs() as u32;
    let dy = (a.y as i16 - b.y as i16).unsigned_abs() as u32;
    dx + dy
}

/// The up-to-4 grid-adjacent cells, clipped to [1, size] on both axes.
/// A BTreeSet keeps all downstream set arithmetic deterministic, which
/// matters for seed-reproducible episodes.
pub fn neighbors(cell: Cell, size: u8) -> BTreeSet<Cell> {
    Direction::ALL
        .iter()
        .filter_map(|d| d.step(cell, size))
        .collect()
}

/// Every cell of the size×size grid.
pub fn all_cells(size: u8) -> BTreeSet<Cell> {
    let mut cells = BTreeSet::new();
    for x in 1..=size {
        for y in 1..=size {
            cells.insert(Cell::new(x, y));
        }
    }
    cells
}
