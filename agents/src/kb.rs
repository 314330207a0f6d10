// ═══════════════════════════════════════════════════════════════════════
// Knowledge Base — logical deduction over accumulated percepts
//
// All inference is set-based: cells move between "confirmed safe" and
// the per-hazard possibility sets as evidence accumulates. There is no
// numeric likelihood anywhere. Contradictory evidence can only empty a
// possibility set, which downstream rules treat as "no constraint";
// nothing here ever fails.
// ═══════════════════════════════════════════════════════════════════════

use cavern_engine::grid::{all_cells, neighbors};
use cavern_engine::types::{Cell, Percept};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Episode-scoped knowledge accumulated from percepts.
///
/// `safe` only ever grows and always contains the start cell. The
/// possibility sets only shrink, apart from the documented seeding and
/// global-replacement steps. Ordered collections keep iteration (and
/// therefore planning tie-breaks) deterministic under a fixed seed.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeBase {
    size: u8,
    start: Cell,
    /// Percept recorded per visited cell. Append-only.
    pub observed: BTreeMap<Cell, Percept>,
    /// Cells proven free of both hazards.
    pub safe: BTreeSet<Cell>,
    /// Cells not yet ruled out as the monster's location.
    pub possible_monster: BTreeSet<Cell>,
    /// Cells not yet ruled out as pit locations.
    pub possible_pit: BTreeSet<Cell>,
    /// Cells that may still hold the treasure.
    pub possible_treasure: BTreeSet<Cell>,
    pub monster_alive: bool,
}

impl KnowledgeBase {
    pub fn new(size: u8, start: Cell) -> Self {
        KnowledgeBase {
            size,
            start,
            observed: BTreeMap::new(),
            safe: BTreeSet::from([start]),
            possible_monster: BTreeSet::new(),
            possible_pit: BTreeSet::new(),
            possible_treasure: all_cells(size),
            monster_alive: true,
        }
    }

    pub fn grid_size(&self) -> u8 {
        self.size
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn visited(&self, cell: Cell) -> bool {
        self.observed.contains_key(&cell)
    }

    /// Confirmed-safe cells that have never been stood on.
    pub fn unvisited_safe(&self) -> BTreeSet<Cell> {
        self.safe
            .iter()
            .filter(|c| !self.observed.contains_key(c))
            .copied()
            .collect()
    }

    /// Fold every remaining monster candidate into the safe set. Only
    /// meaningful once the monster is confirmed dead.
    pub fn absorb_monster_cells(&mut self) {
        let freed = std::mem::take(&mut self.possible_monster);
        self.safe.extend(freed);
    }

    /// One constraint-propagation pass for the latest percept. Runs once
    /// per turn; step order matters because later steps consume sets
    /// narrowed by earlier ones.
    pub fn update(&mut self, current: Cell, percept: Percept) {
        self.observed.insert(current, percept);

        // Kill confirmation: the threat is gone, every remaining
        // candidate cell becomes safe.
        if percept.monster_killed {
            self.monster_alive = false;
            self.absorb_monster_cells();
        }

        let adjacent = neighbors(current, self.size);

        // No hazard indicator at all: every neighbor is safe.
        if !percept.hazard_nearby() {
            self.safe.extend(adjacent.iter().copied());
            for cell in &adjacent {
                self.possible_monster.remove(cell);
                self.possible_pit.remove(cell);
            }
        }

        // Monster indicator. First evidence seeds the candidate set with
        // the unvisited neighbors; later evidence intersects, since the
        // single monster must be adjacent to every cell that smelled it.
        if percept.monster_nearby && self.monster_alive {
            if self.possible_monster.is_empty() {
                self.possible_monster.extend(self.unvisited_of(&adjacent));
            } else {
                self.possible_monster = self
                    .possible_monster
                    .intersection(&adjacent)
                    .copied()
                    .collect();
            }
        } else if !percept.monster_nearby {
            for cell in &adjacent {
                self.possible_monster.remove(cell);
            }
        }

        // Pit indicator. Always union: multiple pits may coexist, so a
        // new draft never narrows the candidates of an older one.
        if percept.pit_nearby {
            let unvisited = self.unvisited_of(&adjacent);
            self.possible_pit.extend(unvisited);
        } else {
            for cell in &adjacent {
                self.possible_pit.remove(cell);
            }
        }

        self.rederive_pits();
        if self.monster_alive {
            self.rederive_monster();
        }

        // Safety back-fill: neighbors absent from both possibility sets
        // are safe, and a non-empty possibility set clears the neighbors
        // it does not contain.
        for cell in &adjacent {
            if !self.possible_monster.contains(cell) && !self.possible_pit.contains(cell) {
                self.safe.insert(*cell);
            }
        }
        if !self.possible_pit.is_empty() {
            for cell in adjacent.difference(&self.possible_pit) {
                if !self.possible_monster.contains(cell) {
                    self.safe.insert(*cell);
                }
            }
        }
        if !self.possible_monster.is_empty() && self.monster_alive {
            for cell in adjacent.difference(&self.possible_monster) {
                if !self.possible_pit.contains(cell) {
                    self.safe.insert(*cell);
                }
            }
        }

        // Treasure tracking: a positive indicator pins it to this cell,
        // a negative one rules this cell out.
        if percept.treasure_here {
            self.possible_treasure = BTreeSet::from([current]);
        } else {
            self.possible_treasure.remove(&current);
        }
    }

    fn unvisited_of(&self, cells: &BTreeSet<Cell>) -> BTreeSet<Cell> {
        cells
            .iter()
            .filter(|c| !self.observed.contains_key(c))
            .copied()
            .collect()
    }

    /// Re-derive pit candidates from all evidence collected so far: a
    /// candidate must be unobserved, adjacent to at least one positive
    /// indicator cell, and adjacent to no negative one. When a positive
    /// cell is left with exactly one consistent candidate, that candidate
    /// is the pit explaining it and its sibling neighbors are safe.
    fn rederive_pits(&mut self) {
        let drafts: Vec<Cell> = self
            .observed
            .iter()
            .filter(|(_, p)| p.pit_nearby)
            .map(|(c, _)| *c)
            .collect();
        if drafts.is_empty() {
            return;
        }
        let calm: Vec<Cell> = self
            .observed
            .iter()
            .filter(|(_, p)| !p.pit_nearby)
            .map(|(c, _)| *c)
            .collect();

        let mut consistent = BTreeSet::new();
        for candidate in all_cells(self.size) {
            if self.observed.contains_key(&candidate) {
                continue;
            }
            let near_calm = calm
                .iter()
                .any(|c| neighbors(*c, self.size).contains(&candidate));
            if near_calm {
                continue;
            }
            let near_draft = drafts
                .iter()
                .any(|d| neighbors(*d, self.size).contains(&candidate));
            if near_draft {
                consistent.insert(candidate);
            }
        }
        if !consistent.is_empty() {
            self.possible_pit = self.possible_pit.intersection(&consistent).copied().collect();
        }

        // Single-candidate closure per positive indicator cell.
        for draft in &drafts {
            let adjacent = neighbors(*draft, self.size);
            let candidates: Vec<Cell> = adjacent
                .iter()
                .filter(|c| !self.observed.contains_key(c) && self.possible_pit.contains(c))
                .copied()
                .collect();
            if let [pit] = candidates[..] {
                for cell in &adjacent {
                    if *cell != pit && !self.observed.contains_key(cell) {
                        self.safe.insert(*cell);
                    }
                }
            }
        }
    }

    /// Re-derive the monster candidate set by global consistency: keep
    /// the unobserved cells adjacent to every positive indicator cell
    /// and to no negative one. A non-empty result replaces the old set
    /// outright, which can only tighten it.
    fn rederive_monster(&mut self) {
        let scented: Vec<Cell> = self
            .observed
            .iter()
            .filter(|(_, p)| p.monster_nearby)
            .map(|(c, _)| *c)
            .collect();
        if scented.is_empty() {
            return;
        }
        let calm: Vec<Cell> = self
            .observed
            .iter()
            .filter(|(_, p)| !p.monster_nearby)
            .map(|(c, _)| *c)
            .collect();

        let mut consistent = BTreeSet::new();
        for candidate in all_cells(self.size) {
            if self.observed.contains_key(&candidate) {
                continue;
            }
            let fits_all_scents = scented
                .iter()
                .all(|s| neighbors(*s, self.size).contains(&candidate));
            if !fits_all_scents {
                continue;
            }
            let near_calm = calm
                .iter()
                .any(|c| neighbors(*c, self.size).contains(&candidate));
            if near_calm {
                continue;
            }
            if self.possible_monster.is_empty() || self.possible_monster.contains(&candidate) {
                consistent.insert(candidate);
            }
        }
        if !consistent.is_empty() {
            self.possible_monster = consistent;
        }
    }
}
