// ═══════════════════════════════════════════════════════════════════════
// World simulator — owns the grid, hazard placement, percept generation
// and action resolution.
//
// Architecture:
//   The world is a pure state machine. It never does I/O or calls agents.
//   The runner/harness code reads the percept through the visibility
//   layer, asks the agent, and feeds the answer back via `apply()`.
//
// Flow:
//   1. Runner builds an AgentView from the current state
//   2. Agent picks one of the six actions
//   3. Runner calls `apply(action)`; the episode ends when `outcome` is set
// ═══════════════════════════════════════════════════════════════════════

use crate::grid::neighbors;
use crate::types::{Action, Cell, Direction, GridConfig, Percept};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The player starts with a single ranged-attack charge.
pub const STARTING_ARROWS: u8 = 1;

/// The two stationary hazard kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hazard {
    Pit,
    Monster,
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Escaped { with_treasure: bool },
    Killed(Hazard),
}

/// Complete simulator state for one episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub config: GridConfig,
    pub player_loc: Cell,
    pub facing: Direction,
    pub has_treasure: bool,
    pub arrows: u8,
    pub monster_loc: Cell,
    pub monster_alive: bool,
    pub pits: BTreeSet<Cell>,
    /// None once grabbed.
    pub treasure_loc: Option<Cell>,
    /// Every action taken so far, in order.
    pub moves: Vec<Action>,
    pub outcome: Option<Outcome>,
    /// Event flags for the current turn only.
    pub bumped: bool,
    pub monster_killed_this_turn: bool,
}

impl WorldState {
    /// Generate a world from a seed. Same seed + config ⇒ same world.
    ///
    /// The monster and the treasure each occupy a uniformly chosen
    /// non-start cell; every other non-start cell holds a pit with
    /// `config.pit_chance`. Hazards never share a cell with the treasure,
    /// and nothing is placed on the start cell.
    pub fn generate(config: GridConfig, seed: u64) -> WorldState {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let open: Vec<Cell> = crate::grid::all_cells(config.size)
            .into_iter()
            .filter(|&c| c != config.start)
            .collect();

        let monster_loc = *open.choose(&mut rng).expect("grid too small");
        let treasure_loc = loop {
            let c = *open.choose(&mut rng).expect("grid too small");
            if c != monster_loc {
                break c;
            }
        };

        let mut pits = BTreeSet::new();
        for &c in &open {
            if c != monster_loc && c != treasure_loc && rng.gen_bool(config.pit_chance) {
                pits.insert(c);
            }
        }

        WorldState {
            config,
            player_loc: config.start,
            facing: Direction::East,
            has_treasure: false,
            arrows: STARTING_ARROWS,
            monster_loc,
            monster_alive: true,
            pits,
            treasure_loc: Some(treasure_loc),
            moves: Vec::new(),
            outcome: None,
            bumped: false,
            monster_killed_this_turn: false,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// The sensory snapshot for the player's current cell.
    pub fn percept(&self) -> Percept {
        let adjacent = neighbors(self.player_loc, self.config.size);
        Percept {
            monster_nearby: adjacent.contains(&self.monster_loc),
            pit_nearby: adjacent.iter().any(|c| self.pits.contains(c)),
            treasure_here: self.treasure_loc == Some(self.player_loc),
            bumped: self.bumped,
            monster_killed: self.monster_killed_this_turn,
        }
    }

    /// Resolve one action. No-op once the episode has ended.
    pub fn apply(&mut self, action: Action) {
        if self.is_over() {
            return;
        }
        // Event flags from the previous turn expire now.
        self.bumped = false;
        self.monster_killed_this_turn = false;
        self.moves.push(action);

        match action {
            Action::Forward => match self.facing.step(self.player_loc, self.config.size) {
                Some(next) => {
                    self.player_loc = next;
                    if self.pits.contains(&next) {
                        self.outcome = Some(Outcome::Killed(Hazard::Pit));
                    } else if self.monster_alive && next == self.monster_loc {
                        self.outcome = Some(Outcome::Killed(Hazard::Monster));
                    }
                }
                None => self.bumped = true,
            },
            Action::TurnLeft => self.facing = self.facing.left(),
            Action::TurnRight => self.facing = self.facing.right(),
            Action::Grab => {
                if self.treasure_loc == Some(self.player_loc) {
                    self.treasure_loc = None;
                    self.has_treasure = true;
                }
            }
            Action::Shoot => {
                if self.arrows > 0 {
                    self.arrows -= 1;
                    if self.monster_alive && self.monster_in_line_of_fire() {
                        self.monster_alive = false;
                        self.monster_killed_this_turn = true;
                    }
                }
            }
            Action::Climb => {
                if self.player_loc == self.config.start {
                    self.outcome = Some(Outcome::Escaped {
                        with_treasure: self.has_treasure,
                    });
                }
            }
        }
    }

    /// The arrow flies in a straight line until it leaves the grid.
    fn monster_in_line_of_fire(&self) -> bool {
        let mut cell = self.player_loc;
        while let Some(next) = self.facing.step(cell, self.config.size) {
            if next == self.monster_loc {
                return true;
            }
            cell = next;
        }
        false
    }

    /// Conventional scoring: +1000 for escaping with the treasure, −1000
    /// for dying, −1 per action, −10 for spending the arrow.
    pub fn score(&self) -> i32 {
        let mut score = -(self.moves.len() as i32);
        score -= (STARTING_ARROWS - self.arrows) as i32 * 10;
        match self.outcome {
            Some(Outcome::Escaped { with_treasure: true }) => score += 1000,
            Some(Outcome::Killed(_)) => score -= 1000,
            _ => {}
        }
        score
    }
}
