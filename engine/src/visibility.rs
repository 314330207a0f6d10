// ═══════════════════════════════════════════════════════════════════════
// Visibility / Information Model
//
// The player cannot see hazard placement — only the per-cell indicators.
// This module produces the view of the world the agent is legally
// allowed to know. Agents MUST only receive AgentView, never the raw
// WorldState, which enforces information hiding at the type level.
//
// The agent never gets to see:
//   • The monster's cell (only the nearby indicator)
//   • Pit locations (only the nearby indicator)
//   • The treasure's cell (only the on-cell indicator)
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{Cell, Direction, Percept};
use crate::world::WorldState;
use serde::{Deserialize, Serialize};

/// Everything an agent may consult when choosing its next action.
///
/// A plain constructible struct, so tests can fabricate arbitrary
/// situations without running the simulator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgentView {
    /// The five-indicator snapshot for the current cell.
    pub percept: Percept,
    pub player_loc: Cell,
    pub start_loc: Cell,
    pub facing: Direction,
    pub has_treasure: bool,
    /// Remaining ranged-attack charges.
    pub arrows: u8,
    /// Number of actions taken so far; 0 means this is the first turn.
    pub moves_made: u32,
    pub grid_size: u8,
}

/// Build the agent's view of the current world state.
pub fn agent_view(state: &WorldState) -> AgentView {
    AgentView {
        percept: state.percept(),
        player_loc: state.player_loc,
        start_loc: state.config.start,
        facing: state.facing,
        has_treasure: state.has_treasure,
        arrows: state.arrows,
        moves_made: state.moves.len() as u32,
        grid_size: state.config.size,
    }
}
