pub mod grid;
pub mod types;
pub mod visibility;
pub mod world;

pub use types::*;
pub use visibility::{agent_view, AgentView};
pub use world::{Hazard, Outcome, WorldState};
