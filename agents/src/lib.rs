pub mod agent;
pub mod hunter;
pub mod kb;
pub mod pathfind;
pub mod random;

pub use agent::Agent;
pub use hunter::HunterAgent;
pub use kb::KnowledgeBase;
pub use random::RandomAgent;
