pub mod batch;
pub mod database;
pub mod runner;

pub use batch::{run_batch, summarize, BatchSummary};
pub use database::Database;
pub use runner::{run_episode, run_episode_observed, EpisodeResult};
