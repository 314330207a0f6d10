// ═══════════════════════════════════════════════════════════════════════
// Episode Runner — drives one agent through one complete episode
// ═══════════════════════════════════════════════════════════════════════

use cavern_agents::Agent;
use cavern_engine::visibility::{agent_view, AgentView};
use cavern_engine::world::{Outcome, WorldState};
use cavern_engine::{Action, GridConfig};
use serde::Serialize;
use std::collections::BTreeSet;

/// Result of a completed episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeResult {
    pub seed: u64,
    pub agent_name: String,
    pub outcome: Outcome,
    pub score: i32,
    pub moves: u32,
    pub cells_visited: u32,
}

/// Run one full episode: generate the world from the seed, then loop
/// view → decide → apply until the episode ends. The move limit guards
/// against an agent that never terminates.
pub fn run_episode(
    agent: &mut dyn Agent,
    config: &GridConfig,
    seed: u64,
    max_moves: u32,
) -> Result<EpisodeResult, String> {
    run_episode_observed(agent, config, seed, max_moves, |_, _, _| {})
}

/// Same as `run_episode`, with a per-turn observer for tracing.
pub fn run_episode_observed(
    agent: &mut dyn Agent,
    config: &GridConfig,
    seed: u64,
    max_moves: u32,
    mut observer: impl FnMut(u32, &AgentView, Action),
) -> Result<EpisodeResult, String> {
    let mut state = WorldState::generate(*config, seed);
    let mut visited = BTreeSet::from([state.player_loc]);

    let outcome = loop {
        if let Some(outcome) = state.outcome {
            break outcome;
        }
        if state.moves.len() as u32 >= max_moves {
            return Err(format!(
                "episode exceeded {} moves without finishing (seed {})",
                max_moves, seed
            ));
        }
        let view = agent_view(&state);
        let action = agent.decide(&view);
        observer(state.moves.len() as u32, &view, action);
        state.apply(action);
        visited.insert(state.player_loc);
    };

    Ok(EpisodeResult {
        seed,
        agent_name: agent.name().to_string(),
        outcome,
        score: state.score(),
        moves: state.moves.len() as u32,
        cells_visited: visited.len() as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavern_agents::{HunterAgent, RandomAgent};
    use cavern_engine::world::Hazard;

    #[test]
    fn hunter_episodes_end_or_hit_the_safety_limit() {
        // A boxed-in agent far from home can only keep signalling "give
        // up", which the world ignores away from the start cell; such
        // episodes end via the move limit. Everything else must produce
        // a real outcome.
        let config = GridConfig::default();
        for seed in 0..40 {
            match run_episode(&mut HunterAgent::new(&config, seed), &config, seed, 500) {
                Ok(result) => {
                    match result.outcome {
                        Outcome::Escaped { .. } => assert!(result.score > -1000),
                        Outcome::Killed(Hazard::Pit | Hazard::Monster) => {}
                    }
                    assert!(result.moves <= 500);
                    assert!(result.cells_visited >= 1);
                }
                Err(e) => assert!(e.contains("exceeded"), "seed {seed}: {e}"),
            }
        }
    }

    #[test]
    fn hunter_is_reproducible_per_seed() {
        let config = GridConfig::default();
        let run = |seed: u64| {
            let mut agent = HunterAgent::new(&config, seed);
            run_episode(&mut agent, &config, seed, 500)
        };
        assert_eq!(run(17), run(17));
        assert_eq!(run(23), run(23));
    }

    #[test]
    fn reset_allows_reusing_one_agent_across_episodes() {
        let config = GridConfig::default();
        let mut agent = HunterAgent::new(&config, 3);
        let first = run_episode(&mut agent, &config, 3, 500);
        agent.reset();
        let second = run_episode(&mut agent, &config, 3, 500);
        assert_eq!(first, second);
    }

    #[test]
    fn random_agent_hits_the_move_limit_or_ends() {
        let config = GridConfig::default();
        let mut agent = RandomAgent::new(5);
        // either outcome is fine; the harness must not loop forever
        let _ = run_episode(&mut agent, &config, 5, 200);
    }

    #[test]
    fn works_on_larger_grids() {
        let config = GridConfig {
            size: 6,
            ..GridConfig::default()
        };
        let mut agent = HunterAgent::new(&config, 99);
        if let Ok(result) = run_episode(&mut agent, &config, 99, 2000) {
            assert!(result.moves <= 2000);
            assert!(result.cells_visited <= 36);
        }
    }
}
