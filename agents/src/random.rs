// ═══════════════════════════════════════════════════════════════════════
// Random Agent — wanders blindly.
// Serves as a baseline and for exercising simulator stability.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use cavern_engine::visibility::AgentView;
use cavern_engine::Action;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct RandomAgent {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "Random"
    }

    fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    fn decide(&mut self, view: &AgentView) -> Action {
        // Take the obvious wins, otherwise wander with a forward bias.
        if view.percept.treasure_here && !view.has_treasure {
            return Action::Grab;
        }
        if view.has_treasure && view.player_loc == view.start_loc {
            return Action::Climb;
        }
        const WANDER: [Action; 4] = [
            Action::Forward,
            Action::Forward,
            Action::TurnLeft,
            Action::TurnRight,
        ];
        *WANDER.choose(&mut self.rng).unwrap_or(&Action::Forward)
    }
}
