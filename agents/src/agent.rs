// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface that all agents must implement
//
// KEY DESIGN PRINCIPLE:
//   Agents receive an `AgentView` (not raw WorldState), which only
//   contains information the player is legally allowed to see.
//   This enforces information hiding at the type level.
// ═══════════════════════════════════════════════════════════════════════

use cavern_engine::visibility::AgentView;
use cavern_engine::Action;

/// One decision-maker driving one episode at a time.
///
/// Exactly one `decide` call happens per environment turn; the world
/// applies the returned action before the next call. Agents are `Send`
/// so the harness can run episodes on worker threads.
pub trait Agent: Send {
    /// Human-readable name for this agent (e.g., "Hunter", "Random").
    fn name(&self) -> &str;

    /// Choose one action for the current turn.
    ///
    /// Must always return a valid action, whatever state the agent's
    /// internal bookkeeping has reached.
    fn decide(&mut self, view: &AgentView) -> Action;

    /// Discard all per-episode state so the instance can start a fresh
    /// episode. Residual knowledge from a previous episode would corrupt
    /// inference.
    fn reset(&mut self);
}
