// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface that all automated players implement
//
// KEY DESIGN PRINCIPLE:
//   Agents receive a `GameView` built for their own player id, never the
//   raw GameState. The view already hides what the player may not see:
//     - Opponents' reserves
//     - The strength of opponents' units on the board
//   Owners of occupied tiles and every wall status stay public.
// ═══════════════════════════════════════════════════════════════════════

use crate::greedy::GreedyAgent;
use crate::random::RandomAgent;
use palisade_engine::engine::Action;
use palisade_engine::types::*;
use palisade_engine::visibility::GameView;
use std::fmt;
use std::str::FromStr;

/// Trait that all agents implement.
/// `decide` dispatches on the phase; agents override the per-phase methods.
pub trait Agent: Send {
    /// Human-readable name for this agent (e.g., "Random", "Greedy").
    fn name(&self) -> &str;

    /// The player this agent is seated as.
    fn player(&self) -> &PlayerId;

    /// Pick the next action for the current view. Only called when it is
    /// this agent's turn; anything else gets an `EndTurn`.
    fn decide(&mut self, view: &GameView) -> Action {
        if view.current_player.as_ref() != Some(self.player()) {
            return Action::EndTurn;
        }
        match view.phase {
            Phase::AwaitingMove => self.choose_move(view),
            Phase::WallJustPlaced => self.after_wall(view),
            Phase::Prologue | Phase::GameOver => Action::EndTurn,
        }
    }

    // ── Individual decision methods ────────────────────────────────────

    /// Start of a turn: place a unit, place a wall, or pass.
    fn choose_move(&mut self, view: &GameView) -> Action;

    /// One wall is down: place a second one or end the turn.
    fn after_wall(&mut self, _view: &GameView) -> Action {
        Action::EndTurn
    }
}

/// The agents the runner knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Random,
    Greedy,
}

impl AgentKind {
    pub fn build(self, player: PlayerId, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Random => Box::new(RandomAgent::new(player, seed)),
            AgentKind::Greedy => Box::new(GreedyAgent::new(player, seed)),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Random => write!(f, "random"),
            AgentKind::Greedy => write!(f, "greedy"),
        }
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(AgentKind::Random),
            "greedy" => Ok(AgentKind::Greedy),
            other => Err(format!("unknown agent '{other}' (expected random or greedy)")),
        }
    }
}
