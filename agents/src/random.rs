// ═══════════════════════════════════════════════════════════════════════
// Random Agent — picks uniformly among the moves the engine would accept.
// Serves as baseline and for testing engine stability.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use palisade_engine::engine::Action;
use palisade_engine::types::*;
use palisade_engine::visibility::GameView;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Chance of passing voluntarily while other moves remain.
const PASS_PROBABILITY: f64 = 0.02;

pub struct RandomAgent {
    player: PlayerId,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(player: PlayerId, seed: u64) -> Self {
        RandomAgent {
            player,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn pick(&mut self, view: &GameView) -> Action {
        let actions: Vec<Action> = view
            .legal_actions()
            .into_iter()
            .filter(|a| *a != Action::EndTurn)
            .collect();
        if self.rng.gen_bool(PASS_PROBABILITY) {
            return Action::EndTurn;
        }
        actions.choose(&mut self.rng).cloned().unwrap_or(Action::EndTurn)
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }
    fn player(&self) -> &PlayerId { &self.player }

    fn choose_move(&mut self, view: &GameView) -> Action {
        self.pick(view)
    }

    fn after_wall(&mut self, view: &GameView) -> Action {
        self.pick(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palisade_engine::engine::{apply_action, join, signal_ready};
    use palisade_engine::setup::{create_initial_state, GameConfig};
    use palisade_engine::visibility::view_for;

    fn started() -> GameState {
        let mut state = create_initial_state(&GameConfig::default()).unwrap();
        for id in ["a", "b"] {
            assert!(join(&mut state, id, PlayerId::from(id)).unwrap().is_applied());
        }
        for id in ["a", "b"] {
            assert!(signal_ready(&mut state, &PlayerId::from(id)).unwrap().is_applied());
        }
        state
    }

    #[test]
    fn test_random_moves_are_accepted() {
        let mut state = started();
        let mut agents = [
            RandomAgent::new(PlayerId::from("a"), 1),
            RandomAgent::new(PlayerId::from("b"), 2),
        ];
        for _ in 0..50 {
            let Some(current) = state.current_player.clone() else { break };
            let agent = agents.iter_mut().find(|a| a.player() == &current).unwrap();
            let action = agent.decide(&view_for(&state, Some(&current)));
            assert!(apply_action(&mut state, action).unwrap().is_applied());
        }
    }

    #[test]
    fn test_same_seed_same_choice() {
        let state = started();
        let view = view_for(&state, Some(&PlayerId::from("a")));
        let mut first = RandomAgent::new(PlayerId::from("a"), 7);
        let mut second = RandomAgent::new(PlayerId::from("a"), 7);
        assert_eq!(first.decide(&view), second.decide(&view));
    }

    #[test]
    fn test_not_my_turn_ends_turn() {
        let state = started();
        let mut agent = RandomAgent::new(PlayerId::from("b"), 3);
        assert_eq!(agent.decide(&view_for(&state, Some(&PlayerId::from("b")))), Action::EndTurn);
    }
}
