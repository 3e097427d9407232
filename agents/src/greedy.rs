// ═══════════════════════════════════════════════════════════════════════
// Greedy Agent — crowds the most valuable bonus tile with its strongest
// units. Never builds walls. Noticeably stronger than RandomAgent.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use palisade_engine::engine::Action;
use palisade_engine::types::*;
use palisade_engine::visibility::GameView;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct GreedyAgent {
    player: PlayerId,
    rng: ChaCha8Rng,
}

impl GreedyAgent {
    pub fn new(player: PlayerId, seed: u64) -> Self {
        GreedyAgent {
            player,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Largest unit size still in our reserve.
    fn strongest_unit(&self, view: &GameView) -> Option<u8> {
        let reserve = view.player(&self.player)?.reserve.as_ref()?;
        reserve
            .iter()
            .enumerate()
            .rev()
            .find(|(_, count)| **count > 0)
            .map(|(i, _)| i as u8 + 1)
    }

    /// Highest-value bonus tile; the first listed wins ties.
    fn best_bonus(&self, view: &GameView) -> Option<Coord> {
        view.bonus_tiles
            .iter()
            .fold(None::<&BonusTile>, |best, b| match best {
                Some(top) if top.value >= b.value => Some(top),
                _ => Some(b),
            })
            .map(|b| b.position)
    }

    /// Empty tiles closest to `target`.
    fn nearest_empty(&self, view: &GameView, target: Coord) -> Vec<Coord> {
        let empty: Vec<Coord> = view.empty_tiles().collect();
        let Some(best) = empty.iter().map(|c| c.manhattan(target)).min() else {
            return Vec::new();
        };
        empty.into_iter().filter(|c| c.manhattan(target) == best).collect()
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &str { "Greedy" }
    fn player(&self) -> &PlayerId { &self.player }

    fn choose_move(&mut self, view: &GameView) -> Action {
        let Some(size) = self.strongest_unit(view) else {
            return Action::EndTurn;
        };
        let candidates = match self.best_bonus(view) {
            Some(target) => self.nearest_empty(view, target),
            None => view.empty_tiles().collect(),
        };
        match candidates.choose(&mut self.rng) {
            Some(&at) => Action::PlaceUnit { at, size },
            None => Action::EndTurn,
        }
    }
}
