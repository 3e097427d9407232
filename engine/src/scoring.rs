// ═══════════════════════════════════════════════════════════════════════
// Scoring — bonus tiles go to whoever dominates their territory
// ═══════════════════════════════════════════════════════════════════════

use crate::territory::territory_from;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Final score of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player: PlayerId,
    pub name: String,
    pub score: u32,
}

/// Players tied for the largest total strength in the territory holding
/// `at`, in join order. Empty when nobody has a unit there.
pub fn bonus_winners(state: &GameState, at: Coord) -> Vec<PlayerId> {
    let board = &state.board;
    let mut strength: HashMap<&PlayerId, u32> = HashMap::new();
    for coord in territory_from(board, at, None, None) {
        if let Some(Tile::Occupied { owner, strength: s }) = board.tile(coord) {
            *strength.entry(owner).or_insert(0) += u32::from(*s);
        }
    }

    let Some(&max) = strength.values().max() else {
        return Vec::new();
    };

    state
        .players
        .iter()
        .filter(|p| strength.get(&p.id) == Some(&max))
        .map(|p| p.id.clone())
        .collect()
}

/// Points credited per player. A bonus tile's value is split evenly
/// (floor division) between its winners; the remainder is dropped.
/// Only players credited with something appear.
pub fn player_scores(state: &GameState) -> HashMap<PlayerId, u32> {
    let mut scores = HashMap::new();
    for bonus in state.board.bonus_tiles() {
        let winners = bonus_winners(state, bonus.position);
        if winners.is_empty() {
            continue;
        }
        let share = bonus.value / winners.len() as u32;
        for player in winners {
            *scores.entry(player).or_insert(0) += share;
        }
    }
    scores
}

/// Every player in join order with their score, zero included.
pub fn standings(state: &GameState) -> Vec<Standing> {
    let scores = player_scores(state);
    state
        .players
        .iter()
        .map(|p| Standing {
            player: p.id.clone(),
            name: p.name.clone(),
            score: scores.get(&p.id).copied().unwrap_or(0),
        })
        .collect()
}

/// Highest scorer. Ties go to the earliest joiner; nobody wins if nobody scored.
pub fn determine_winner(state: &GameState) -> Option<PlayerId> {
    let mut best: Option<(&PlayerId, u32)> = None;
    let scores = player_scores(state);
    for p in &state.players {
        let score = scores.get(&p.id).copied().unwrap_or(0);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((&p.id, score));
        }
    }
    best.map(|(id, _)| id.clone())
}
