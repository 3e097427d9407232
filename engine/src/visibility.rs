// ═══════════════════════════════════════════════════════════════════════
// Visibility / Information Model
//
//   PUBLIC  — phase, turn order, who sits on which tile, walls, bonus
//             values, factions, readiness
//   PRIVATE — a player's own reserve and the strength of their own units
//
// `view_for` projects the state for one viewer. It builds a fresh value
// and never touches the canonical state. Spectators (no viewer) and
// finished games see everything, final strengths included, so scores can
// be checked. A viewer id nobody registered sees no private data at all.
// ═══════════════════════════════════════════════════════════════════════

use crate::engine::Action;
use crate::scoring::{standings, Standing};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The snapshot a UI renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub viewer: Option<PlayerId>,
    pub phase: Phase,
    pub current_player: Option<PlayerId>,
    pub turn_order: Vec<PlayerId>,
    /// Join order. On the wire this is an object keyed by player id.
    #[serde(with = "players_by_id")]
    pub players: Vec<PlayerView>,
    /// `tiles[row][column]`.
    pub tiles: Vec<Vec<TileView>>,
    pub walls: BTreeMap<WallId, WallStatus>,
    pub bonus_tiles: Vec<BonusTile>,
    pub available_factions: Vec<Faction>,
    pub winner: Option<PlayerId>,
    /// Final standings, present once the game is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<Standing>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub faction: Option<Faction>,
    pub ready: bool,
    /// Only present for the viewer themself (or when nothing is hidden).
    #[serde(rename = "tokens", default, skip_serializing_if = "Option::is_none")]
    pub reserve: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TileView {
    Empty,
    Bonus {
        value: u32,
    },
    /// The owner is always public; the strength only to the owner.
    Occupied {
        #[serde(rename = "player")]
        owner: PlayerId,
        #[serde(rename = "value", default, skip_serializing_if = "Option::is_none")]
        strength: Option<u8>,
    },
}

/// `players` as a JSON object keyed by id, written and read back in join order.
mod players_by_id {
    use super::PlayerView;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(players: &[PlayerView], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(players.len()))?;
        for p in players {
            map.serialize_entry(&p.id, p)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PlayerView>, D::Error> {
        struct PlayersVisitor;

        impl<'de> Visitor<'de> for PlayersVisitor {
            type Value = Vec<PlayerView>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of player id to player")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut players = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((_, player)) = access.next_entry::<String, PlayerView>()? {
                    players.push(player);
                }
                Ok(players)
            }
        }

        deserializer.deserialize_map(PlayersVisitor)
    }
}

/// Build the view of `state` for `viewer`.
pub fn view_for(state: &GameState, viewer: Option<&PlayerId>) -> GameView {
    let redact = viewer.is_some() && !state.is_over();
    let can_see = |owner: &PlayerId| !redact || viewer == Some(owner);

    let players = state
        .players
        .iter()
        .map(|p| PlayerView {
            id: p.id.clone(),
            name: p.name.clone(),
            faction: p.faction,
            ready: p.ready,
            reserve: can_see(&p.id).then(|| p.reserve.clone()),
        })
        .collect();

    let tiles = state
        .board
        .rows()
        .map(|row| {
            row.iter()
                .map(|tile| match tile {
                    Tile::Empty => TileView::Empty,
                    Tile::Bonus { value } => TileView::Bonus { value: *value },
                    Tile::Occupied { owner, strength } => TileView::Occupied {
                        owner: owner.clone(),
                        strength: can_see(owner).then_some(*strength),
                    },
                })
                .collect()
        })
        .collect();

    GameView {
        viewer: viewer.cloned(),
        phase: state.phase,
        current_player: state.current_player.clone(),
        turn_order: state.turn_order.clone(),
        players,
        tiles,
        walls: state.board.walls().clone(),
        bonus_tiles: state.board.bonus_tiles().to_vec(),
        available_factions: state.available_factions(),
        winner: state.winner.clone(),
        scores: state.is_over().then(|| standings(state)),
    }
}

impl GameView {
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn tile(&self, at: Coord) -> Option<&TileView> {
        self.tiles.get(usize::from(at.row))?.get(usize::from(at.column))
    }

    pub fn is_turn_of_viewer(&self) -> bool {
        self.viewer.is_some() && self.viewer == self.current_player
    }

    pub fn empty_tiles(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tiles.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, t)| matches!(t, TileView::Empty))
                .map(move |(c, _)| Coord::new(r as u8, c as u8))
        })
    }

    pub fn open_walls(&self) -> impl Iterator<Item = WallId> + '_ {
        self.walls
            .iter()
            .filter(|(_, s)| **s == WallStatus::Open)
            .map(|(w, _)| *w)
    }

    /// Actions the current player can take that the engine would not ignore.
    /// Empty when the viewer is someone other than the current player.
    pub fn legal_actions(&self) -> Vec<Action> {
        let Some(actor) = &self.current_player else {
            return Vec::new();
        };
        if self.viewer.as_ref().is_some_and(|v| v != actor) {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.phase == Phase::AwaitingMove {
            let reserve = self.player(actor).and_then(|p| p.reserve.clone()).unwrap_or_default();
            for at in self.empty_tiles() {
                for (i, &count) in reserve.iter().enumerate() {
                    if count > 0 {
                        actions.push(Action::PlaceUnit { at, size: i as u8 + 1 });
                    }
                }
            }
        }
        if self.phase.in_play() {
            actions.extend(self.open_walls().map(Action::PlaceWall));
            actions.push(Action::EndTurn);
        }
        actions
    }
}
