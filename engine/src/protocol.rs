//! Wire intents.
//!
//! The UI sends small JSON messages of the form
//! `{"type": "select-tile", "value": {"row": 0, "column": 3, "size": 2}}`.
//! They are decoded here, validated against the board and turned into
//! engine `Action`s.

use crate::board::Board;
use crate::engine::{apply_action, Action};
use crate::error::{EngineError, Outcome};
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Intent {
    #[serde(rename_all = "camelCase")]
    JoinGame { username: String, player_id: String },
    #[serde(rename_all = "camelCase")]
    SetRace { player_id: String, race: String },
    #[serde(rename_all = "camelCase")]
    SignalReady { player_id: String },
    SelectTile { row: i64, column: i64, size: u8 },
    #[serde(rename_all = "camelCase")]
    PlacePalisade { palisade_id: String },
    EndTurn,
}

impl Intent {
    /// Validate raw client input and turn it into an engine action.
    pub fn into_action(self, board: &Board) -> Result<Action, EngineError> {
        let action = match self {
            Intent::JoinGame { username, player_id } => Action::Join {
                name: username,
                player: PlayerId(player_id),
            },
            Intent::SetRace { player_id, race } => Action::SetFaction {
                player: PlayerId(player_id),
                faction: race.parse()?,
            },
            Intent::SignalReady { player_id } => Action::SignalReady { player: PlayerId(player_id) },
            Intent::SelectTile { row, column, size } => Action::PlaceUnit {
                at: board.checked_coord(row, column)?,
                size,
            },
            Intent::PlacePalisade { palisade_id } => Action::PlaceWall(palisade_id.parse()?),
            Intent::EndTurn => Action::EndTurn,
        };
        Ok(action)
    }
}

pub fn decode_intent(json: &str) -> Result<Intent, EngineError> {
    Ok(serde_json::from_str(json)?)
}

/// Apply an already-decoded intent.
pub fn apply_intent(state: &mut GameState, intent: Intent) -> Result<Outcome, EngineError> {
    let action = intent.into_action(&state.board)?;
    apply_action(state, action)
}
