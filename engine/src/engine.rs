// ═══════════════════════════════════════════════════════════════════════
// Game Engine — action handlers and the turn state machine
//
// Architecture:
//   The engine is a pure state machine. It never does I/O. A caller
//   (transport, session store, self-play runner) submits one action at a
//   time against a session's GameState and gets back an Outcome:
//
//     Prologue ──all ready (≥2)──▶ AwaitingMove ◀──────────────┐
//                                   │   │                     │
//                 unit / pass ──────┘   └── wall ──▶ WallJustPlaced
//                 (next player)                     │ wall / end turn
//                                                   └─(next player)
//
//   Every turn advance re-checks the end condition and may land in
//   GameOver, which is terminal.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{EngineError, Ignored, Outcome};
use crate::scoring;
use crate::territory::refresh_wall_legality;
use crate::types::*;
use crate::visibility::view_for;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything a caller can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Join { name: String, player: PlayerId },
    SetFaction { player: PlayerId, faction: Faction },
    SignalReady { player: PlayerId },
    /// Place a unit of `size` for the current player.
    PlaceUnit { at: Coord, size: u8 },
    PlaceWall(WallId),
    /// Pass (before any move this turn) or finish a turn after one wall.
    EndTurn,
}

pub fn apply_action(state: &mut GameState, action: Action) -> Result<Outcome, EngineError> {
    match action {
        Action::Join { name, player } => join(state, name, player),
        Action::SetFaction { player, faction } => set_faction(state, &player, faction),
        Action::SignalReady { player } => signal_ready(state, &player),
        Action::PlaceUnit { at, size } => place_unit(state, at, size),
        Action::PlaceWall(wall) => place_wall(state, wall),
        Action::EndTurn => end_turn(state),
    }
}

fn ignored(reason: Ignored) -> Result<Outcome, EngineError> {
    debug!(?reason, "action ignored");
    Ok(Outcome::Ignored(reason))
}

// ── Lobby ──────────────────────────────────────────────────────────────

pub fn join(state: &mut GameState, name: impl Into<String>, player: PlayerId) -> Result<Outcome, EngineError> {
    if state.players.len() >= MAX_PLAYERS {
        return Err(EngineError::SessionFull(MAX_PLAYERS));
    }
    if state.phase != Phase::Prologue {
        return Err(EngineError::GameInProgress);
    }
    if state.player(&player).is_some() {
        return Err(EngineError::DuplicatePlayer(player));
    }

    let name = name.into();
    info!(player = %player, %name, "player joined");
    state.turn_order.push(player.clone());
    state.players.push(Player::new(player, name));
    Ok(Outcome::Applied)
}

pub fn set_faction(state: &mut GameState, player: &PlayerId, faction: Faction) -> Result<Outcome, EngineError> {
    if state.player(player).is_none() {
        return Err(EngineError::UnknownPlayer(player.clone()));
    }
    if state.phase != Phase::Prologue {
        return ignored(Ignored::WrongPhase);
    }
    if let Some(holder) = state.players.iter().find(|p| p.faction == Some(faction) && &p.id != player) {
        return Err(EngineError::FactionTaken {
            faction: faction.to_string(),
            holder: holder.id.clone(),
        });
    }

    if let Some(p) = state.player_mut(player) {
        p.faction = Some(faction);
    }
    Ok(Outcome::Applied)
}

/// Mark a player ready. The game starts the moment every joined player
/// (at least two) is ready.
pub fn signal_ready(state: &mut GameState, player: &PlayerId) -> Result<Outcome, EngineError> {
    if state.player(player).is_none() {
        return Err(EngineError::UnknownPlayer(player.clone()));
    }
    if state.phase != Phase::Prologue {
        return ignored(Ignored::WrongPhase);
    }
    if let Some(p) = state.player_mut(player) {
        p.ready = true;
    }

    if state.players.len() >= MIN_PLAYERS && state.players.iter().all(|p| p.ready) {
        start_game(state);
    }
    Ok(Outcome::Applied)
}

fn start_game(state: &mut GameState) {
    let Some(reserve) = starting_reserve(state.players.len()) else {
        return;
    };
    for p in &mut state.players {
        p.reserve = reserve.to_vec();
    }
    state.phase = Phase::AwaitingMove;
    state.current_player = state.turn_order.first().cloned();
    info!(players = state.players.len(), "game started");
}

// ── Moves ──────────────────────────────────────────────────────────────

/// Place a unit of `size` for the current player on an empty tile.
pub fn place_unit(state: &mut GameState, at: Coord, size: u8) -> Result<Outcome, EngineError> {
    if !(1..=MAX_UNIT_SIZE).contains(&size) {
        return Err(EngineError::InvalidUnitSize(size));
    }
    let Some(tile) = state.board.tile(at) else {
        return Err(EngineError::InvalidTile { row: at.row.into(), column: at.column.into() });
    };
    if state.phase != Phase::AwaitingMove {
        return ignored(Ignored::WrongPhase);
    }
    if !tile.is_empty() {
        return ignored(Ignored::TileNotEmpty);
    }
    let Some(current) = state.current_player.clone() else {
        return ignored(Ignored::WrongPhase);
    };
    let Some(player) = state.player_mut(&current) else {
        return Err(EngineError::UnknownPlayer(current));
    };
    if player.reserve_of(size) == 0 {
        return ignored(Ignored::NoReserve { size });
    }

    player.reserve[usize::from(size - 1)] -= 1;
    state.board.set_tile(at, Tile::Occupied { owner: current, strength: size });
    advance_turn(state, false);
    Ok(Outcome::Applied)
}

/// Place an open wall. The first wall of a turn keeps the turn going;
/// the second one ends it. Every placement reclassifies all unplaced walls.
pub fn place_wall(state: &mut GameState, wall: WallId) -> Result<Outcome, EngineError> {
    let Some(status) = state.board.wall_status(wall) else {
        return Err(EngineError::UnknownWall(wall.to_string()));
    };
    if !state.phase.in_play() {
        return ignored(Ignored::WrongPhase);
    }
    if status != WallStatus::Open {
        return ignored(Ignored::WallUnavailable(status));
    }

    state.board.set_wall(wall, WallStatus::Placed);
    refresh_wall_legality(&mut state.board);

    if state.phase == Phase::WallJustPlaced {
        advance_turn(state, false);
    } else {
        state.phase = Phase::WallJustPlaced;
    }
    Ok(Outcome::Applied)
}

/// End the turn. Ending it without having moved is a pass: the player
/// leaves the turn order for the rest of the game.
pub fn end_turn(state: &mut GameState) -> Result<Outcome, EngineError> {
    match state.phase {
        Phase::AwaitingMove => {
            if let Some(player) = &state.current_player {
                info!(player = %player, "player passed");
            }
            advance_turn(state, true);
        }
        Phase::WallJustPlaced => advance_turn(state, false),
        Phase::Prologue | Phase::GameOver => return ignored(Ignored::WrongPhase),
    }
    Ok(Outcome::Applied)
}

/// Every action the current player could take right now without it being ignored.
pub fn legal_actions(state: &GameState) -> Vec<Action> {
    view_for(state, None).legal_actions()
}

// ── Turn advance ───────────────────────────────────────────────────────

fn advance_turn(state: &mut GameState, passed: bool) {
    let order = &mut state.turn_order;
    let index = state.current_player.as_ref().and_then(|c| order.iter().position(|p| p == c));

    let next = match index {
        Some(i) if passed => {
            order.remove(i);
            if order.is_empty() { None } else { Some(i % order.len()) }
        }
        Some(i) => Some((i + 1) % order.len()),
        None => (!order.is_empty()).then_some(0),
    };
    state.current_player = next.map(|i| state.turn_order[i].clone());

    if is_game_over(state) {
        finish_game(state);
    } else {
        state.phase = Phase::AwaitingMove;
    }
}

/// Over once everybody has passed, or once no empty tile and no open wall is left.
pub fn is_game_over(state: &GameState) -> bool {
    state.turn_order.is_empty() || (!state.board.has_empty_tile() && !state.board.has_open_wall())
}

fn finish_game(state: &mut GameState) {
    state.phase = Phase::GameOver;
    state.current_player = None;
    state.winner = scoring::determine_winner(state);
    info!(winner = ?state.winner, "game over");
}
