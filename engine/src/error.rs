//! Engine errors and action outcomes.
//!
//! Two kinds of rejection exist. Structural faults and capacity violations
//! are `EngineError`s and leave the state untouched. Illegal moves that a
//! trusted UI would never offer are tolerated: the handler reports
//! `Outcome::Ignored` and the state is unchanged.

use crate::types::{PlayerId, WallStatus};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unable to join game: already {0} players")]
    SessionFull(usize),

    #[error("unable to join game: the game has already started")]
    GameInProgress,

    #[error("player '{0}' has already joined")]
    DuplicatePlayer(PlayerId),

    #[error("unknown player '{0}'")]
    UnknownPlayer(PlayerId),

    #[error("faction '{0}' does not exist")]
    UnknownFaction(String),

    #[error("faction '{faction}' is already taken by '{holder}'")]
    FactionTaken { faction: String, holder: PlayerId },

    #[error("tile ({row},{column}) is off the board")]
    InvalidTile { row: i64, column: i64 },

    #[error("unit size {0} is outside 1..=5")]
    InvalidUnitSize(u8),

    #[error("malformed wall id '{0}'")]
    MalformedWallId(String),

    #[error("wall '{0}' does not exist on this board")]
    UnknownWall(String),

    #[error("invalid board configuration: {0}")]
    InvalidConfig(String),

    #[error("the game is not over yet")]
    GameNotOver,

    #[error("malformed intent: {0}")]
    MalformedIntent(#[from] serde_json::Error),
}

/// Why a tolerated action changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// The action is not available in the current phase.
    WrongPhase,
    /// Target tile is a bonus tile or already occupied.
    TileNotEmpty,
    /// The current player holds no unit of that size.
    NoReserve { size: u8 },
    /// The wall is already placed or currently forbidden.
    WallUnavailable(WallStatus),
}

/// Result of a successfully validated action.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(Ignored),
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}
