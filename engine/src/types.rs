// ═══════════════════════════════════════════════════════════════════════
// Core types — identities, tiles, walls, players and the game state
// ═══════════════════════════════════════════════════════════════════════

use crate::board::Board;
use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ── Limits ─────────────────────────────────────────────────────────────

pub const MAX_PLAYERS: usize = 4;
pub const MIN_PLAYERS: usize = 2;

/// Largest unit strength a player can place.
pub const MAX_UNIT_SIZE: u8 = 5;

/// Starting reserve by player count. Index `i` holds the number of units of size `i + 1`.
pub fn starting_reserve(player_count: usize) -> Option<&'static [u8]> {
    match player_count {
        2 => Some(&[11, 2, 1, 1, 1]),
        3 => Some(&[7, 2, 1, 1]),
        4 => Some(&[5, 1, 1, 1]),
        _ => None,
    }
}

// ── Player identity ────────────────────────────────────────────────────

/// Stable identity of a player, assigned by the caller at join time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId(id.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Factions ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Mage,
    Elf,
    Orc,
    Goblin,
}

impl Faction {
    pub const ALL: [Faction; 4] = [Faction::Mage, Faction::Elf, Faction::Orc, Faction::Goblin];
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Mage => write!(f, "mage"),
            Faction::Elf => write!(f, "elf"),
            Faction::Orc => write!(f, "orc"),
            Faction::Goblin => write!(f, "goblin"),
        }
    }
}

impl FromStr for Faction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Faction::ALL
            .into_iter()
            .find(|f| f.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| EngineError::UnknownFaction(s.to_string()))
    }
}

// ── Coordinates ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub column: u8,
}

impl Coord {
    pub const fn new(row: u8, column: u8) -> Self {
        Coord { row, column }
    }

    pub fn manhattan(self, other: Coord) -> u32 {
        u32::from(self.row.abs_diff(other.row)) + u32::from(self.column.abs_diff(other.column))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}

// ── Tiles ──────────────────────────────────────────────────────────────

/// Contents of a single board cell. `Empty` becomes `Occupied` at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Tile {
    Empty,
    Bonus { value: u32 },
    Occupied { owner: PlayerId, strength: u8 },
}

impl Tile {
    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }

    pub fn owner(&self) -> Option<&PlayerId> {
        match self {
            Tile::Occupied { owner, .. } => Some(owner),
            _ => None,
        }
    }
}

/// A pre-placed bonus tile and its point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTile {
    pub position: Coord,
    pub value: u32,
}

// ── Walls ──────────────────────────────────────────────────────────────
// A wall is named by the two linear tile indices it separates, smaller
// index first. `WallId::between(a, b)` and `WallId::between(b, a)` are the
// same wall. On the wire it is the string "a-b".

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallId {
    low: u16,
    high: u16,
}

impl WallId {
    /// Canonical id for the wall between two tile indices. Adjacency is the
    /// board's business; see `Board::wall_between`.
    pub fn between(a: u16, b: u16) -> Self {
        WallId { low: a.min(b), high: a.max(b) }
    }

    /// The two tile indices, ascending.
    pub fn tiles(self) -> (u16, u16) {
        (self.low, self.high)
    }
}

impl fmt::Display for WallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl FromStr for WallId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EngineError::MalformedWallId(s.to_string());
        let (a, b) = s.split_once('-').ok_or_else(malformed)?;
        let a: u16 = a.trim().parse().map_err(|_| malformed())?;
        let b: u16 = b.trim().parse().map_err(|_| malformed())?;
        if a == b {
            return Err(malformed());
        }
        Ok(WallId::between(a, b))
    }
}

impl Serialize for WallId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Wall status. Serialized as the integer codes the UI understands:
/// open = 0, placed = 1, forbidden = -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallStatus {
    Open,
    Placed,
    /// Not placed, but placing it now would leave a territory under the minimum size.
    Forbidden,
}

impl WallStatus {
    pub fn code(self) -> i8 {
        match self {
            WallStatus::Open => 0,
            WallStatus::Placed => 1,
            WallStatus::Forbidden => -1,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(WallStatus::Open),
            1 => Some(WallStatus::Placed),
            -1 => Some(WallStatus::Forbidden),
            _ => None,
        }
    }
}

impl Serialize for WallStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

impl<'de> Deserialize<'de> for WallStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i8::deserialize(deserializer)?;
        WallStatus::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid wall status code {code}")))
    }
}

// ── Phase ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Lobby: players join, pick factions and ready up.
    Prologue,
    /// The current player may place a unit, place a wall, or pass.
    AwaitingMove,
    /// The current player placed one wall; a second wall or end-turn follows.
    WallJustPlaced,
    GameOver,
}

impl Phase {
    pub fn in_play(self) -> bool {
        matches!(self, Phase::AwaitingMove | Phase::WallJustPlaced)
    }
}

// ── Player ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub faction: Option<Faction>,
    /// Unplaced units: `reserve[size - 1]` units of each size. Empty until the game starts.
    pub reserve: Vec<u8>,
    pub ready: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            faction: None,
            reserve: Vec::new(),
            ready: false,
        }
    }

    /// Units of the given size still in reserve. Sizes with no slot count as zero.
    pub fn reserve_of(&self, size: u8) -> u8 {
        size.checked_sub(1)
            .and_then(|i| self.reserve.get(usize::from(i)))
            .copied()
            .unwrap_or(0)
    }

    pub fn reserve_total(&self) -> u32 {
        self.reserve.iter().map(|&n| u32::from(n)).sum()
    }
}

// ── Game State ─────────────────────────────────────────────────────────

/// The authoritative state of one session. This is the persisted unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Registry in join order.
    pub players: Vec<Player>,
    /// Live turn order; players leave it when they pass.
    pub turn_order: Vec<PlayerId>,
    pub current_player: Option<PlayerId>,
    pub phase: Phase,
    pub board: Board,
    pub winner: Option<PlayerId>,
}

impl GameState {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Join position of a player, used as the deterministic tie-break everywhere.
    pub fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    pub fn player_name_for_id(&self, id: &PlayerId) -> Option<&str> {
        self.player(id).map(|p| p.name.as_str())
    }

    pub fn current(&self) -> Option<&Player> {
        self.current_player.as_ref().and_then(|id| self.player(id))
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Display name of the winner. Only meaningful once the game is over;
    /// `Ok(None)` means nobody scored.
    pub fn winner_name(&self) -> Result<Option<&str>, EngineError> {
        if !self.is_over() {
            return Err(EngineError::GameNotOver);
        }
        Ok(self.winner.as_ref().and_then(|id| self.player_name_for_id(id)))
    }

    /// Factions nobody has picked yet.
    pub fn available_factions(&self) -> Vec<Faction> {
        Faction::ALL
            .into_iter()
            .filter(|f| !self.players.iter().any(|p| p.faction == Some(*f)))
            .collect()
    }
}
