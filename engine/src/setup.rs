// ═══════════════════════════════════════════════════════════════════════
// Game setup — board layout and the initial lobby state
// ═══════════════════════════════════════════════════════════════════════

use crate::board::Board;
use crate::error::EngineError;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_WIDTH: u8 = 8;
pub const DEFAULT_HEIGHT: u8 = 5;

/// Bonus tile positions on the standard board, in value-assignment order.
pub const BONUS_POSITIONS: [Coord; 8] = [
    Coord::new(0, 3),
    Coord::new(1, 1),
    Coord::new(1, 5),
    Coord::new(1, 7),
    Coord::new(3, 0),
    Coord::new(3, 4),
    Coord::new(4, 2),
    Coord::new(4, 6),
];

/// The pool of bonus values dealt onto `BONUS_POSITIONS`.
pub const BONUS_VALUE_POOL: [u32; 8] = [3, 4, 4, 5, 5, 6, 6, 7];

/// How bonus values are assigned to the bonus positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BonusValues {
    /// Exactly these values, in position order.
    Fixed(Vec<u32>),
    /// The standard pool, shuffled deterministically from a seed.
    Shuffled { seed: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
    pub bonus_positions: Vec<Coord>,
    pub bonus_values: BonusValues,
}

impl GameConfig {
    /// Standard board with a seeded shuffle of the value pool.
    pub fn shuffled(seed: u64) -> Self {
        GameConfig {
            bonus_values: BonusValues::Shuffled { seed },
            ..GameConfig::default()
        }
    }

    /// Standard board with the given values in position order.
    pub fn fixed(values: Vec<u32>) -> Self {
        GameConfig {
            bonus_values: BonusValues::Fixed(values),
            ..GameConfig::default()
        }
    }

    fn resolve_values(&self) -> Vec<u32> {
        match &self.bonus_values {
            BonusValues::Fixed(values) => values.clone(),
            BonusValues::Shuffled { seed } => {
                let mut rng = ChaCha8Rng::seed_from_u64(*seed);
                let mut pool = BONUS_VALUE_POOL.to_vec();
                pool.shuffle(&mut rng);
                pool
            }
        }
    }
}

impl Default for GameConfig {
    /// Standard 8x5 board with the value pool in its listed order.
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            bonus_positions: BONUS_POSITIONS.to_vec(),
            bonus_values: BonusValues::Fixed(BONUS_VALUE_POOL.to_vec()),
        }
    }
}

/// A fresh session in the lobby: no players, every wall open.
pub fn create_initial_state(config: &GameConfig) -> Result<GameState, EngineError> {
    let values = config.resolve_values();
    if values.len() != config.bonus_positions.len() {
        return Err(EngineError::InvalidConfig(format!(
            "{} bonus positions but {} bonus values",
            config.bonus_positions.len(),
            values.len()
        )));
    }

    let bonus_tiles = config
        .bonus_positions
        .iter()
        .zip(values)
        .map(|(&position, value)| BonusTile { position, value })
        .collect();
    let board = Board::new(config.width, config.height, bonus_tiles)?;

    Ok(GameState {
        players: Vec::new(),
        turn_order: Vec::new(),
        current_player: None,
        phase: Phase::Prologue,
        board,
        winner: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_standard_game() {
        let state = create_initial_state(&GameConfig::default()).unwrap();
        assert!(state.players.is_empty());
        assert!(state.turn_order.is_empty());
        assert_eq!(state.current_player, None);
        assert_eq!(state.phase, Phase::Prologue);
        assert_eq!(state.board.tile_count(), 40);
        assert_eq!(state.board.walls().len(), 67);
        assert!(state.board.walls().values().all(|s| *s == WallStatus::Open));
        assert_eq!(state.available_factions(), Faction::ALL.to_vec());

        assert_eq!(state.board.tile(Coord::new(0, 3)), Some(&Tile::Bonus { value: 3 }));
        assert_eq!(state.board.tile(Coord::new(1, 1)), Some(&Tile::Bonus { value: 4 }));
        assert_eq!(state.board.tile(Coord::new(4, 6)), Some(&Tile::Bonus { value: 7 }));
        assert_eq!(state.board.empty_tiles().count(), 32);
    }

    #[test]
    fn test_deterministic_shuffle() {
        let s1 = create_initial_state(&GameConfig::shuffled(123)).unwrap();
        let s2 = create_initial_state(&GameConfig::shuffled(123)).unwrap();
        assert_eq!(s1.board.bonus_tiles(), s2.board.bonus_tiles());

        // A shuffle is a permutation of the pool.
        let mut values: Vec<u32> = s1.board.bonus_tiles().iter().map(|b| b.value).collect();
        values.sort_unstable();
        assert_eq!(values, BONUS_VALUE_POOL.to_vec());
    }

    #[test]
    fn test_value_count_mismatch_rejected() {
        let config = GameConfig::fixed(vec![1, 2, 3]);
        assert!(matches!(create_initial_state(&config), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_custom_board() {
        let config = GameConfig {
            width: 4,
            height: 4,
            bonus_positions: vec![Coord::new(0, 0), Coord::new(3, 3)],
            bonus_values: BonusValues::Fixed(vec![5, 9]),
        };
        let state = create_initial_state(&config).unwrap();
        assert_eq!(state.board.walls().len(), 24);
        assert_eq!(state.board.bonus_tiles().len(), 2);

        let off_board = GameConfig { width: 4, height: 4, ..GameConfig::default() };
        assert!(create_initial_state(&off_board).is_err());
    }
}
