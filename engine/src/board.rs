// ═══════════════════════════════════════════════════════════════════════
// Board — grid topology, tiles and walls
//
// Tiles are numbered left to right, top to bottom. On the standard 8x5
// board the first two rows read:
//
//    0  1  2  3  4  5  6  7
//    8  9 10 11 12 13 14 15
//
// A wall sits between two orthogonally adjacent tiles, so the two indices
// of a wall always differ by 1 (same row) or by the width (same column).
// ═══════════════════════════════════════════════════════════════════════

use crate::error::EngineError;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    width: u8,
    height: u8,
    /// Row-major, `width * height` entries.
    tiles: Vec<Tile>,
    walls: BTreeMap<WallId, WallStatus>,
    bonus_tiles: Vec<BonusTile>,
}

/// Wire shape of a `Board`, checked before it becomes one.
#[derive(Deserialize)]
struct BoardRepr {
    width: u8,
    height: u8,
    tiles: Vec<Tile>,
    walls: BTreeMap<WallId, WallStatus>,
    bonus_tiles: Vec<BonusTile>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = EngineError;

    fn try_from(repr: BoardRepr) -> Result<Board, EngineError> {
        let skeleton = Board::new(repr.width, repr.height, repr.bonus_tiles.clone())?;
        if repr.tiles.len() != skeleton.tiles.len() {
            return Err(EngineError::InvalidConfig(format!(
                "{}x{} board needs {} tiles, got {}",
                repr.width,
                repr.height,
                skeleton.tiles.len(),
                repr.tiles.len()
            )));
        }
        if let Some(stray) = repr.walls.keys().find(|w| !skeleton.walls.contains_key(w)) {
            return Err(EngineError::UnknownWall(stray.to_string()));
        }
        if repr.walls.len() != skeleton.walls.len() {
            return Err(EngineError::InvalidConfig(format!(
                "{}x{} board needs {} walls, got {}",
                repr.width,
                repr.height,
                skeleton.walls.len(),
                repr.walls.len()
            )));
        }
        Ok(Board { tiles: repr.tiles, walls: repr.walls, ..skeleton })
    }
}

impl Board {
    /// Build an empty board with every wall open and the bonus tiles laid out.
    pub fn new(width: u8, height: u8, bonus_tiles: Vec<BonusTile>) -> Result<Board, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidConfig(format!("board must be at least 1x1, got {width}x{height}")));
        }

        let mut board = Board {
            width,
            height,
            tiles: vec![Tile::Empty; usize::from(width) * usize::from(height)],
            walls: BTreeMap::new(),
            bonus_tiles: Vec::with_capacity(bonus_tiles.len()),
        };

        for bonus in bonus_tiles {
            let at = bonus.position;
            if !board.contains(i64::from(at.row), i64::from(at.column)) {
                return Err(EngineError::InvalidTile { row: at.row.into(), column: at.column.into() });
            }
            if !board.tiles[board.slot(at)].is_empty() {
                return Err(EngineError::InvalidConfig(format!("two bonus tiles at {at}")));
            }
            let slot = board.slot(at);
            board.tiles[slot] = Tile::Bonus { value: bonus.value };
            board.bonus_tiles.push(bonus);
        }

        let w = u16::from(width);
        for i in 0..board.tile_count() as u16 {
            if i + w < board.tile_count() as u16 {
                board.walls.insert(WallId::between(i, i + w), WallStatus::Open);
            }
            if i % w != w - 1 {
                board.walls.insert(WallId::between(i, i + 1), WallStatus::Open);
            }
        }

        Ok(board)
    }

    /// Number of walls on a `width x height` board: 2*W*H - W - H.
    pub fn wall_count_for(width: u8, height: u8) -> usize {
        let (w, h) = (usize::from(width), usize::from(height));
        (2 * w * h).saturating_sub(w + h)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    // ── Topology ───────────────────────────────────────────────────────

    /// Bounds check. Takes signed values so raw client input can be tested directly.
    pub fn contains(&self, row: i64, column: i64) -> bool {
        (0..i64::from(self.height)).contains(&row) && (0..i64::from(self.width)).contains(&column)
    }

    pub fn checked_coord(&self, row: i64, column: i64) -> Result<Coord, EngineError> {
        if !self.contains(row, column) {
            return Err(EngineError::InvalidTile { row, column });
        }
        // Both fit in u8 after the bounds check.
        Ok(Coord::new(row as u8, column as u8))
    }

    /// Linear index `row * width + column`.
    pub fn index_of(&self, at: Coord) -> u16 {
        u16::from(at.row) * u16::from(self.width) + u16::from(at.column)
    }

    pub fn coord_at(&self, index: u16) -> Coord {
        let w = u16::from(self.width);
        Coord::new((index / w) as u8, (index % w) as u8)
    }

    fn slot(&self, at: Coord) -> usize {
        usize::from(self.index_of(at))
    }

    /// The wall separating two tiles, if they are on the board and orthogonally adjacent.
    pub fn wall_between(&self, a: Coord, b: Coord) -> Option<WallId> {
        let on_board = |c: Coord| self.contains(c.row.into(), c.column.into());
        if !on_board(a) || !on_board(b) || a.manhattan(b) != 1 {
            return None;
        }
        Some(WallId::between(self.index_of(a), self.index_of(b)))
    }

    /// The two tiles a wall separates, lower index first.
    pub fn wall_endpoints(&self, wall: WallId) -> (Coord, Coord) {
        let (a, b) = wall.tiles();
        (self.coord_at(a), self.coord_at(b))
    }

    /// Orthogonal neighbours on the board, in the order up, down, left, right.
    pub fn neighbors(&self, at: Coord) -> Vec<Coord> {
        let (row, column) = (i64::from(at.row), i64::from(at.column));
        [(row - 1, column), (row + 1, column), (row, column - 1), (row, column + 1)]
            .into_iter()
            .filter_map(|(r, c)| self.checked_coord(r, c).ok())
            .collect()
    }

    // ── Tiles ──────────────────────────────────────────────────────────

    pub fn tile(&self, at: Coord) -> Option<&Tile> {
        if !self.contains(at.row.into(), at.column.into()) {
            return None;
        }
        self.tiles.get(self.slot(at))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tiles grouped by row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(usize::from(self.width))
    }

    pub fn empty_tiles(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_empty())
            .map(|(i, _)| self.coord_at(i as u16))
    }

    pub fn has_empty_tile(&self) -> bool {
        self.tiles.iter().any(Tile::is_empty)
    }

    pub fn bonus_tiles(&self) -> &[BonusTile] {
        &self.bonus_tiles
    }

    pub(crate) fn set_tile(&mut self, at: Coord, tile: Tile) {
        let slot = self.slot(at);
        self.tiles[slot] = tile;
    }

    // ── Walls ──────────────────────────────────────────────────────────

    pub fn walls(&self) -> &BTreeMap<WallId, WallStatus> {
        &self.walls
    }

    pub fn wall_status(&self, wall: WallId) -> Option<WallStatus> {
        self.walls.get(&wall).copied()
    }

    pub fn is_placed(&self, wall: WallId) -> bool {
        self.wall_status(wall) == Some(WallStatus::Placed)
    }

    pub fn open_walls(&self) -> impl Iterator<Item = WallId> + '_ {
        self.walls
            .iter()
            .filter(|(_, s)| **s == WallStatus::Open)
            .map(|(w, _)| *w)
    }

    pub fn has_open_wall(&self) -> bool {
        self.open_walls().next().is_some()
    }

    pub(crate) fn set_wall(&mut self, wall: WallId, status: WallStatus) {
        if let Some(slot) = self.walls.get_mut(&wall) {
            *slot = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(width: u8, height: u8) -> Board {
        Board::new(width, height, Vec::new()).unwrap()
    }

    #[test]
    fn test_wall_count_matches_formula() {
        for (w, h) in [(8, 5), (1, 1), (3, 3), (1, 6), (10, 2)] {
            let board = plain(w, h);
            assert_eq!(board.walls().len(), Board::wall_count_for(w, h), "{w}x{h}");
            assert!(board.walls().values().all(|s| *s == WallStatus::Open));
        }
        assert_eq!(Board::wall_count_for(8, 5), 67);
    }

    #[test]
    fn test_wall_count_for_degenerate_sizes() {
        assert_eq!(Board::wall_count_for(0, 5), 0);
        assert_eq!(Board::wall_count_for(5, 0), 0);
        assert_eq!(Board::wall_count_for(0, 0), 0);
        assert_eq!(Board::wall_count_for(1, 1), 0);
    }

    #[test]
    fn test_deserialize_round_trip() {
        let board = plain(3, 2);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);
    }

    #[test]
    fn test_deserialize_rejects_mismatched_dimensions() {
        let mut json = serde_json::to_value(plain(8, 5)).unwrap();
        json["width"] = serde_json::json!(9);
        let err = serde_json::from_value::<Board>(json).unwrap_err();
        assert!(err.to_string().contains("tiles"), "{err}");

        let mut json = serde_json::to_value(plain(8, 5)).unwrap();
        json["tiles"].as_array_mut().unwrap().pop();
        assert!(serde_json::from_value::<Board>(json).is_err());

        let mut json = serde_json::to_value(plain(8, 5)).unwrap();
        json["height"] = serde_json::json!(0);
        assert!(serde_json::from_value::<Board>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_foreign_walls() {
        let mut json = serde_json::to_value(plain(8, 5)).unwrap();
        json["walls"].as_object_mut().unwrap().remove("0-1");
        assert!(serde_json::from_value::<Board>(json).is_err());

        let mut json = serde_json::to_value(plain(3, 3)).unwrap();
        json["walls"].as_object_mut().unwrap().insert("2-3".to_string(), serde_json::json!(0));
        let err = serde_json::from_value::<Board>(json).unwrap_err();
        assert!(err.to_string().contains("2-3"), "{err}");
    }

    #[test]
    fn test_linear_index_round_trip() {
        let board = plain(8, 5);
        assert_eq!(board.index_of(Coord::new(1, 1)), 9);
        assert_eq!(board.index_of(Coord::new(4, 7)), 39);
        assert_eq!(board.coord_at(17), Coord::new(2, 1));
    }

    #[test]
    fn test_contains() {
        let board = plain(8, 5);
        assert!(board.contains(0, 0));
        assert!(board.contains(4, 7));
        assert!(!board.contains(5, 0));
        assert!(!board.contains(0, 8));
        assert!(!board.contains(-1, 3));
    }

    #[test]
    fn test_wall_between_is_canonical_and_orthogonal() {
        let board = plain(8, 5);
        let a = Coord::new(1, 1);
        let b = Coord::new(1, 2);
        assert_eq!(board.wall_between(a, b), board.wall_between(b, a));
        assert_eq!(board.wall_between(a, b).unwrap().to_string(), "9-10");
        assert_eq!(board.wall_between(a, Coord::new(2, 1)).unwrap().to_string(), "9-17");
        // Diagonal and distant pairs have no wall.
        assert_eq!(board.wall_between(a, Coord::new(2, 2)), None);
        assert_eq!(board.wall_between(a, Coord::new(1, 3)), None);
        // Last column does not wrap into the next row.
        assert_eq!(board.wall_between(Coord::new(0, 7), Coord::new(1, 0)), None);
        assert!(!board.walls().contains_key(&WallId::between(7, 8)));
    }

    #[test]
    fn test_neighbors_filtered_to_board() {
        let board = plain(8, 5);
        assert_eq!(board.neighbors(Coord::new(0, 0)), vec![Coord::new(1, 0), Coord::new(0, 1)]);
        assert_eq!(board.neighbors(Coord::new(2, 3)).len(), 4);
        assert_eq!(board.neighbors(Coord::new(4, 7)), vec![Coord::new(3, 7), Coord::new(4, 6)]);
    }

    #[test]
    fn test_bonus_layout_validated() {
        let off_board = vec![BonusTile { position: Coord::new(5, 0), value: 3 }];
        assert!(matches!(Board::new(8, 5, off_board), Err(EngineError::InvalidTile { .. })));

        let twice = vec![
            BonusTile { position: Coord::new(1, 1), value: 3 },
            BonusTile { position: Coord::new(1, 1), value: 4 },
        ];
        assert!(matches!(Board::new(8, 5, twice), Err(EngineError::InvalidConfig(_))));
        assert!(matches!(Board::new(0, 5, Vec::new()), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_wall_id_parse() {
        assert_eq!("10-9".parse::<WallId>().unwrap(), WallId::between(9, 10));
        assert!("9".parse::<WallId>().is_err());
        assert!("a-b".parse::<WallId>().is_err());
        assert!("4-4".parse::<WallId>().is_err());
    }
}
