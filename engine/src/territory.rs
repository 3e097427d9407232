// ═══════════════════════════════════════════════════════════════════════
// Territory — connectivity across placed walls
//
// A territory is a maximal set of tiles reachable from one another
// without crossing a placed wall. Every query can take one extra
// "hypothetical" wall that is treated as placed, so legality checks can
// ask "what if this wall went down" without touching the board.
// ═══════════════════════════════════════════════════════════════════════

use crate::board::Board;
use crate::types::*;

/// Smallest territory a wall placement may leave on either side.
pub const MIN_TERRITORY: usize = 4;

/// Neighbours of `from` not cut off by a placed wall or by `hypothetical`.
pub fn reachable_neighbors(board: &Board, from: Coord, hypothetical: Option<WallId>) -> Vec<Coord> {
    board
        .neighbors(from)
        .into_iter()
        .filter(|&to| match board.wall_between(from, to) {
            Some(wall) => Some(wall) != hypothetical && !board.is_placed(wall),
            None => false,
        })
        .collect()
}

/// Depth-first flood fill from `start`. Stops once `cap` tiles have been
/// visited; explores the whole territory when `cap` is `None`.
/// Tiles are returned in visiting order.
pub fn territory_from(
    board: &Board,
    start: Coord,
    cap: Option<usize>,
    hypothetical: Option<WallId>,
) -> Vec<Coord> {
    let limit = cap.unwrap_or(usize::MAX);
    let mut seen = vec![false; board.tile_count()];
    let mut visited = Vec::new();
    let mut stack = vec![start];
    seen[usize::from(board.index_of(start))] = true;

    while visited.len() < limit {
        let Some(next) = stack.pop() else { break };
        visited.push(next);
        for neighbor in reachable_neighbors(board, next, hypothetical) {
            let slot = usize::from(board.index_of(neighbor));
            if !seen[slot] {
                seen[slot] = true;
                stack.push(neighbor);
            }
        }
    }

    visited
}

/// Whether the territory around `at` would still hold at least
/// `MIN_TERRITORY` tiles with `wall` placed.
fn side_survives(board: &Board, at: Coord, wall: WallId) -> bool {
    territory_from(board, at, Some(MIN_TERRITORY), Some(wall)).len() >= MIN_TERRITORY
}

/// A wall may be placed only if the regions on both of its sides keep at
/// least `MIN_TERRITORY` tiles afterwards.
pub fn is_wall_legal(board: &Board, wall: WallId) -> bool {
    let (a, b) = board.wall_endpoints(wall);
    side_survives(board, a, wall) && side_survives(board, b, wall)
}

/// Reclassify every unplaced wall as open or forbidden from scratch.
/// Placed walls are never touched. Running it twice changes nothing.
pub fn refresh_wall_legality(board: &mut Board) {
    let verdicts: Vec<(WallId, WallStatus)> = board
        .walls()
        .iter()
        .filter(|(_, status)| **status != WallStatus::Placed)
        .map(|(&wall, _)| {
            let status = if is_wall_legal(board, wall) { WallStatus::Open } else { WallStatus::Forbidden };
            (wall, status)
        })
        .collect();

    for (wall, status) in verdicts {
        board.set_wall(wall, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(8, 5, Vec::new()).unwrap()
    }

    fn place(board: &mut Board, id: &str) {
        board.set_wall(id.parse().unwrap(), WallStatus::Placed);
    }

    #[test]
    fn test_reachable_neighbors_open_board() {
        let b = board();
        assert_eq!(
            reachable_neighbors(&b, Coord::new(0, 0), None),
            vec![Coord::new(1, 0), Coord::new(0, 1)]
        );
    }

    #[test]
    fn test_reachable_neighbors_respects_hypothetical_wall() {
        let b = board();
        let wall = "0-1".parse().ok();
        assert_eq!(reachable_neighbors(&b, Coord::new(0, 0), wall), vec![Coord::new(1, 0)]);
        // The board itself is unchanged.
        assert_eq!(b.wall_status(WallId::between(0, 1)), Some(WallStatus::Open));
    }

    #[test]
    fn test_reachable_neighbors_respects_placed_wall() {
        let mut b = board();
        place(&mut b, "0-1");
        assert_eq!(reachable_neighbors(&b, Coord::new(0, 0), None), vec![Coord::new(1, 0)]);
    }

    #[test]
    fn test_territory_enclosed_by_walls() {
        let mut b = board();
        for id in ["1-2", "8-16", "9-10", "9-17"] {
            place(&mut b, id);
        }
        assert_eq!(
            territory_from(&b, Coord::new(1, 1), None, None),
            vec![Coord::new(1, 1), Coord::new(1, 0), Coord::new(0, 0), Coord::new(0, 1)]
        );
        assert_eq!(territory_from(&b, Coord::new(4, 7), None, None).len(), 36);
    }

    #[test]
    fn test_territory_cap_stops_early() {
        let b = board();
        assert_eq!(territory_from(&b, Coord::new(2, 3), Some(4), None).len(), 4);
        assert_eq!(territory_from(&b, Coord::new(2, 3), None, None).len(), 40);
    }

    #[test]
    fn test_territory_smaller_than_cap() {
        let mut b = board();
        place(&mut b, "0-1");
        place(&mut b, "0-8");
        assert_eq!(territory_from(&b, Coord::new(0, 0), Some(4), None), vec![Coord::new(0, 0)]);
    }

    #[test]
    fn test_corner_wall_is_illegal_once_corner_is_half_closed() {
        let mut b = board();
        // Cutting off a lone corner tile is never legal.
        place(&mut b, "0-1");
        assert!(!is_wall_legal(&b, WallId::between(0, 8)));
        // A wall in the open middle is fine.
        assert!(is_wall_legal(&b, WallId::between(19, 20)));
    }

    #[test]
    fn test_refresh_forbids_and_is_idempotent() {
        let mut b = board();
        place(&mut b, "0-1");
        refresh_wall_legality(&mut b);
        assert_eq!(b.wall_status(WallId::between(0, 8)), Some(WallStatus::Forbidden));
        assert_eq!(b.wall_status(WallId::between(0, 1)), Some(WallStatus::Placed));

        let once = b.clone();
        refresh_wall_legality(&mut b);
        assert_eq!(once, b);
    }

    #[test]
    fn test_refresh_reopens_stale_forbidden_wall() {
        let mut b = board();
        b.set_wall(WallId::between(19, 20), WallStatus::Forbidden);
        refresh_wall_legality(&mut b);
        assert_eq!(b.wall_status(WallId::between(19, 20)), Some(WallStatus::Open));
    }
}
