// ═══════════════════════════════════════════════════════════════════════
// Pathfinder — A* over the confirmed-safe subgraph, plus the maneuver
// planner that turns a cell path into turn/forward actions.
// ═══════════════════════════════════════════════════════════════════════

use cavern_engine::grid::{distance, neighbors};
use cavern_engine::types::{Action, Cell, Direction};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

/// Shortest path from `from` to `to` stepping only onto confirmed-safe
/// cells. The start cell itself need not be in the safe set (the player
/// may be standing on a cell that was never proven safe). Returns the
/// full cell sequence including both endpoints, or an empty path when
/// the destination is unreachable or `from == to`.
///
/// A* with the Manhattan heuristic; the (cost, cell) heap ordering makes
/// tie-breaking deterministic.
pub fn find_path(safe: &BTreeSet<Cell>, size: u8, from: Cell, to: Cell) -> Vec<Cell> {
    if from == to {
        return Vec::new();
    }

    let mut open: BinaryHeap<Reverse<(u32, Cell)>> = BinaryHeap::new();
    open.push(Reverse((distance(from, to), from)));

    let mut came_from: BTreeMap<Cell, Cell> = BTreeMap::new();
    let mut g_score: BTreeMap<Cell, u32> = BTreeMap::new();
    g_score.insert(from, 0);

    while let Some(Reverse((_, current))) = open.pop() {
        if current == to {
            let mut path = vec![current];
            let mut cursor = current;
            while let Some(&prev) = came_from.get(&cursor) {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return path;
        }

        let g = g_score[&current];
        for next in neighbors(current, size) {
            if !safe.contains(&next) {
                continue;
            }
            let tentative = g + 1;
            if g_score.get(&next).map_or(true, |&best| tentative < best) {
                came_from.insert(next, current);
                g_score.insert(next, tentative);
                open.push(Reverse((tentative + distance(next, to), next)));
            }
        }
    }

    Vec::new()
}

/// Facing needed to move between two adjacent cells, if they are
/// actually adjacent.
pub fn direction_between(from: Cell, to: Cell) -> Option<Direction> {
    let dx = to.x as i8 - from.x as i8;
    let dy = to.y as i8 - from.y as i8;
    Direction::from_delta(dx, dy)
}

/// Turn actions required to rotate `facing` into `target`: none when
/// aligned, one left or right for 90°, two rights for a reversal. Never
/// more than two.
pub fn turns_needed(facing: Direction, target: Direction) -> Vec<Action> {
    if facing == target {
        Vec::new()
    } else if facing.right() == target {
        vec![Action::TurnRight]
    } else if facing.left() == target {
        vec![Action::TurnLeft]
    } else {
        vec![Action::TurnRight, Action::TurnRight]
    }
}

/// Expand a cell path into the primitive actions that walk it: per hop,
/// the turns required to face the next cell, then a forward move. Pure
/// planning; tracks a simulated facing, moves nothing.
pub fn plan_moves(facing: Direction, path: &[Cell]) -> Vec<Action> {
    let mut actions = Vec::new();
    let mut heading = facing;
    for hop in path.windows(2) {
        if let Some(dir) = direction_between(hop[0], hop[1]) {
            actions.extend(turns_needed(heading, dir));
            heading = dir;
            actions.push(Action::Forward);
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavern_engine::grid::all_cells;

    #[test]
    fn shortest_path_on_an_open_grid() {
        let safe = all_cells(4);
        let path = find_path(&safe, 4, Cell::new(1, 1), Cell::new(3, 3));
        // 4 hops → 5 cells including both endpoints
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Cell::new(1, 1));
        assert_eq!(path[4], Cell::new(3, 3));
        for hop in path.windows(2) {
            assert_eq!(distance(hop[0], hop[1]), 1, "non-adjacent hop");
        }
    }

    #[test]
    fn path_stays_inside_the_safe_set() {
        // corridor: only the bottom row and right column are safe
        let mut safe = BTreeSet::new();
        for x in 1..=4 {
            safe.insert(Cell::new(x, 1));
        }
        for y in 1..=4 {
            safe.insert(Cell::new(4, y));
        }
        let path = find_path(&safe, 4, Cell::new(1, 1), Cell::new(4, 4));
        assert_eq!(path.len(), 7);
        assert!(path.iter().all(|c| safe.contains(c)));
    }

    #[test]
    fn unreachable_or_trivial_requests_yield_empty_paths() {
        let safe = BTreeSet::from([Cell::new(1, 1), Cell::new(3, 3)]);
        assert!(find_path(&safe, 4, Cell::new(1, 1), Cell::new(3, 3)).is_empty());
        assert!(find_path(&safe, 4, Cell::new(1, 1), Cell::new(1, 1)).is_empty());
    }

    #[test]
    fn path_minimality_matches_breadth_first_search() {
        // fixed blocked cells, then compare A* length against BFS
        let mut safe = all_cells(4);
        safe.remove(&Cell::new(2, 2));
        safe.remove(&Cell::new(3, 2));

        let from = Cell::new(1, 1);
        for &to in &safe {
            let astar = find_path(&safe, 4, from, to);
            let bfs = bfs_distance(&safe, 4, from, to);
            match bfs {
                Some(0) => assert!(astar.is_empty()),
                Some(d) => assert_eq!(astar.len() as u32, d + 1, "suboptimal path to {to}"),
                None => assert!(astar.is_empty(), "found a path to unreachable {to}"),
            }
        }
    }

    fn bfs_distance(safe: &BTreeSet<Cell>, size: u8, from: Cell, to: Cell) -> Option<u32> {
        use std::collections::VecDeque;
        let mut queue = VecDeque::from([(from, 0u32)]);
        let mut seen = BTreeSet::from([from]);
        while let Some((cell, d)) = queue.pop_front() {
            if cell == to {
                return Some(d);
            }
            for next in neighbors(cell, size) {
                if safe.contains(&next) && seen.insert(next) {
                    queue.push_back((next, d + 1));
                }
            }
        }
        None
    }

    #[test]
    fn turn_counts_are_correct_for_every_pair() {
        for facing in Direction::ALL {
            for target in Direction::ALL {
                let turns = turns_needed(facing, target);
                assert!(turns.len() <= 2);
                // applying the turns always reaches the target facing
                let mut heading = facing;
                for t in &turns {
                    heading = match t {
                        Action::TurnRight => heading.right(),
                        Action::TurnLeft => heading.left(),
                        other => panic!("unexpected action {other}"),
                    };
                }
                assert_eq!(heading, target);
            }
        }
    }

    #[test]
    fn plan_expands_turns_and_forwards() {
        // (1,1) → (2,1) → (2,2), starting facing North
        let path = [Cell::new(1, 1), Cell::new(2, 1), Cell::new(2, 2)];
        let actions = plan_moves(Direction::North, &path);
        assert_eq!(
            actions,
            vec![
                Action::TurnRight, // North → East
                Action::Forward,
                Action::TurnLeft, // East → North
                Action::Forward,
            ]
        );
    }

    #[test]
    fn plan_handles_reversals_with_two_rights() {
        let path = [Cell::new(2, 2), Cell::new(1, 2)];
        let actions = plan_moves(Direction::East, &path);
        assert_eq!(
            actions,
            vec![Action::TurnRight, Action::TurnRight, Action::Forward]
        );
    }

    #[test]
    fn direction_between_rejects_non_adjacent_cells() {
        assert_eq!(
            direction_between(Cell::new(1, 1), Cell::new(2, 1)),
            Some(Direction::East)
        );
        assert_eq!(
            direction_between(Cell::new(2, 1), Cell::new(1, 1)),
            Some(Direction::West)
        );
        assert_eq!(direction_between(Cell::new(1, 1), Cell::new(3, 1)), None);
        assert_eq!(direction_between(Cell::new(1, 1), Cell::new(2, 2)), None);
    }
}
