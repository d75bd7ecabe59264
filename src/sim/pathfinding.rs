//! A* search over the maze grid
//!
//! 4-connected moves with unit cost and a Manhattan heuristic, which is
//! admissible and consistent here, so returned paths are shortest paths.
//!
//! The open list is scanned linearly for the lowest `f`; ties go to the
//! node inserted first. Predecessors are recorded in a map when a node is
//! closed, and the path is rebuilt by walking that map back from the goal.

use std::collections::{HashMap, HashSet};

use glam::IVec2;

use super::maze::MazeGrid;

/// Neighbour offsets, in expansion order
const NEIGHBOURS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

/// Frontier entry
#[derive(Debug, Clone, Copy)]
struct PathNode {
    pos: IVec2,
    g: u32,
    h: u32,
    f: u32,
    parent: Option<IVec2>,
}

impl PathNode {
    fn new(pos: IVec2, g: u32, end: IVec2, parent: Option<IVec2>) -> Self {
        let h = manhattan(pos, end);
        Self {
            pos,
            g,
            h,
            f: g + h,
            parent,
        }
    }
}

/// |a.x - b.x| + |a.y - b.y|
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Shortest path from `start` to `end` on `grid`.
///
/// The result excludes `start` and includes `end`. It is empty when `end`
/// is unreachable (including when it is a wall) and when `start == end`.
/// `start` itself is not required to be open.
pub fn find_path(grid: &MazeGrid, start: IVec2, end: IVec2) -> Vec<IVec2> {
    let mut open: Vec<PathNode> = vec![PathNode::new(start, 0, end, None)];
    let mut closed: HashSet<IVec2> = HashSet::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();

    while !open.is_empty() {
        let mut best = 0;
        for (i, node) in open.iter().enumerate().skip(1) {
            if node.f < open[best].f {
                best = i;
            }
        }
        // `remove` keeps insertion order for the tie-break above
        let current = open.remove(best);

        closed.insert(current.pos);
        if let Some(parent) = current.parent {
            came_from.insert(current.pos, parent);
        }

        if current.pos == end {
            return reconstruct(&came_from, end);
        }

        for offset in NEIGHBOURS {
            let next = current.pos + offset;
            if grid.is_wall(next.x, next.y) || closed.contains(&next) {
                continue;
            }

            let g = current.g + 1;
            let existing = open.iter().position(|n| n.pos == next);
            if let Some(i) = existing {
                if open[i].g <= g {
                    continue;
                }
            }

            let node = PathNode::new(next, g, end, Some(current.pos));
            match existing {
                Some(i) => open[i] = node,
                None => open.push(node),
            }
        }
    }

    log::trace!("No path from {} to {}", start, end);
    Vec::new()
}

fn reconstruct(came_from: &HashMap<IVec2, IVec2>, end: IVec2) -> Vec<IVec2> {
    let mut path = vec![end];
    let mut pos = end;
    while let Some(&parent) = came_from.get(&pos) {
        path.push(parent);
        pos = parent;
    }
    // Drop the start cell, which is the last one pushed
    path.pop();
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MazeLayout;
    use crate::sim::Maze;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    fn grid(rows: &[&str]) -> MazeGrid {
        Maze::new(MazeLayout::from_rows(rows)).grid().clone()
    }

    /// Reference breadth-first distance
    fn bfs_distance(grid: &MazeGrid, start: IVec2, end: IVec2) -> Option<usize> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        while let Some((pos, dist)) = queue.pop_front() {
            if pos == end {
                return Some(dist);
            }
            for offset in NEIGHBOURS {
                let next = pos + offset;
                if !grid.is_wall(next.x, next.y) && seen.insert(next) {
                    queue.push_back((next, dist + 1));
                }
            }
        }
        None
    }

    fn assert_valid_path(grid: &MazeGrid, start: IVec2, path: &[IVec2]) {
        let mut prev = start;
        for step in path {
            assert_eq!(manhattan(prev, *step), 1, "non-adjacent step {prev} -> {step}");
            assert!(!grid.is_wall(step.x, step.y), "path crosses wall at {step}");
            prev = *step;
        }
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(IVec2::new(1, 2), IVec2::new(4, -2)), 7);
        assert_eq!(manhattan(IVec2::ZERO, IVec2::ZERO), 0);
    }

    #[test]
    fn test_same_start_and_end_is_empty() {
        let g = grid(&["   "]);
        assert!(find_path(&g, IVec2::new(1, 0), IVec2::new(1, 0)).is_empty());
    }

    #[test]
    fn test_adjacent_cells() {
        let g = grid(&["   "]);
        assert_eq!(
            find_path(&g, IVec2::new(0, 0), IVec2::new(1, 0)),
            vec![IVec2::new(1, 0)]
        );
    }

    #[test]
    fn test_equal_cost_ties_follow_expansion_order() {
        // Every monotone route is shortest; which one comes back is fixed by
        // the neighbour order and first-inserted-wins on equal f
        let g = grid(&["   ", "   ", "   "]);
        assert_eq!(
            find_path(&g, IVec2::new(0, 0), IVec2::new(2, 2)),
            vec![
                IVec2::new(1, 0),
                IVec2::new(2, 0),
                IVec2::new(2, 1),
                IVec2::new(2, 2)
            ]
        );
        assert_eq!(
            find_path(&g, IVec2::new(2, 2), IVec2::new(0, 0)),
            vec![
                IVec2::new(1, 2),
                IVec2::new(0, 2),
                IVec2::new(0, 1),
                IVec2::new(0, 0)
            ]
        );
    }

    #[test]
    fn test_straight_corridor() {
        let g = grid(&["#####", "#   #", "#####"]);
        let path = find_path(&g, IVec2::new(1, 1), IVec2::new(3, 1));
        assert_eq!(path, vec![IVec2::new(2, 1), IVec2::new(3, 1)]);
    }

    #[test]
    fn test_routes_around_walls() {
        let g = grid(&[
            "#######",
            "#  #  #",
            "#  #  #",
            "#     #",
            "#######",
        ]);
        let start = IVec2::new(1, 1);
        let end = IVec2::new(5, 1);
        let path = find_path(&g, start, end);
        assert_eq!(path.len(), 8);
        assert_eq!(path.last(), Some(&end));
        assert_valid_path(&g, start, &path);
    }

    #[test]
    fn test_unreachable_goal() {
        let g = grid(&["  #  "]);
        assert!(find_path(&g, IVec2::new(0, 0), IVec2::new(4, 0)).is_empty());
    }

    #[test]
    fn test_wall_or_outside_goal() {
        let g = grid(&["  #"]);
        assert!(find_path(&g, IVec2::new(0, 0), IVec2::new(2, 0)).is_empty());
        assert!(find_path(&g, IVec2::new(0, 0), IVec2::new(9, 9)).is_empty());
    }

    #[test]
    fn test_long_detour_keeps_full_path() {
        // Forces the search to close predecessors well before the goal is reached
        let g = grid(&[
            "#########",
            "#       #",
            "####### #",
            "#       #",
            "# #######",
            "#       #",
            "#########",
        ]);
        let start = IVec2::new(1, 1);
        let end = IVec2::new(7, 5);
        let path = find_path(&g, start, end);
        assert_eq!(Some(path.len()), bfs_distance(&g, start, end));
        assert_valid_path(&g, start, &path);
    }

    #[test]
    fn test_classic_maze_paths_are_optimal() {
        let maze = Maze::classic();
        let spawns = maze.valid_spawn_positions();
        let start = spawns[0];
        for end in spawns.iter().step_by(37) {
            let path = maze.find_path(start, *end);
            match bfs_distance(maze.grid(), start, *end) {
                Some(dist) => {
                    assert_eq!(path.len(), dist, "suboptimal path to {end}");
                    assert_valid_path(maze.grid(), start, &path);
                }
                None => assert!(path.is_empty()),
            }
        }
    }

    proptest! {
        #[test]
        fn prop_path_length_matches_bfs(
            walls in proptest::collection::vec(any::<bool>(), 64),
            sx in 0i32..8, sy in 0i32..8, ex in 0i32..8, ey in 0i32..8,
        ) {
            let mut g = MazeGrid::filled(8, 8, crate::sim::Cell::Open);
            for (i, wall) in walls.iter().enumerate() {
                if *wall && i % 3 == 0 {
                    g.set((i % 8) as i32, (i / 8) as i32, crate::sim::Cell::Wall);
                }
            }
            let start = IVec2::new(sx, sy);
            let end = IVec2::new(ex, ey);
            prop_assume!(!g.is_wall(sx, sy));

            let path = find_path(&g, start, end);
            match bfs_distance(&g, start, end) {
                Some(dist) => {
                    prop_assert_eq!(path.len(), dist);
                    if dist > 0 {
                        prop_assert_eq!(path.last(), Some(&end));
                    }
                    assert_valid_path(&g, start, &path);
                }
                None => prop_assert!(path.is_empty()),
            }
        }
    }
}
