mod astar;
mod bfs;
mod heuristic;
mod multi;

pub use astar::astar_single;
pub use bfs::bfs;
pub use heuristic::{manhattan, mst_length, MstScaling};
pub use multi::{astar_corner, astar_multiple, astar_multiple_with};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::common::{Cell, Path};
use crate::map::Grid;
use crate::stat::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Bfs,
    Astar,
    AstarCorner,
    AstarMultiple,
}

/// Runs `method` against `maze`, filling `stats` with counters and timing.
pub fn search<G: Grid + ?Sized>(
    method: Method,
    maze: &G,
    scaling: MstScaling,
    stats: &mut Stats,
) -> Path {
    let start_time = Instant::now();
    let path = match method {
        Method::Bfs => bfs(maze, stats),
        Method::Astar => astar_single(maze, stats),
        Method::AstarCorner => astar_corner(maze, stats),
        Method::AstarMultiple => astar_multiple_with(maze, scaling, stats),
    };
    stats.time_us = start_time.elapsed().as_micros() as usize;
    stats.path_length = path.len();
    path
}

/// Search tree storage; nodes refer to their parent by index.
pub(crate) struct Arena {
    nodes: Vec<(Cell, Option<usize>)>,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Arena { nodes: Vec::new() }
    }

    pub(crate) fn push(&mut self, cell: Cell, parent: Option<usize>) -> usize {
        self.nodes.push((cell, parent));
        self.nodes.len() - 1
    }

    pub(crate) fn cell(&self, index: usize) -> Cell {
        self.nodes[index].0
    }

    /// Follows parent links from `index` back to the root, returned root first.
    pub(crate) fn construct_path(&self, mut index: usize) -> Path {
        let mut path = vec![self.nodes[index].0];
        while let Some(parent) = self.nodes[index].1 {
            path.push(self.nodes[parent].0);
            index = parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::common::validate_path;
    use crate::map::Maze;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{HashMap, VecDeque};

    pub(crate) fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init();
    }

    /// Random maze with a wall border, interior walls at `density`, and the
    /// requested number of waypoints on open cells.
    pub(crate) fn random_maze(
        rng: &mut StdRng,
        height: usize,
        width: usize,
        density: f64,
        waypoints: usize,
    ) -> Maze {
        let mut rows: Vec<Vec<char>> = (0..height)
            .map(|x| {
                (0..width)
                    .map(|y| {
                        let border = x == 0 || y == 0 || x == height - 1 || y == width - 1;
                        if border || rng.gen_bool(density) {
                            Maze::WALL
                        } else {
                            Maze::OPEN
                        }
                    })
                    .collect()
            })
            .collect();

        let mut place = |ch: char, rows: &mut Vec<Vec<char>>| loop {
            let x = rng.gen_range(1..height - 1);
            let y = rng.gen_range(1..width - 1);
            if rows[x][y] == Maze::OPEN || rows[x][y] == Maze::WALL {
                rows[x][y] = ch;
                break;
            }
        };
        place(Maze::START, &mut rows);
        for _ in 0..waypoints {
            place(Maze::WAYPOINT, &mut rows);
        }

        let text: Vec<String> = rows.into_iter().map(|row| row.into_iter().collect()).collect();
        Maze::parse(&text.join("\n")).unwrap()
    }

    /// Exhaustive BFS over (cell, visited waypoints) giving the optimal tour
    /// length in steps, or None when some waypoint is unreachable.
    pub(crate) fn brute_force_tour(maze: &Maze) -> Option<usize> {
        let waypoints = maze.waypoints();
        let mask_of = |cell: Cell| {
            waypoints
                .iter()
                .enumerate()
                .filter(|&(_, &w)| w == cell)
                .fold(0u32, |mask, (i, _)| mask | (1 << i))
        };
        let full = (1u32 << waypoints.len()) - 1;

        let start = (maze.start(), mask_of(maze.start()));
        let mut distance = HashMap::from([(start, 0usize)]);
        let mut queue = VecDeque::from([start]);
        while let Some((cell, mask)) = queue.pop_front() {
            let d = distance[&(cell, mask)];
            if mask == full {
                return Some(d);
            }
            for next in maze.neighbors(cell.0, cell.1) {
                let state = (next, mask | mask_of(next));
                if !distance.contains_key(&state) {
                    distance.insert(state, d + 1);
                    queue.push_back(state);
                }
            }
        }
        None
    }

    #[test]
    fn test_arena_construct_path() {
        let mut arena = Arena::new();
        let root = arena.push((0, 0), None);
        let a = arena.push((0, 1), Some(root));
        let b = arena.push((1, 1), Some(a));
        assert_eq!(arena.cell(b), (1, 1));
        assert_eq!(arena.construct_path(b), vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(arena.construct_path(root), vec![(0, 0)]);
    }

    #[test]
    fn test_search_dispatch_fills_stats() {
        init_tracing();
        let maze = Maze::from_file("maze_file/test/tiny.txt").unwrap();
        for method in [Method::Bfs, Method::Astar, Method::AstarMultiple] {
            let mut stats = Stats::default();
            let path = search(method, &maze, MstScaling::Exact, &mut stats);
            assert_eq!(path.len(), 7, "{method:?}");
            assert_eq!(stats.path_length, 7);
            assert!(stats.expanded_nodes > 0);
        }
    }

    #[test]
    fn test_random_single_target_agreement() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..200 {
            let maze = random_maze(&mut rng, 12, 16, 0.3, 1);
            let reachable = brute_force_tour(&maze);

            let bfs_path = bfs(&maze, &mut Stats::default());
            let astar_path = astar_single(&maze, &mut Stats::default());
            let multi_path = astar_multiple(&maze, &mut Stats::default());

            match reachable {
                Some(steps) => {
                    assert_eq!(bfs_path.len(), steps + 1);
                    assert_eq!(astar_path.len(), steps + 1);
                    assert_eq!(multi_path.len(), steps + 1);
                    validate_path(&maze, &bfs_path).unwrap();
                    validate_path(&maze, &astar_path).unwrap();
                    validate_path(&maze, &multi_path).unwrap();
                }
                None => {
                    assert!(bfs_path.is_empty());
                    assert!(astar_path.is_empty());
                    assert!(multi_path.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_random_multi_target_optimal() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..60 {
            let waypoints = rng.gen_range(2..=5);
            let maze = random_maze(&mut rng, 9, 12, 0.2, waypoints);
            let path = astar_multiple(&maze, &mut Stats::default());
            match brute_force_tour(&maze) {
                Some(steps) => {
                    assert_eq!(path.len(), steps + 1);
                    validate_path(&maze, &path).unwrap();
                }
                None => assert!(path.is_empty()),
            }
        }
    }
}
