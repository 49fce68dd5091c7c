use super::heuristic::manhattan;
use super::Arena;
use crate::common::{Cell, Path};
use crate::map::Grid;
use crate::stat::Stats;

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenNode {
    f_cost: usize,
    g_cost: usize,
    position: Cell,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            // Higher g cost has higher priority
            .then_with(|| other.g_cost.cmp(&self.g_cost))
            .then_with(|| self.position.cmp(&other.position))
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* from the start to the first waypoint with the Manhattan heuristic.
///
/// Ties on `f` go to the deeper node, then to the smaller cell.
#[instrument(skip_all, name = "astar_single", fields(start = format!("{:?}", maze.start())), level = "debug")]
pub fn astar_single<G: Grid + ?Sized>(maze: &G, stats: &mut Stats) -> Path {
    let Some(&goal) = maze.waypoints().first() else {
        warn!("maze has no waypoint to search for");
        return Path::new();
    };
    debug!("goal: {goal:?}");

    let mut arena = Arena::new();
    let mut open_list = BTreeSet::new();
    // Best open or closed record per cell.
    let mut best: HashMap<Cell, OpenNode> = HashMap::new();

    let start = maze.start();
    let start_node = OpenNode {
        f_cost: manhattan(start, goal),
        g_cost: 0,
        position: start,
        index: arena.push(start, None),
    };
    best.insert(start, start_node.clone());
    open_list.insert(start_node);

    while let Some(current) = open_list.pop_first() {
        trace!("expand node: {current:?}");
        stats.expanded_nodes += 1;

        if current.position == goal {
            return arena.construct_path(current.index);
        }

        // Assuming uniform cost.
        let tentative_g_cost = current.g_cost + 1;

        for neighbor in maze.neighbors(current.position.0, current.position.1) {
            if best
                .get(&neighbor)
                .is_some_and(|known| known.g_cost <= tentative_g_cost)
            {
                continue;
            }

            let node = OpenNode {
                f_cost: tentative_g_cost + manhattan(neighbor, goal),
                g_cost: tentative_g_cost,
                position: neighbor,
                index: arena.push(neighbor, Some(current.index)),
            };
            // Replace the stale open entry so each cell is queued at most once.
            if let Some(previous) = best.insert(neighbor, node.clone()) {
                open_list.remove(&previous);
            }
            open_list.insert(node);
            stats.generated_nodes += 1;
        }
    }

    debug!("cannot find solution");
    Path::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::bfs;
    use crate::algorithm::tests::init_tracing;
    use crate::common::validate_path;
    use crate::map::Maze;

    fn open_room(size: usize) -> Maze {
        let mut rows = vec!["%".repeat(size + 2)];
        for x in 0..size {
            let mut row = String::from("%");
            for y in 0..size {
                row.push(match (x, y) {
                    (0, 0) => Maze::START,
                    _ if x == size - 1 && y == size - 1 => Maze::WAYPOINT,
                    _ => Maze::OPEN,
                });
            }
            row.push('%');
            rows.push(row);
        }
        rows.push("%".repeat(size + 2));
        Maze::parse(&rows.join("\n")).unwrap()
    }

    #[test]
    fn test_astar_tiny() {
        init_tracing();
        let maze = Maze::from_file("maze_file/test/tiny.txt").unwrap();
        let path = astar_single(&maze, &mut Stats::default());
        assert_eq!(path.len(), 7);
        assert_eq!(path.last(), Some(&(3, 5)));
        validate_path(&maze, &path).unwrap();
    }

    #[test]
    fn test_astar_unreachable() {
        init_tracing();
        let maze = Maze::from_file("maze_file/test/unreachable.txt").unwrap();
        assert!(astar_single(&maze, &mut Stats::default()).is_empty());
    }

    #[test]
    fn test_astar_expands_fewer_nodes_than_bfs() {
        init_tracing();
        let maze = open_room(8);
        let mut astar_stats = Stats::default();
        let mut bfs_stats = Stats::default();
        let astar_path = astar_single(&maze, &mut astar_stats);
        let bfs_path = bfs(&maze, &mut bfs_stats);

        assert_eq!(astar_path.len(), 15);
        assert_eq!(bfs_path.len(), 15);
        assert!(astar_stats.expanded_nodes < bfs_stats.expanded_nodes);
    }

    #[test]
    fn test_astar_detour() {
        // The wall forces a detour away from the straight Manhattan line.
        let maze = Maze::parse(
            "%%%%%%%\n\
             %P % .%\n\
             %  %  %\n\
             %     %\n\
             %%%%%%%",
        )
        .unwrap();
        let path = astar_single(&maze, &mut Stats::default());
        assert_eq!(path.len(), 9);
        validate_path(&maze, &path).unwrap();
    }
}
