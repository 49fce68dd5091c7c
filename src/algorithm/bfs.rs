use super::Arena;
use crate::common::Path;
use crate::map::Grid;
use crate::stat::Stats;

use std::collections::{HashSet, VecDeque};
use tracing::{debug, instrument, trace, warn};

/// Breadth-first search from the start to the first waypoint.
///
/// Cells are marked visited when they are enqueued, so each cell enters the
/// queue once and the first time the target is dequeued its path is shortest.
#[instrument(skip_all, name = "bfs", fields(start = format!("{:?}", maze.start())), level = "debug")]
pub fn bfs<G: Grid + ?Sized>(maze: &G, stats: &mut Stats) -> Path {
    let Some(&goal) = maze.waypoints().first() else {
        warn!("maze has no waypoint to search for");
        return Path::new();
    };
    debug!("goal: {goal:?}");

    let mut arena = Arena::new();
    let mut visited = HashSet::from([maze.start()]);
    let mut frontier = VecDeque::from([arena.push(maze.start(), None)]);

    while let Some(current) = frontier.pop_front() {
        let position = arena.cell(current);
        trace!("expand node: {position:?}");
        stats.expanded_nodes += 1;

        if position == goal {
            return arena.construct_path(current);
        }

        for neighbor in maze.neighbors(position.0, position.1) {
            if visited.insert(neighbor) {
                frontier.push_back(arena.push(neighbor, Some(current)));
                stats.generated_nodes += 1;
            }
        }
    }

    debug!("cannot find solution");
    Path::new()
}
