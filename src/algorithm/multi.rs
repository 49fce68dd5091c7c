use super::heuristic::{nearest_distance, MstCache, MstScaling};
use super::Arena;
use crate::common::{Cell, Path};
use crate::map::Grid;
use crate::stat::Stats;

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Waypoints not yet visited on a particular path, sorted so that equal sets
/// compare and hash equal.
type Remaining = Rc<[Cell]>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenNode {
    f_cost: usize,
    g_cost: usize,
    position: Cell,
    sequence: usize,
    index: usize,
    remaining: Remaining,
}

impl Ord for OpenNode {
    // Lowest f first, then smaller cell, then earlier insertion. `sequence`
    // is unique, so this is a total order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then_with(|| self.position.cmp(&other.position))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Removes `position` from `remaining` if it is a waypoint there.
fn consume(remaining: &Remaining, position: Cell) -> Remaining {
    match remaining.binary_search(&position) {
        Ok(at) => {
            let mut rest = remaining.to_vec();
            rest.remove(at);
            rest.into()
        }
        Err(_) => Rc::clone(remaining),
    }
}

/// Four-corner variant; identical to [`astar_multiple`].
pub fn astar_corner<G: Grid + ?Sized>(maze: &G, stats: &mut Stats) -> Path {
    astar_multiple(maze, stats)
}

/// Shortest path from the start that visits every waypoint, using the exact
/// MST heuristic.
pub fn astar_multiple<G: Grid + ?Sized>(maze: &G, stats: &mut Stats) -> Path {
    astar_multiple_with(maze, MstScaling::Exact, stats)
}

/// A* over `(cell, remaining waypoints)` states.
///
/// `h` is the MST length of the remaining waypoints plus the distance to the
/// nearest of them. With [`MstScaling::Exact`] this never overestimates, so the
/// returned path is shortest; a damped scaling may return a longer one.
#[instrument(skip_all, name = "astar_multiple", fields(start = format!("{:?}", maze.start()), waypoints = maze.waypoints().len()), level = "debug")]
pub fn astar_multiple_with<G: Grid + ?Sized>(
    maze: &G,
    scaling: MstScaling,
    stats: &mut Stats,
) -> Path {
    let mut waypoints = maze.waypoints().to_vec();
    waypoints.sort_unstable();
    waypoints.dedup();
    let all_waypoints: Remaining = waypoints.into();

    let mut arena = Arena::new();
    let mut mst = MstCache::new(scaling);
    let mut open_list = BTreeSet::new();
    // Best known g per (cell, remaining) state; only ever decreases.
    let mut best_g: HashMap<(Cell, Remaining), usize> = HashMap::new();
    let mut sequence = 0;

    let start = maze.start();
    best_g.insert((start, Rc::clone(&all_waypoints)), 0);
    open_list.insert(OpenNode {
        f_cost: mst.length(&all_waypoints) + nearest_distance(start, &all_waypoints),
        g_cost: 0,
        position: start,
        sequence,
        index: arena.push(start, None),
        remaining: all_waypoints,
    });

    while let Some(current) = open_list.pop_first() {
        let state = (current.position, Rc::clone(&current.remaining));
        if best_g.get(&state).is_some_and(|&g| g < current.g_cost) {
            // A cheaper route to this state was queued after this one.
            continue;
        }
        trace!("expand node: {:?} g {} f {}", current.position, current.g_cost, current.f_cost);
        stats.expanded_nodes += 1;

        let remaining = consume(&current.remaining, current.position);
        if remaining.is_empty() {
            stats.mst_computations = mst.len();
            debug!("all waypoints visited at cost {}", current.g_cost);
            return arena.construct_path(current.index);
        }

        let tentative_g_cost = current.g_cost + 1;
        let mst_length = mst.length(&remaining);

        for neighbor in maze.neighbors(current.position.0, current.position.1) {
            let state = (neighbor, Rc::clone(&remaining));
            if best_g
                .get(&state)
                .is_some_and(|&g| g <= tentative_g_cost)
            {
                continue;
            }
            best_g.insert(state, tentative_g_cost);

            sequence += 1;
            open_list.insert(OpenNode {
                f_cost: tentative_g_cost + mst_length + nearest_distance(neighbor, &remaining),
                g_cost: tentative_g_cost,
                position: neighbor,
                sequence,
                index: arena.push(neighbor, Some(current.index)),
                remaining: Rc::clone(&remaining),
            });
            stats.generated_nodes += 1;
        }
    }

    stats.mst_computations = mst.len();
    debug!("cannot find solution");
    Path::new()
}
