use anyhow::{bail, Result};
use std::collections::HashSet;

use crate::map::Grid;

/// Grid position as `(row, col)`.
pub type Cell = (usize, usize);

/// Cells from the start to the terminal cell, both inclusive. Empty means no
/// solution was found.
pub type Path = Vec<Cell>;

/// Checks that `path` starts at the maze start, only moves between
/// neighboring cells, and touches every waypoint.
pub fn validate_path<G: Grid + ?Sized>(maze: &G, path: &[Cell]) -> Result<()> {
    let Some(&first) = path.first() else {
        bail!("path is empty");
    };
    if first != maze.start() {
        bail!("path starts at {first:?}, expected {:?}", maze.start());
    }

    for (step, window) in path.windows(2).enumerate() {
        let (from, to) = (window[0], window[1]);
        if !maze.neighbors(from.0, from.1).contains(&to) {
            bail!("step {step}: {to:?} is not a neighbor of {from:?}");
        }
    }

    let visited: HashSet<Cell> = path.iter().copied().collect();
    let missing: Vec<Cell> = maze
        .waypoints()
        .iter()
        .filter(|&waypoint| !visited.contains(waypoint))
        .copied()
        .collect();
    if !missing.is_empty() {
        bail!("path misses waypoints {missing:?}");
    }

    Ok(())
}
