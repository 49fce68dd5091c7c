use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use crate::common::Cell;

pub fn manhattan(from: Cell, to: Cell) -> usize {
    from.0.abs_diff(to.0) + from.1.abs_diff(to.1)
}

/// Distance from `from` to the closest of `targets`, 0 when there are none.
pub(crate) fn nearest_distance(from: Cell, targets: &[Cell]) -> usize {
    targets
        .iter()
        .map(|&target| manhattan(from, target))
        .min()
        .unwrap_or(0)
}

/// How the raw spanning-tree length is turned into a heuristic value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MstScaling {
    /// Plain MST length. Admissible, so multi-target A* stays optimal.
    #[default]
    Exact,
    /// Divide the length by `divisor` once it exceeds `threshold`, truncating
    /// to an integer. Not admissible: trades path optimality for fewer
    /// expansions on mazes with many far-apart waypoints.
    Damped { threshold: usize, divisor: f64 },
}

impl MstScaling {
    /// The legacy "divide by 1.5 above 100" setting.
    pub const LEGACY: MstScaling = MstScaling::Damped {
        threshold: 100,
        divisor: 1.5,
    };

    pub fn apply(self, length: usize) -> usize {
        match self {
            MstScaling::Exact => length,
            MstScaling::Damped { threshold, divisor } => {
                if length > threshold {
                    (length as f64 / divisor).floor() as usize
                } else {
                    length
                }
            }
        }
    }
}

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Returns false when `x` and `y` were already connected.
    fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return false;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            Ordering::Less => self.parent[root_x] = root_y,
            Ordering::Greater => self.parent[root_y] = root_x,
            Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
        true
    }
}

/// Total Manhattan length of a minimum spanning tree over `cells`, built with
/// Kruskal's algorithm on the complete graph.
pub fn mst_length(cells: &[Cell]) -> usize {
    if cells.len() < 2 {
        return 0;
    }

    let mut edges = Vec::with_capacity(cells.len() * (cells.len() - 1) / 2);
    for i in 0..cells.len() {
        for j in (i + 1)..cells.len() {
            edges.push((manhattan(cells[i], cells[j]), i, j));
        }
    }
    // Weight first, then endpoint indices, so equal weights resolve the same
    // way on every run.
    edges.sort_unstable();

    let mut components = UnionFind::new(cells.len());
    let mut accepted = 0;
    let mut length = 0;
    for (weight, i, j) in edges {
        if components.union(i, j) {
            length += weight;
            accepted += 1;
            if accepted == cells.len() - 1 {
                break;
            }
        }
    }
    length
}

/// MST lengths keyed by the sorted set of remaining waypoints. Lives for one
/// search call.
pub(crate) struct MstCache {
    scaling: MstScaling,
    lengths: HashMap<Rc<[Cell]>, usize>,
}

impl MstCache {
    pub(crate) fn new(scaling: MstScaling) -> Self {
        Self {
            scaling,
            lengths: HashMap::new(),
        }
    }

    /// `remaining` must already be in canonical (sorted) order.
    pub(crate) fn length(&mut self, remaining: &Rc<[Cell]>) -> usize {
        if let Some(&length) = self.lengths.get(remaining) {
            return length;
        }
        let length = self.scaling.apply(mst_length(remaining));
        self.lengths.insert(Rc::clone(remaining), length);
        length
    }

    pub(crate) fn len(&self) -> usize {
        self.lengths.len()
    }
}
