use anyhow::{bail, Context, Result};
use std::fs;

use crate::common::Cell;

/// Read-only view of a maze as the searches see it.
///
/// `neighbors` must only return cells that can be stepped onto; the searches
/// never re-check walls or bounds.
pub trait Grid {
    fn start(&self) -> Cell;
    fn waypoints(&self) -> &[Cell];
    fn neighbors(&self, row: usize, col: usize) -> Vec<Cell>;
}

#[derive(Debug, Clone)]
pub struct Tile {
    passable: bool,
    pub neighbors: Vec<Cell>, // Stores coordinates of accessible neighbors
}

impl Tile {
    pub fn is_passable(&self) -> bool {
        self.passable
    }
}

#[derive(Debug, Clone)]
pub struct Maze {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Tile>>,
    start: Cell,
    waypoints: Vec<Cell>,
}

impl Maze {
    pub const WALL: char = '%';
    pub const START: char = 'P';
    pub const WAYPOINT: char = '.';
    pub const OPEN: char = ' ';

    pub fn from_file(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read maze {path}"))?;
        Self::parse(&content).with_context(|| format!("failed to parse maze {path}"))
    }

    /// Parses the textual maze layout: `%` wall, `P` start, `.` waypoint,
    /// space open floor. Trailing blank lines are ignored.
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines: Vec<&str> = content.lines().map(|l| l.trim_end_matches('\r')).collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            bail!("maze is empty");
        }

        let height = lines.len();
        let width = lines[0].chars().count();
        let mut start = None;
        let mut waypoints = Vec::new();
        let mut grid = Vec::with_capacity(height);

        for (row, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != width {
                bail!(
                    "row {row} has width {}, expected {width}",
                    chars.len()
                );
            }

            let mut tiles_row = Vec::with_capacity(width);
            for (col, ch) in chars.into_iter().enumerate() {
                match ch {
                    Self::WALL => {}
                    Self::OPEN => {}
                    Self::WAYPOINT => waypoints.push((row, col)),
                    Self::START => {
                        if let Some(previous) = start.replace((row, col)) {
                            bail!("multiple start cells: {previous:?} and {:?}", (row, col));
                        }
                    }
                    other => bail!("unexpected character {other:?} at {:?}", (row, col)),
                }
                tiles_row.push(Tile {
                    passable: ch != Self::WALL,
                    neighbors: Vec::new(),
                });
            }
            grid.push(tiles_row);
        }

        let Some(start) = start else {
            bail!("maze has no start cell");
        };

        let mut maze = Maze {
            height,
            width,
            grid,
            start,
            waypoints,
        };
        maze.initialize_neighbors();
        Ok(maze)
    }

    fn initialize_neighbors(&mut self) {
        for x in 0..self.height {
            for y in 0..self.width {
                if self.grid[x][y].passable {
                    self.grid[x][y].neighbors = self.get_neighbors(x, y);
                }
            }
        }
    }

    pub fn get_neighbors(&self, x: usize, y: usize) -> Vec<Cell> {
        let directions = [(-1, 0), (1, 0), (0, -1), (0, 1)]; // Up, down, left, right
        let mut neighbors = Vec::new();

        for &(dx, dy) in &directions {
            let new_x = x as i64 + dx;
            let new_y = y as i64 + dy;
            if new_x >= 0
                && new_y >= 0
                && new_x < self.height as i64
                && new_y < self.width as i64
                && self.grid[new_x as usize][new_y as usize].passable
            {
                neighbors.push((new_x as usize, new_y as usize));
            }
        }

        neighbors
    }

    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        x < self.height && y < self.width && self.grid[x][y].is_passable()
    }

    /// Copy of this maze with a different waypoint list, used to run
    /// single-target searches against one waypoint of a multi-target maze.
    pub fn with_waypoints(&self, waypoints: Vec<Cell>) -> Self {
        Maze {
            waypoints,
            ..self.clone()
        }
    }
}

impl Grid for Maze {
    fn start(&self) -> Cell {
        self.start
    }

    fn waypoints(&self) -> &[Cell] {
        &self.waypoints
    }

    fn neighbors(&self, row: usize, col: usize) -> Vec<Cell> {
        if !self.is_passable(row, col) {
            return Vec::new();
        }
        self.grid[row][col].neighbors.clone()
    }
}
