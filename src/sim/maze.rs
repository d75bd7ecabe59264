//! Maze grid and pellet state for one level
//!
//! The grid is parsed from an ASCII layout and never changes during a level.
//! Pellets live in two disjoint sets keyed by grid coordinate and are removed
//! one at a time as the player collects them.

use std::collections::HashSet;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::random_element;
use super::pathfinding;
use crate::config::MazeLayout;
use crate::error::Result;

/// Kind of a single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open,
}

/// Fixed-size grid of cells, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl MazeGrid {
    /// Grid of the given size with every cell set to `cell`
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Cell at (x, y), or None outside the grid
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Overwrite an in-bounds cell; out-of-bounds writes are ignored
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Walls and everything outside the grid block movement
    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_none_or(|cell| cell == Cell::Wall)
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Coordinates of every wall cell
    pub fn walls(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Cell::Wall)
                .map(move |(x, _)| IVec2::new(x as i32, y as i32))
        })
    }
}

/// Outcome of a pellet collection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PelletPickup {
    pub collected: bool,
    pub is_power_pellet: bool,
}

impl PelletPickup {
    pub const NONE: Self = Self {
        collected: false,
        is_power_pellet: false,
    };
}

/// Walls and pellets for the current level
#[derive(Debug, Clone)]
pub struct Maze {
    layout: MazeLayout,
    grid: MazeGrid,
    pellets: HashSet<IVec2>,
    power_pellets: HashSet<IVec2>,
}

impl Maze {
    /// Build from a layout. Unknown characters become open floor.
    pub fn new(layout: MazeLayout) -> Self {
        let mut maze = Self {
            grid: MazeGrid::filled(layout.width, layout.height, Cell::Wall),
            layout,
            pellets: HashSet::new(),
            power_pellets: HashSet::new(),
        };
        maze.generate();
        maze
    }

    /// Build from a layout, rejecting unknown characters and empty layouts
    pub fn try_new(layout: MazeLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self::new(layout))
    }

    /// The shipped layout
    pub fn classic() -> Self {
        Self::new(MazeLayout::classic())
    }

    fn generate(&mut self) {
        let mut grid = MazeGrid::filled(self.layout.width, self.layout.height, Cell::Wall);
        for (x, y, ch) in self.layout.cells() {
            let (x, y) = (x as i32, y as i32);
            match ch {
                '#' => grid.set(x, y, Cell::Wall),
                '.' => {
                    grid.set(x, y, Cell::Open);
                    self.pellets.insert(IVec2::new(x, y));
                }
                'o' => {
                    grid.set(x, y, Cell::Open);
                    self.power_pellets.insert(IVec2::new(x, y));
                }
                _ => grid.set(x, y, Cell::Open),
            }
        }
        self.grid = grid;
        log::debug!(
            "Maze generated: {}x{}, {} pellets, {} power pellets",
            self.grid.width(),
            self.grid.height(),
            self.pellets.len(),
            self.power_pellets.len()
        );
    }

    /// Raw grid for rendering and collision
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// True for wall cells and anything outside the grid
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.grid.is_wall(x, y)
    }

    pub fn has_pellet(&self, x: i32, y: i32) -> bool {
        self.pellets.contains(&IVec2::new(x, y))
    }

    pub fn has_power_pellet(&self, x: i32, y: i32) -> bool {
        self.power_pellets.contains(&IVec2::new(x, y))
    }

    /// Remove whatever pellet sits at (x, y). Power pellets are checked first.
    pub fn collect_pellet(&mut self, x: i32, y: i32) -> PelletPickup {
        let key = IVec2::new(x, y);
        if self.power_pellets.remove(&key) {
            return PelletPickup {
                collected: true,
                is_power_pellet: true,
            };
        }
        if self.pellets.remove(&key) {
            return PelletPickup {
                collected: true,
                is_power_pellet: false,
            };
        }
        PelletPickup::NONE
    }

    /// Regular pellet coordinates, in no particular order
    pub fn pellet_positions(&self) -> Vec<IVec2> {
        self.pellets.iter().copied().collect()
    }

    /// Power pellet coordinates, in no particular order
    pub fn power_pellet_positions(&self) -> Vec<IVec2> {
        self.power_pellets.iter().copied().collect()
    }

    pub fn remaining_pellets(&self) -> usize {
        self.pellets.len() + self.power_pellets.len()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_pellets() == 0
    }

    /// Restore the grid and every pellet from the layout
    pub fn reset(&mut self) {
        self.pellets.clear();
        self.power_pellets.clear();
        self.generate();
    }

    /// Every in-grid cell that is not a wall
    pub fn valid_spawn_positions(&self) -> Vec<IVec2> {
        let mut positions = Vec::new();
        for y in 0..self.grid.height() as i32 {
            for x in 0..self.grid.width() as i32 {
                if !self.is_wall(x, y) {
                    positions.push(IVec2::new(x, y));
                }
            }
        }
        positions
    }

    /// A random open cell (None if the maze has no open cells)
    pub fn random_spawn_position(&self, rng: &mut impl Rng) -> Option<IVec2> {
        random_element(rng, &self.valid_spawn_positions()).copied()
    }

    /// Shortest 4-connected path from `start` to `end`, excluding `start`.
    /// Empty when unreachable or when `start == end`.
    pub fn find_path(&self, start: IVec2, end: IVec2) -> Vec<IVec2> {
        pathfinding::find_path(&self.grid, start, end)
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self::classic()
    }
}
