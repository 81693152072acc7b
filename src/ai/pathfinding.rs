//! A* pathfinding on a ground-plane grid
//!
//! `NavGrid` is the stock implementation of [`NavigationService`]: a
//! walkability grid laid over the x/z plane, searched with A* and probed for
//! line-of-sight by sampling the segment between two points.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use super::navigation::{NavigationService, planar};

/// Cell coordinates (column, row) on the grid.
pub type Cell = (usize, usize);

/// A walkability grid over the ground plane.
#[derive(Debug, Clone)]
pub struct NavGrid {
    /// Width in cells (along x)
    pub width: usize,
    /// Depth in cells (along z)
    pub depth: usize,
    /// Cell size in world units
    pub cell_size: f32,
    /// World position of the grid's (0, 0) corner
    pub origin: Vec2,
    /// Walkable cells (true = walkable), row-major
    walkable: Vec<bool>,
}

impl NavGrid {
    /// Create a grid with every cell walkable.
    #[must_use]
    pub fn new(width: usize, depth: usize, cell_size: f32) -> Self {
        Self {
            width,
            depth,
            cell_size,
            origin: Vec2::ZERO,
            walkable: vec![true; width * depth],
        }
    }

    /// Build a grid from text rows, `#` marking a wall and anything else
    /// walkable. Row 0 is the lowest z.
    #[must_use]
    pub fn from_rows<S: AsRef<str>>(rows: &[S], cell_size: f32) -> Self {
        let depth = rows.len();
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);

        let mut grid = Self::new(width, depth, cell_size);
        for (z, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                if ch == '#' {
                    grid.set_walkable(x, z, false);
                }
            }
        }
        grid
    }

    /// Move the grid's corner to `origin`.
    #[must_use]
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Set a cell's walkability. Out-of-range cells are ignored.
    pub fn set_walkable(&mut self, x: usize, z: usize, walkable: bool) {
        if x < self.width && z < self.depth {
            self.walkable[z * self.width + x] = walkable;
        }
    }

    /// Check if a cell is walkable. Cells outside the grid are not.
    #[must_use]
    pub fn is_walkable(&self, x: usize, z: usize) -> bool {
        x < self.width && z < self.depth && self.walkable[z * self.width + x]
    }

    /// Cell containing a ground-plane point, if it lies on the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<Cell> {
        if !self.has_valid_cell_size() {
            return None;
        }
        let local = (point - self.origin) / self.cell_size;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let cell = (local.x.floor() as usize, local.y.floor() as usize);
        (cell.0 < self.width && cell.1 < self.depth).then_some(cell)
    }

    /// Whether the cell size is a positive finite number. Grids without one
    /// have no cells: nothing is reachable, visible, or free.
    #[must_use]
    pub fn has_valid_cell_size(&self) -> bool {
        self.cell_size.is_finite() && self.cell_size > 0.0
    }

    /// Ground-plane position of a cell's center.
    #[must_use]
    pub fn cell_center(&self, (x, z): Cell) -> Vec2 {
        self.origin + (Vec2::new(x as f32, z as f32) + 0.5) * self.cell_size
    }

    fn walkable_at(&self, point: Vec2) -> bool {
        self.cell_at(point)
            .is_some_and(|(x, z)| self.is_walkable(x, z))
    }

    /// Walkable 4-connected neighbours.
    fn neighbors(&self, (x, z): Cell) -> impl Iterator<Item = Cell> + '_ {
        let candidates = [
            x.checked_sub(1).map(|nx| (nx, z)),
            Some((x + 1, z)),
            z.checked_sub(1).map(|nz| (x, nz)),
            Some((x, z + 1)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(|&(nx, nz)| self.is_walkable(nx, nz))
    }

    /// Run A* between two ground-plane points.
    ///
    /// Returns the centers of every cell on the route, start cell included,
    /// or `None` when either end is off the grid, blocked, or disconnected.
    #[must_use]
    pub fn search(&self, start: Vec2, goal: Vec2) -> Option<Vec<Vec2>> {
        let start = self.cell_at(start).filter(|&c| self.is_walkable(c.0, c.1))?;
        let goal = self.cell_at(goal).filter(|&c| self.is_walkable(c.0, c.1))?;

        let heuristic = |(x, z): Cell| -> f32 { (x.abs_diff(goal.0) + z.abs_diff(goal.1)) as f32 };

        let mut open = BinaryHeap::new();
        let mut came_from: FxHashMap<Cell, Cell> = FxHashMap::default();
        let mut cost: FxHashMap<Cell, f32> = FxHashMap::default();

        cost.insert(start, 0.0);
        open.push(Reverse(Frontier {
            cell: start,
            g: 0.0,
            f: heuristic(start),
        }));

        while let Some(Reverse(Frontier { cell, g, .. })) = open.pop() {
            if cell == goal {
                return Some(self.reconstruct(&came_from, goal));
            }
            // Stale heap entry superseded by a cheaper route
            if cost.get(&cell).is_some_and(|&best| g > best) {
                continue;
            }

            for next in self.neighbors(cell) {
                let tentative = g + 1.0;
                if cost.get(&next).is_none_or(|&known| tentative < known) {
                    came_from.insert(next, cell);
                    cost.insert(next, tentative);
                    open.push(Reverse(Frontier {
                        cell: next,
                        g: tentative,
                        f: tentative + heuristic(next),
                    }));
                }
            }
        }

        None
    }

    fn reconstruct(&self, came_from: &FxHashMap<Cell, Cell>, goal: Cell) -> Vec<Vec2> {
        let mut cells = vec![goal];
        let mut current = goal;
        while let Some(&prev) = came_from.get(&current) {
            cells.push(prev);
            current = prev;
        }
        cells.reverse();
        cells.into_iter().map(|c| self.cell_center(c)).collect()
    }
}

impl NavigationService for NavGrid {
    fn find_path(&self, start: Vec3, target: Vec3) -> Option<Vec<Vec2>> {
        self.search(planar(start), planar(target))
            .filter(|path| !path.is_empty())
    }

    fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        if !self.has_valid_cell_size() {
            return false;
        }
        let (a, b) = (planar(from), planar(to));
        let step = self.cell_size * 0.25;
        let samples = (a.distance(b) / step).ceil().max(1.0) as usize;

        (0..=samples).all(|i| self.walkable_at(a.lerp(b, i as f32 / samples as f32)))
    }

    fn is_cell_occupied(&self, position: Vec3) -> bool {
        !self.walkable_at(planar(position))
    }
}

/// Open-set entry ordered by estimated total cost.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cell: Cell,
    g: f32,
    f: f32,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| other.g.total_cmp(&self.g))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
