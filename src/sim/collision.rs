//! Collision detection and response against the maze grid
//!
//! Entities are circles moving in pixel space; walls are whole grid cells.
//! Everything here is stateless: callers pass the grid and its cell size.

use glam::Vec2;

use super::geometry::{Circle, Rect, lerp};
use super::maze::{Cell, MazeGrid};
use crate::pixel_to_grid;

/// Default ring count for `get_closest_valid_position`
pub const DEFAULT_SEARCH_RADIUS: u32 = 50;
/// Default sampling interval for `has_line_of_sight` (pixels)
pub const DEFAULT_SIGHT_STEP: f32 = 5.0;
/// Angular step between samples on a search ring (degrees)
const SEARCH_ANGLE_STEP: usize = 15;

/// Check if a circle overlaps any wall cell around it
///
/// Only the 3x3 block of cells centered on the cell containing the circle's
/// center is examined. Cells outside the grid are skipped rather than treated
/// as walls. A circle without a positive radius never collides.
pub fn check_wall_collision(circle: &Circle, grid: &MazeGrid, cell_size: f32) -> bool {
    if circle.radius <= 0.0 {
        return false;
    }

    let cell = pixel_to_grid(circle.center, cell_size);
    for dx in -1..=1 {
        for dy in -1..=1 {
            let (x, y) = (cell.x + dx, cell.y + dy);
            if grid.get(x, y) != Some(Cell::Wall) {
                continue;
            }
            if circle.intersects_rect(&Rect::from_cell(x, y, cell_size)) {
                return true;
            }
        }
    }

    false
}

/// Check collision between two circular entities
#[inline]
pub fn check_circle_collision(a: &Circle, b: &Circle) -> bool {
    a.intersects_circle(b)
}

/// True if a circle at `pos` is clear of walls
#[inline]
pub fn is_valid_position(pos: Vec2, radius: f32, grid: &MazeGrid, cell_size: f32) -> bool {
    !check_wall_collision(&Circle::new(pos, radius), grid, cell_size)
}

/// Resolve a move from `current` toward `target`
///
/// Tries the full move, then horizontal only, then vertical only. If all are
/// blocked the entity stays where it is. The axis fallbacks give wall sliding.
pub fn get_valid_position(
    current: Vec2,
    target: Vec2,
    radius: f32,
    grid: &MazeGrid,
    cell_size: f32,
) -> Vec2 {
    let candidates = [
        target,
        Vec2::new(target.x, current.y),
        Vec2::new(current.x, target.y),
    ];
    candidates
        .into_iter()
        .find(|pos| is_valid_position(*pos, radius, grid, cell_size))
        .unwrap_or(current)
}

/// Find the valid position nearest to `target`
///
/// Searches rings of increasing radius (1 px apart) around `target`, sampling
/// every 15 degrees, and returns the closest valid sample on the first ring
/// that has one. Returns `target` unchanged if it is already valid or if no
/// valid sample exists within `search_radius` rings.
pub fn get_closest_valid_position(
    target: Vec2,
    radius: f32,
    grid: &MazeGrid,
    cell_size: f32,
    search_radius: u32,
) -> Vec2 {
    if is_valid_position(target, radius, grid, cell_size) {
        return target;
    }

    for ring in 1..=search_radius {
        let r = ring as f32;
        let best = (0..360)
            .step_by(SEARCH_ANGLE_STEP)
            .map(|deg| {
                let theta = (deg as f32).to_radians();
                target + Vec2::new(theta.cos(), theta.sin()) * r
            })
            .filter(|pos| is_valid_position(*pos, radius, grid, cell_size))
            .min_by(|a, b| {
                a.distance_squared(target)
                    .partial_cmp(&b.distance_squared(target))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        if let Some(pos) = best {
            return pos;
        }
    }

    target
}

/// Check for an unobstructed straight line between two points
///
/// Samples the segment every `step_size` pixels, endpoints included. Any
/// sample inside a wall cell or outside the grid blocks the line.
pub fn has_line_of_sight(
    start: Vec2,
    end: Vec2,
    grid: &MazeGrid,
    cell_size: f32,
    step_size: f32,
) -> bool {
    let distance = start.distance(end);
    let steps = if step_size > 0.0 {
        (distance / step_size).ceil() as u32
    } else {
        0
    };

    (0..=steps).all(|i| {
        let factor = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
        let sample = Vec2::new(lerp(start.x, end.x, factor), lerp(start.y, end.y, factor));
        let cell = pixel_to_grid(sample, cell_size);
        grid.get(cell.x, cell.y) == Some(Cell::Open)
    })
}
