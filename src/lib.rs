//! Maze Chomp - A Pacman-style maze game for the browser
//!
//! Core modules:
//! - `sim`: Maze, pathfinding, collision, player movement and game phases
//! - `renderer`: Canvas 2D drawing and overlay text
//! - `input`: Keyboard/touch mapping into per-tick input
//! - `frame`: Fixed-timestep stepping and FPS tracking
//! - `platform`: Browser/native platform abstraction (storage)
//! - `config`: Data-driven game tuning and the maze layout
//! - `tictactoe`: Board logic for the page's tic-tac-toe widget

pub mod config;
pub mod error;
pub mod frame;
pub mod highscore;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tictactoe;

pub use config::{GameConfig, MazeLayout};
pub use error::{GameError, Result};
pub use highscore::HighScore;
pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Logical canvas size (pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const FPS: u32 = 60;
    pub const SIM_DT: f32 = 1.0 / FPS as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Size of one maze cell in pixels
    pub const GRID_SIZE: f32 = 20.0;
    /// Maze dimensions in cells
    pub const MAZE_WIDTH: usize = 40;
    pub const MAZE_HEIGHT: usize = 30;

    /// Player defaults (speed is pixels per tick)
    pub const PLAYER_SPEED: f32 = 2.0;
    pub const PLAYER_RADIUS: f32 = 8.0;
    /// Mouth animation phases per second
    pub const PLAYER_ANIMATION_SPEED: f32 = 3.0;
    /// Seconds of invulnerability after a respawn
    pub const INVULNERABILITY_TIME: f32 = 2.0;

    /// Pellet draw sizes
    pub const PELLET_RADIUS: f32 = 2.0;
    pub const POWER_PELLET_RADIUS: f32 = 8.0;

    /// Scoring
    pub const PELLET_POINTS: u64 = 10;
    pub const POWER_PELLET_POINTS: u64 = 50;

    pub const STARTING_LIVES: u32 = 3;

    /// Seconds before Ready auto-starts play
    pub const READY_DELAY: f32 = 3.0;
    /// Seconds before LevelComplete auto-advances
    pub const LEVEL_COMPLETE_DELAY: f32 = 2.0;
}

/// Palette used by the canvas renderer
pub mod colors {
    pub const BACKGROUND: &str = "#000000";
    pub const WALL: &str = "#0066cc";
    pub const WALL_STROKE: &str = "#0088ff";
    pub const PELLET: &str = "#ffff88";
    pub const POWER_PELLET: &str = "#ffff00";
    pub const PLAYER: &str = "#ffff00";
    pub const PLAYER_OUTLINE: &str = "#ffaa00";
    pub const TEXT: &str = "#ffffff";
}

/// Grid cell to the pixel position of its center
#[inline]
pub fn grid_to_pixel(cell: IVec2, grid_size: f32) -> Vec2 {
    Vec2::new(
        cell.x as f32 * grid_size + grid_size / 2.0,
        cell.y as f32 * grid_size + grid_size / 2.0,
    )
}

/// Pixel position to the grid cell containing it
#[inline]
pub fn pixel_to_grid(pos: Vec2, grid_size: f32) -> IVec2 {
    IVec2::new(
        (pos.x / grid_size).floor() as i32,
        (pos.y / grid_size).floor() as i32,
    )
}
