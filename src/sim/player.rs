//! The player entity: buffered turning, wall sliding and screen wrap

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::{get_valid_position, is_valid_position};
use super::maze::{Maze, PelletPickup};
use crate::config::GameConfig;
use crate::consts::*;
use crate::pixel_to_grid;

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in screen space (y grows downward)
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::None => Vec2::ZERO,
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    /// Facing angle in radians; `None` faces right
    pub fn rotation(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Direction::Up => -FRAC_PI_2,
            Direction::Down => FRAC_PI_2,
            Direction::Left => PI,
            Direction::Right | Direction::None => 0.0,
        }
    }
}

/// The player-controlled chomper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    position: Vec2,
    direction: Direction,
    next_direction: Direction,
    /// Pixels per tick
    speed: f32,
    radius: f32,
    /// Mouth phase in [0, 4)
    animation_frame: f32,
    alive: bool,
    invulnerable: bool,
    /// Seconds left
    invulnerability_time: f32,
    /// Seconds granted by `respawn`
    respawn_grace: f32,
}

impl Player {
    pub fn new(position: Vec2, speed: f32, radius: f32) -> Self {
        Self {
            position,
            direction: Direction::None,
            next_direction: Direction::None,
            speed,
            radius,
            animation_frame: 0.0,
            alive: true,
            invulnerable: false,
            invulnerability_time: 0.0,
            respawn_grace: INVULNERABILITY_TIME,
        }
    }

    pub fn from_config(position: Vec2, config: &GameConfig) -> Self {
        let mut player = Self::new(position, config.player_speed, config.player_radius);
        player.respawn_grace = config.invulnerability_time;
        player
    }

    /// Advance one tick and return whatever pellet was picked up
    pub fn update(&mut self, dt: f32, maze: &mut Maze, config: &GameConfig) -> PelletPickup {
        if !self.alive {
            return PelletPickup::NONE;
        }

        if self.invulnerable {
            self.invulnerability_time -= dt;
            if self.invulnerability_time <= 0.0 {
                self.invulnerable = false;
                self.invulnerability_time = 0.0;
            }
        }

        self.try_change_direction(maze, config.grid_size);
        self.step(maze, config);

        self.animation_frame += PLAYER_ANIMATION_SPEED * dt;
        if self.animation_frame >= 4.0 {
            self.animation_frame = 0.0;
        }

        let cell = self.grid_position(config.grid_size);
        maze.collect_pellet(cell.x, cell.y)
    }

    /// Commit the buffered turn once the step it implies is clear
    fn try_change_direction(&mut self, maze: &Maze, cell_size: f32) {
        if self.next_direction == Direction::None {
            return;
        }
        let probe = self.next_position(self.next_direction);
        if is_valid_position(probe, self.radius, maze.grid(), cell_size) {
            self.direction = self.next_direction;
            self.next_direction = Direction::None;
        }
    }

    fn step(&mut self, maze: &Maze, config: &GameConfig) {
        if self.direction == Direction::None {
            return;
        }

        let target = self.next_position(self.direction);
        let resolved = get_valid_position(
            self.position,
            target,
            self.radius,
            maze.grid(),
            config.grid_size,
        );
        if resolved == self.position {
            self.direction = Direction::None;
        } else {
            self.position = resolved;
        }

        self.wrap(config.canvas_width, config.canvas_height);
    }

    fn wrap(&mut self, width: f32, height: f32) {
        let r = self.radius;
        if self.position.x < -r {
            self.position.x = width + r;
        } else if self.position.x > width + r {
            self.position.x = -r;
        }
        if self.position.y < -r {
            self.position.y = height + r;
        } else if self.position.y > height + r {
            self.position.y = -r;
        }
    }

    #[inline]
    fn next_position(&self, direction: Direction) -> Vec2 {
        self.position + direction.vector() * self.speed
    }

    /// Buffer a turn; it is taken as soon as it becomes possible
    pub fn set_next_direction(&mut self, direction: Direction) {
        self.next_direction = direction;
    }

    /// Place the player, clear movement and grant temporary invulnerability
    pub fn respawn(&mut self, position: Vec2) {
        self.position = position;
        self.direction = Direction::None;
        self.next_direction = Direction::None;
        self.alive = true;
        self.invulnerable = true;
        self.invulnerability_time = self.respawn_grace;
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn grid_position(&self, cell_size: f32) -> IVec2 {
        pixel_to_grid(self.position, cell_size)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn animation_frame(&self) -> f32 {
        self.animation_frame
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn rotation(&self) -> f32 {
        self.direction.rotation()
    }
}
