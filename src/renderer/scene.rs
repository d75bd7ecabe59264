//! Per-frame draw lists built from the game state

use glam::Vec2;

use super::{blink_visible, mouth_angle, power_pellet_pulse};
use crate::consts::{PELLET_RADIUS, POWER_PELLET_RADIUS};
use crate::grid_to_pixel;
use crate::settings::Settings;
use crate::sim::{Circle, GamePhase, GameState, Rect};

/// The player as drawn: a wedge-cut circle facing `rotation`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSprite {
    pub center: Vec2,
    pub radius: f32,
    pub rotation: f32,
    /// Half-angle of the mouth opening (radians)
    pub mouth: f32,
}

/// Everything drawn on the canvas for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub walls: Vec<Rect>,
    pub pellets: Vec<Circle>,
    pub power_pellets: Vec<Circle>,
    pub player: Option<PlayerSprite>,
}

/// Build the frame for `state` at `time_ms` (wall clock, for pulsing and blinking)
pub fn build_scene(state: &GameState, settings: &Settings, time_ms: f64) -> Scene {
    let cell = state.config.grid_size;

    let walls = state
        .maze
        .grid()
        .walls()
        .map(|pos| Rect::from_cell(pos.x, pos.y, cell))
        .collect();

    let mut pellet_cells = state.maze.pellet_positions();
    pellet_cells.sort_by_key(|p| (p.y, p.x));
    let pellets = pellet_cells
        .into_iter()
        .map(|pos| Circle::new(grid_to_pixel(pos, cell), PELLET_RADIUS))
        .collect();

    let pulse = if settings.effective_pellet_pulse() {
        power_pellet_pulse(time_ms)
    } else {
        1.0
    };
    let mut power_cells = state.maze.power_pellet_positions();
    power_cells.sort_by_key(|p| (p.y, p.x));
    let power_pellets = power_cells
        .into_iter()
        .map(|pos| Circle::new(grid_to_pixel(pos, cell), POWER_PELLET_RADIUS * pulse))
        .collect();

    Scene {
        walls,
        pellets,
        power_pellets,
        player: player_sprite(state, settings, time_ms),
    }
}

fn player_sprite(state: &GameState, settings: &Settings, time_ms: f64) -> Option<PlayerSprite> {
    let player = &state.player;
    let shown = matches!(state.phase(), GamePhase::Playing | GamePhase::Paused);
    if !shown || !player.is_alive() {
        return None;
    }
    if player.is_invulnerable() && settings.effective_blink() && !blink_visible(time_ms) {
        return None;
    }
    Some(PlayerSprite {
        center: player.position(),
        radius: player.radius(),
        rotation: player.rotation(),
        mouth: mouth_angle(player.animation_frame()),
    })
}
