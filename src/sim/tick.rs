//! Fixed timestep simulation tick
//!
//! Advances phases, timers and the player by one step.

use serde::{Deserialize, Serialize};

use super::phase::GamePhase;
use super::player::Direction;
use super::state::{GameEvent, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Direction to buffer on the player, if any
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
    /// Start / continue
    pub start: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Pause wins when it applies; otherwise the same press may act as start
    let toggled = input.pause && toggle_pause(state);
    if input.start && !toggled {
        handle_start(state);
    }

    match state.phase() {
        GamePhase::Loading => {
            state.transition(GamePhase::Menu);
        }
        GamePhase::Ready => {
            state.phase_elapsed += dt;
            if state.auto_start && state.phase_elapsed >= state.config.ready_delay {
                state.transition(GamePhase::Playing);
            }
        }
        GamePhase::LevelComplete => {
            state.phase_elapsed += dt;
            if state.phase_elapsed >= state.config.level_complete_delay {
                next_level(state);
            }
        }
        GamePhase::Playing => {
            state.phase_elapsed += dt;
            step_playing(state, input, dt);
        }
        GamePhase::Menu | GamePhase::Paused | GamePhase::GameOver | GamePhase::Victory => {}
    }
}

/// Playing <-> Paused; false if the current phase has no pause
fn toggle_pause(state: &mut GameState) -> bool {
    match state.phase() {
        GamePhase::Playing => state.transition(GamePhase::Paused),
        GamePhase::Paused => state.transition(GamePhase::Playing),
        _ => false,
    }
}

fn handle_start(state: &mut GameState) {
    match state.phase() {
        GamePhase::Menu | GamePhase::GameOver => start_new_game(state),
        GamePhase::Ready => {
            state.transition(GamePhase::Playing);
        }
        GamePhase::LevelComplete => next_level(state),
        GamePhase::Victory => {
            state.transition(GamePhase::Menu);
        }
        _ => {}
    }
}

fn step_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(direction) = input.direction {
        state.player.set_next_direction(direction);
    }

    let pickup = state.player.update(dt, &mut state.maze, &state.config);
    if pickup.collected {
        let points = if pickup.is_power_pellet {
            state.config.power_pellet_points
        } else {
            state.config.pellet_points
        };
        let cell = state.player.grid_position(state.config.grid_size);
        state.award(points);
        state.push_event(GameEvent::PelletCollected {
            cell,
            power: pickup.is_power_pellet,
            points,
        });
        state.sync_pellet_counts(false);
    }

    if state.maze.is_complete() {
        let level = state.data.level;
        log::info!("Level {} complete, score {}", level, state.data.score);
        if state.transition(GamePhase::LevelComplete) {
            state.push_event(GameEvent::LevelCleared(level));
        }
    }
}

/// Reset score, lives and maze, then wait in Ready
pub fn start_new_game(state: &mut GameState) {
    state.data.reset_game(state.config.starting_lives);
    state.maze.reset();
    state.respawn_player();
    state.sync_pellet_counts(true);
    log::info!("New game, {} pellets", state.data.total_pellets);
    state.transition(GamePhase::Ready);
}

/// Advance from LevelComplete: Victory after the last level, otherwise a fresh maze
pub fn next_level(state: &mut GameState) {
    if state
        .config
        .max_level
        .is_some_and(|max| state.data.level >= max)
    {
        state.transition(GamePhase::Victory);
        return;
    }

    state.data.next_level();
    state.data.reset_level();
    state.maze.reset();
    state.respawn_player();
    state.sync_pellet_counts(true);
    log::debug!("Level {} with {} pellets", state.data.level, state.data.total_pellets);
    state.transition(GamePhase::Ready);
}
