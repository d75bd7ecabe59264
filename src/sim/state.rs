//! Game state and core simulation types
//!
//! Everything the tick mutates lives in `GameState`. The front end only
//! reads it for drawing and drains the event queue once per frame.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::{DEFAULT_SEARCH_RADIUS, get_closest_valid_position};
use super::maze::Maze;
use super::phase::{GamePhase, PhaseChange, PhaseMachine};
use super::player::Player;
use crate::config::GameConfig;
use crate::error::Result;

/// Score, progress and pellet counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameData {
    pub score: u64,
    /// Starts at 1
    pub level: u32,
    pub lives: u32,
    pub high_score: u64,
    pub pellets_remaining: usize,
    pub total_pellets: usize,
}

impl GameData {
    pub fn new(starting_lives: u32, high_score: u64) -> Self {
        Self {
            score: 0,
            level: 1,
            lives: starting_lives,
            high_score,
            pellets_remaining: 0,
            total_pellets: 0,
        }
    }

    /// Add points; returns true if this raised the high score
    pub fn add_score(&mut self, points: u64) -> bool {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            return true;
        }
        false
    }

    pub fn set_score(&mut self, score: u64) {
        self.score = score;
    }

    /// Clamped to at least 1
    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    pub fn next_level(&mut self) {
        self.level += 1;
    }

    /// Remove a life (never below zero); returns true while lives remain
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives > 0
    }

    pub fn gain_life(&mut self) {
        self.lives += 1;
    }

    pub fn set_pellet_count(&mut self, remaining: usize, total: usize) {
        self.pellets_remaining = remaining;
        self.total_pellets = total;
    }

    /// Fresh run; the high score is kept
    pub fn reset_game(&mut self, starting_lives: u32) {
        self.score = 0;
        self.level = 1;
        self.lives = starting_lives;
        self.set_pellet_count(0, 0);
    }

    /// Fresh level; score, level and lives are kept
    pub fn reset_level(&mut self) {
        self.set_pellet_count(0, 0);
    }

    /// True when the current score is the high score and nonzero
    pub fn is_high_score(&self) -> bool {
        self.score > 0 && self.score == self.high_score
    }
}

/// Notifications produced by the simulation for the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PelletCollected { cell: IVec2, power: bool, points: u64 },
    /// Carries the new high score
    NewHighScore(u64),
    /// Carries the level that was just cleared
    LevelCleared(u32),
    PhaseChanged(PhaseChange),
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub maze: Maze,
    pub player: Player,
    pub phases: PhaseMachine,
    pub data: GameData,
    /// Seconds spent in the current phase
    pub phase_elapsed: f32,
    /// Leave Ready on its own after `ready_delay`
    pub auto_start: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build a game in the Loading phase. The maze is parsed permissively.
    pub fn new(config: GameConfig, high_score: u64) -> Self {
        let maze = Maze::new(config.layout.clone());
        Self::assemble(config, maze, high_score)
    }

    /// Like `new`, but rejects invalid tuning and unknown maze characters
    pub fn try_new(config: GameConfig, high_score: u64) -> Result<Self> {
        config.validate()?;
        let maze = Maze::try_new(config.layout.clone())?;
        Ok(Self::assemble(config, maze, high_score))
    }

    fn assemble(config: GameConfig, maze: Maze, high_score: u64) -> Self {
        let mut state = Self {
            player: Player::from_config(Vec2::ZERO, &config),
            data: GameData::new(config.starting_lives, high_score),
            config,
            maze,
            phases: PhaseMachine::new(),
            phase_elapsed: 0.0,
            auto_start: true,
            time_ticks: 0,
            events: Vec::new(),
        };
        let spawn = state.spawn_position();
        state.player.set_position(spawn);
        state.sync_pellet_counts(true);
        state
    }

    pub fn phase(&self) -> GamePhase {
        self.phases.current()
    }

    /// Canvas center, nudged to the nearest spot clear of walls
    pub fn spawn_position(&self) -> Vec2 {
        let center = Vec2::new(self.config.canvas_width / 2.0, self.config.canvas_height / 2.0);
        get_closest_valid_position(
            center,
            self.config.player_radius,
            self.maze.grid(),
            self.config.grid_size,
            DEFAULT_SEARCH_RADIUS,
        )
    }

    /// Copy the maze's pellet count into the game data
    pub(crate) fn sync_pellet_counts(&mut self, reset_total: bool) {
        let remaining = self.maze.remaining_pellets();
        let total = if reset_total {
            remaining
        } else {
            self.data.total_pellets
        };
        self.data.set_pellet_count(remaining, total);
    }

    /// Attempt a phase change; rejected transitions are logged and ignored
    pub(crate) fn transition(&mut self, to: GamePhase) -> bool {
        match self.phases.change(to) {
            Ok(change) => {
                self.phase_elapsed = 0.0;
                self.events.push(GameEvent::PhaseChanged(change));
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Add points and queue a high-score event if one was set
    pub(crate) fn award(&mut self, points: u64) {
        if self.data.add_score(points) {
            self.events.push(GameEvent::NewHighScore(self.data.high_score));
        }
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Put the player back at the spawn point
    pub fn respawn_player(&mut self) {
        let spawn = self.spawn_position();
        self.player.respawn(spawn);
    }

    /// The player was caught: respawn while lives remain, otherwise end the run
    pub fn lose_life(&mut self) {
        self.player.kill();
        if self.data.lose_life() {
            log::info!("Life lost, {} remaining", self.data.lives);
            self.respawn_player();
        } else {
            log::info!("Game over with score {}", self.data.score);
            self.transition(GamePhase::GameOver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::is_valid_position;

    #[test]
    fn test_game_data_scoring() {
        let mut data = GameData::new(3, 20);
        assert!(!data.add_score(10));
        assert!(!data.add_score(10));
        assert!(data.add_score(10));
        assert_eq!(data.high_score, 30);
        assert!(data.is_high_score());

        data.reset_game(3);
        assert_eq!(data.score, 0);
        assert_eq!(data.level, 1);
        assert_eq!(data.high_score, 30);
        assert!(!data.is_high_score());
    }

    #[test]
    fn test_game_data_lives_and_levels() {
        let mut data = GameData::new(2, 0);
        assert!(data.lose_life());
        assert!(!data.lose_life());
        assert!(!data.lose_life());
        assert_eq!(data.lives, 0);
        data.gain_life();
        assert_eq!(data.lives, 1);

        data.set_level(0);
        assert_eq!(data.level, 1);
        data.next_level();
        assert_eq!(data.level, 2);

        data.set_pellet_count(5, 10);
        data.reset_level();
        assert_eq!((data.pellets_remaining, data.total_pellets), (0, 0));
        assert_eq!(data.level, 2);
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(GameConfig::default(), 120);
        assert_eq!(state.phase(), GamePhase::Loading);
        assert_eq!(state.data.high_score, 120);
        assert_eq!(state.data.total_pellets, state.maze.remaining_pellets());
        assert_eq!(state.data.pellets_remaining, state.data.total_pellets);
        assert!(state.data.total_pellets > 0);
    }

    #[test]
    fn test_spawn_is_clear_of_walls() {
        let state = GameState::new(GameConfig::default(), 0);
        let spawn = state.player.position();
        assert!(is_valid_position(
            spawn,
            state.config.player_radius,
            state.maze.grid(),
            state.config.grid_size
        ));
        // The canvas center itself sits in a wall on the classic layout
        let center = Vec2::new(400.0, 300.0);
        assert!(!is_valid_position(center, 8.0, state.maze.grid(), 20.0));
        assert!(spawn.distance(center) <= DEFAULT_SEARCH_RADIUS as f32 + 0.01);
    }

    #[test]
    fn test_try_new_rejects_bad_config() {
        let config = GameConfig {
            player_speed: 0.0,
            ..Default::default()
        };
        assert!(GameState::try_new(config, 0).is_err());
        assert!(GameState::try_new(GameConfig::default(), 0).is_ok());
    }

    #[test]
    fn test_lose_life_until_game_over() {
        let mut state = GameState::new(GameConfig::default(), 0);
        state.phases.force(GamePhase::Playing);
        state.drain_events();

        for _ in 0..2 {
            state.lose_life();
            assert!(state.player.is_alive());
            assert!(state.player.is_invulnerable());
            assert_eq!(state.phase(), GamePhase::Playing);
        }
        state.lose_life();
        assert_eq!(state.data.lives, 0);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert!(!state.player.is_alive());

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PhaseChanged(PhaseChange {
            from: GamePhase::Playing,
            to: GamePhase::GameOver
        })));
        assert!(state.drain_events().is_empty());
    }
}
