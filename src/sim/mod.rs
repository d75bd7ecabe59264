//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only
//! - Randomness only through a caller-supplied RNG
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod maze;
pub mod pathfinding;
pub mod phase;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{
    check_circle_collision, check_wall_collision, get_closest_valid_position, get_valid_position,
    has_line_of_sight, is_valid_position,
};
pub use geometry::{Circle, Rect};
pub use maze::{Cell, Maze, MazeGrid, PelletPickup};
pub use pathfinding::{find_path, manhattan};
pub use phase::{GamePhase, PhaseChange, PhaseDebugInfo, PhaseMachine, SubscriptionId};
pub use player::{Direction, Player};
pub use state::{GameData, GameEvent, GameState};
pub use tick::{TickInput, next_level, start_new_game, tick};
