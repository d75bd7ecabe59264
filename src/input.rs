//! Keyboard, swipe and on-screen button input
//!
//! DOM listeners in `main.rs` forward raw events here; the game loop takes
//! one `TickInput` per frame.

use std::collections::HashSet;

use glam::Vec2;

use crate::settings::DEFAULT_SWIPE_MIN_DISTANCE;
use crate::sim::{Direction, TickInput};

/// Document events whose browser default (scrolling, pull-to-refresh, the
/// long-press menu) is cancelled. Registered non-passive so `preventDefault`
/// takes effect.
pub const SUPPRESSED_DEFAULT_EVENTS: [&str; 2] = ["touchmove", "contextmenu"];

/// Something a key can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Move(Direction),
    Pause,
    Start,
}

/// Actions bound to a `KeyboardEvent.code`. Space is bound to both pause and
/// start; the tick decides which applies.
pub fn actions_for_key(code: &str) -> &'static [InputAction] {
    match code {
        "ArrowUp" | "KeyW" => &[InputAction::Move(Direction::Up)],
        "ArrowDown" | "KeyS" => &[InputAction::Move(Direction::Down)],
        "ArrowLeft" | "KeyA" => &[InputAction::Move(Direction::Left)],
        "ArrowRight" | "KeyD" => &[InputAction::Move(Direction::Right)],
        "Space" => &[InputAction::Pause, InputAction::Start],
        "KeyP" => &[InputAction::Pause],
        "Enter" => &[InputAction::Start],
        _ => &[],
    }
}

/// True for keys whose browser default should be suppressed
pub fn is_game_key(code: &str) -> bool {
    !actions_for_key(code).is_empty()
}

/// Map a `data-direction` attribute value to a direction
pub fn parse_direction(name: &str) -> Option<Direction> {
    match name {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}

/// Dominant-axis swipe direction, or None if shorter than `min_distance`
pub fn swipe_direction(start: Vec2, end: Vec2, min_distance: f32) -> Option<Direction> {
    let delta = end - start;
    if delta.length() < min_distance {
        return None;
    }
    let dir = if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(dir)
}

/// Which directions are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    fn set(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Up => self.up = pressed,
            Direction::Down => self.down = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
            Direction::None => {}
        }
    }

    /// Up, then down, then left, then right
    pub fn current(&self) -> Direction {
        if self.up {
            Direction::Up
        } else if self.down {
            Direction::Down
        } else if self.left {
            Direction::Left
        } else if self.right {
            Direction::Right
        } else {
            Direction::None
        }
    }
}

/// Collects input between frames
#[derive(Debug, Clone)]
pub struct InputManager {
    held: HeldDirections,
    keys_pressed: HashSet<String>,
    touch_start: Option<Vec2>,
    swipe_min_distance: f32,
    /// One-shot direction from a swipe or button press
    pending_direction: Option<Direction>,
    pause: bool,
    start: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_MIN_DISTANCE)
    }
}

impl InputManager {
    pub fn new(swipe_min_distance: f32) -> Self {
        Self {
            held: HeldDirections::default(),
            keys_pressed: HashSet::new(),
            touch_start: None,
            swipe_min_distance,
            pending_direction: None,
            pause: false,
            start: false,
        }
    }

    pub fn set_swipe_min_distance(&mut self, distance: f32) {
        self.swipe_min_distance = distance;
    }

    /// Handle a key press; returns true if the key belongs to the game.
    /// Auto-repeat of a key that is already down is ignored.
    pub fn key_down(&mut self, code: &str) -> bool {
        let actions = actions_for_key(code);
        if !self.keys_pressed.insert(code.to_string()) {
            return !actions.is_empty();
        }
        for action in actions {
            match action {
                InputAction::Move(direction) => self.held.set(*direction, true),
                InputAction::Pause => self.pause = true,
                InputAction::Start => self.start = true,
            }
        }
        !actions.is_empty()
    }

    pub fn key_up(&mut self, code: &str) {
        self.keys_pressed.remove(code);
        for action in actions_for_key(code) {
            if let InputAction::Move(direction) = action {
                self.held.set(*direction, false);
            }
        }
    }

    /// Only single-finger touches start a swipe
    pub fn touch_start(&mut self, pos: Vec2, touches: u32) {
        if touches == 1 {
            self.touch_start = Some(pos);
        }
    }

    /// Finish a swipe; returns the direction if it was long enough
    pub fn touch_end(&mut self, pos: Vec2) -> Option<Direction> {
        let start = self.touch_start.take()?;
        let direction = swipe_direction(start, pos, self.swipe_min_distance)?;
        self.pending_direction = Some(direction);
        Some(direction)
    }

    /// On-screen direction buttons: hold while pressed
    pub fn set_direction_input(&mut self, direction: Direction, pressed: bool) {
        self.held.set(direction, pressed);
        if pressed && direction != Direction::None {
            self.pending_direction = Some(direction);
        }
    }

    pub fn press_pause(&mut self) {
        self.pause = true;
    }

    pub fn press_start(&mut self) {
        self.start = true;
    }

    pub fn held(&self) -> HeldDirections {
        self.held
    }

    pub fn current_direction(&self) -> Direction {
        self.held.current()
    }

    /// Input for the next tick; one-shot flags are consumed
    pub fn take_tick_input(&mut self) -> TickInput {
        let held = self.held.current();
        let direction = self
            .pending_direction
            .take()
            .or((held != Direction::None).then_some(held));
        TickInput {
            direction,
            pause: std::mem::take(&mut self.pause),
            start: std::mem::take(&mut self.start),
        }
    }

    /// Release everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held = HeldDirections::default();
        self.keys_pressed.clear();
        self.touch_start = None;
        self.pending_direction = None;
        self.pause = false;
        self.start = false;
    }
}
