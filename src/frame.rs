//! Frame pacing
//!
//! Turns variable browser frame times into fixed simulation ticks and keeps
//! the FPS readout. Lives outside `main.rs` so it runs under native tests.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::input::InputManager;
use crate::sim::{GameState, tick};

/// Longest frame the accumulator accepts (seconds)
pub const MAX_FRAME_DT: f32 = 0.1;

/// Frames averaged by `FpsCounter`
const FPS_WINDOW: usize = 60;

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Advance by one frame of `dt` seconds and return the ticks run.
    ///
    /// Input is only taken from `input` when at least one tick will run, so
    /// one-shot presses made during a short frame wait for the next tick.
    /// Pause and start apply to the first substep only.
    pub fn advance(&mut self, state: &mut GameState, input: &mut InputManager, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        if self.accumulator < SIM_DT {
            return 0;
        }

        let mut tick_input = input.take_tick_input();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &tick_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            tick_input.pause = false;
            tick_input.start = false;
        }
        substeps
    }
}

/// Frames per second over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp (ms) and return the current estimate
    pub fn record(&mut self, time_ms: f64) -> u32 {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample sits where the next write goes
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{GamePhase, TickInput};

    fn in_menu() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase(), GamePhase::Menu);
        state
    }

    #[test]
    fn test_short_frames_keep_start_press() {
        let mut state = in_menu();
        let mut input = InputManager::default();
        let mut step = FixedStep::new();
        let frame = 1.0 / 144.0;

        input.press_start();
        assert_eq!(step.advance(&mut state, &mut input, frame), 0);
        assert_eq!(step.advance(&mut state, &mut input, frame), 0);
        assert_eq!(state.phase(), GamePhase::Menu);

        // Third 144 Hz frame crosses one tick; the press is still pending
        assert_eq!(step.advance(&mut state, &mut input, frame), 1);
        assert_eq!(state.phase(), GamePhase::Ready);
    }

    #[test]
    fn test_every_press_at_144hz_is_ticked() {
        let mut state = in_menu();
        let mut input = InputManager::default();
        let mut step = FixedStep::new();

        input.press_start();
        for _ in 0..3 {
            step.advance(&mut state, &mut input, 1.0 / 144.0);
        }
        assert_eq!(state.phase(), GamePhase::Ready);

        input.press_start();
        for _ in 0..3 {
            step.advance(&mut state, &mut input, 1.0 / 144.0);
        }
        assert_eq!(state.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_pause_applies_to_first_substep_only() {
        let mut state = in_menu();
        let mut input = InputManager::default();
        let mut step = FixedStep::new();

        input.press_start();
        step.advance(&mut state, &mut input, SIM_DT);
        input.press_start();
        step.advance(&mut state, &mut input, SIM_DT);
        assert_eq!(state.phase(), GamePhase::Playing);

        // A long frame runs several ticks; the toggle must not flip back
        input.press_pause();
        let ticks = step.advance(&mut state, &mut input, 3.5 * SIM_DT);
        assert_eq!(ticks, 3);
        assert_eq!(state.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut state = in_menu();
        let mut input = InputManager::default();
        let mut step = FixedStep::new();

        let ticks = step.advance(&mut state, &mut input, 10.0);
        assert_eq!(ticks, MAX_SUBSTEPS);
        assert!(step.accumulator() < MAX_FRAME_DT);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        let frame_ms = 1000.0 / 60.0;
        for i in 1..=120 {
            fps.record(i as f64 * frame_ms);
        }
        assert_eq!(fps.fps(), 60);

        let mut slow = FpsCounter::default();
        for i in 1..=120 {
            slow.record(i as f64 * 2.0 * frame_ms);
        }
        assert_eq!(slow.fps(), 30);
    }
}
