//! Canvas 2D rendering module
//!
//! Frame contents are computed natively testable in `scene` and `overlay`;
//! `canvas` (wasm32 only) turns them into draw calls and DOM updates.

pub mod overlay;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use overlay::{HudText, Overlay, overlay_for};
pub use scene::{PlayerSprite, Scene, build_scene};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

/// Scale that fits the logical canvas in its container without upscaling
pub fn fit_scale(container: Vec2, logical: Vec2) -> f32 {
    let scale = (container.x / logical.x).min(container.y / logical.y).min(1.0);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// Client coordinates to logical game coordinates
pub fn screen_to_game(screen: Vec2, canvas_origin: Vec2, scale: f32) -> Vec2 {
    (screen - canvas_origin) / scale
}

/// Power pellet radius multiplier at `time_ms`, in [0.6, 1.0]
pub fn power_pellet_pulse(time_ms: f64) -> f32 {
    (0.8 + 0.2 * (time_ms * 0.005).sin()) as f32
}

/// Half-angle of the mouth opening for an animation phase
pub fn mouth_angle(animation_frame: f32) -> f32 {
    animation_frame.sin() * 0.5 + 0.3
}

/// Invulnerable sprites skip every other 200 ms window
pub fn blink_visible(time_ms: f64) -> bool {
    (time_ms / 200.0).floor() as i64 % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_never_upscales() {
        let logical = Vec2::new(800.0, 600.0);
        assert_eq!(fit_scale(Vec2::new(1600.0, 1200.0), logical), 1.0);
        assert_eq!(fit_scale(Vec2::new(400.0, 600.0), logical), 0.5);
        assert_eq!(fit_scale(Vec2::new(800.0, 300.0), logical), 0.5);
        // Detached container reports zero size
        assert_eq!(fit_scale(Vec2::ZERO, logical), 1.0);
    }

    #[test]
    fn test_screen_to_game() {
        let game = screen_to_game(Vec2::new(110.0, 70.0), Vec2::new(10.0, 20.0), 0.5);
        assert_eq!(game, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_pulse_range() {
        for t in (0..5000).step_by(37) {
            let pulse = power_pellet_pulse(t as f64);
            assert!((0.6..=1.0).contains(&pulse));
        }
        assert!((power_pellet_pulse(0.0) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_mouth_and_blink() {
        assert!((mouth_angle(0.0) - 0.3).abs() < 1e-6);
        assert!(blink_visible(0.0));
        assert!(!blink_visible(250.0));
        assert!(blink_visible(450.0));
    }
}
