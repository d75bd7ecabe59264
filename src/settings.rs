//! Player preferences
//!
//! Session-only: the page may supply overrides as JSON, but nothing here is
//! written back. The high score is the only persisted value.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Default minimum swipe length in pixels
pub const DEFAULT_SWIPE_MIN_DISTANCE: f32 = 30.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show FPS counter
    pub show_fps: bool,
    /// Reduced motion (no pellet pulse, no invulnerability blinking)
    pub reduced_motion: bool,
    /// Leave the Ready screen automatically after the countdown
    pub auto_start: bool,
    /// Shortest touch drag that counts as a swipe (pixels)
    pub swipe_min_distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,
            reduced_motion: false,
            auto_start: true,
            swipe_min_distance: DEFAULT_SWIPE_MIN_DISTANCE,
        }
    }
}

impl Settings {
    /// Power pellets pulse unless motion is reduced
    pub fn effective_pellet_pulse(&self) -> bool {
        !self.reduced_motion
    }

    /// Invulnerable player blinks unless motion is reduced
    pub fn effective_blink(&self) -> bool {
        !self.reduced_motion
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.swipe_min_distance.is_finite() && self.swipe_min_distance > 0.0) {
            return Err(GameError::InvalidConfig {
                reason: format!(
                    "swipe_min_distance must be positive, got {}",
                    self.swipe_min_distance
                ),
            });
        }
        Ok(())
    }

    /// Parse overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Settings from an optional page-supplied document. Invalid input is
    /// logged and replaced by defaults.
    pub fn from_page(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Using page settings");
                settings
            }
            Err(err) => {
                log::warn!("Ignoring page settings: {}", err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.auto_start);
        assert_eq!(settings.swipe_min_distance, 30.0);
        assert!(settings.effective_pellet_pulse());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_reduced_motion_disables_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_pellet_pulse());
        assert!(!settings.effective_blink());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "show_fps": true }"#).expect("valid");
        assert!(settings.show_fps);
        assert!(settings.auto_start);
        assert_eq!(settings.swipe_min_distance, DEFAULT_SWIPE_MIN_DISTANCE);
    }

    #[test]
    fn test_rejects_bad_swipe_distance() {
        let settings = Settings {
            swipe_min_distance: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(GameError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_from_page_falls_back_to_defaults() {
        assert_eq!(Settings::from_page(None), Settings::default());
        assert_eq!(Settings::from_page(Some("{ nope")), Settings::default());
        assert_eq!(
            Settings::from_page(Some(r#"{ "swipe_min_distance": 0 }"#)),
            Settings::default()
        );

        let settings = Settings::from_page(Some(r#"{ "reduced_motion": true }"#));
        assert!(settings.reduced_motion);
    }
}
