//! Overlay and HUD text for each phase

use crate::sim::{GameData, GamePhase};

/// Title screen heading
pub const GAME_TITLE: &str = "Maze Chomp";

/// Contents of the DOM overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub title: String,
    pub message: String,
    pub show_button: bool,
}

impl Overlay {
    fn new(title: impl Into<String>, message: impl Into<String>, show_button: bool) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            show_button,
        }
    }
}

/// Overlay to show in `phase`, or None to hide it
pub fn overlay_for(phase: GamePhase, data: &GameData) -> Option<Overlay> {
    let overlay = match phase {
        GamePhase::Loading => Overlay::new("Loading...", "", false),
        GamePhase::Menu => Overlay::new(
            GAME_TITLE,
            "Press SPACE to start or tap Start to begin",
            true,
        ),
        GamePhase::Ready => Overlay::new(
            "Ready!",
            "Press SPACE to start or tap anywhere to begin",
            false,
        ),
        GamePhase::Playing => return None,
        GamePhase::Paused => Overlay::new(
            "Paused",
            "Press SPACE to resume or tap pause to continue",
            false,
        ),
        GamePhase::GameOver => {
            let mut message = format!("Score: {}", data.score);
            if data.is_high_score() {
                message.push_str(" - New High Score!");
            }
            message.push_str("\nPress SPACE to play again");
            Overlay::new("Game Over", message, true)
        }
        GamePhase::LevelComplete => Overlay::new(
            format!("Level {} Complete!", data.level),
            "Press SPACE for next level",
            false,
        ),
        GamePhase::Victory => Overlay::new(
            "You Win!",
            format!("Final score: {}\nPress SPACE to return to the menu", data.score),
            true,
        ),
    };
    Some(overlay)
}

/// Strings for the score/level/lives HUD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub score: String,
    pub level: String,
    pub lives: String,
}

impl From<&GameData> for HudText {
    fn from(data: &GameData) -> Self {
        Self {
            score: data.score.to_string(),
            level: data.level.to_string(),
            lives: data.lives.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playing_hides_overlay() {
        let data = GameData::new(3, 0);
        assert!(overlay_for(GamePhase::Playing, &data).is_none());
        let menu = overlay_for(GamePhase::Menu, &data).expect("menu overlay");
        assert_eq!(menu.title, GAME_TITLE);
        assert!(menu.show_button);
    }

    #[test]
    fn test_game_over_mentions_high_score() {
        let mut data = GameData::new(3, 100);
        data.add_score(120);
        let over = overlay_for(GamePhase::GameOver, &data).expect("overlay");
        assert!(over.message.starts_with("Score: 120 - New High Score!"));

        let mut data = GameData::new(3, 500);
        data.add_score(120);
        let over = overlay_for(GamePhase::GameOver, &data).expect("overlay");
        assert!(!over.message.contains("High Score"));

        // A zero score never counts
        let data = GameData::new(3, 0);
        let over = overlay_for(GamePhase::GameOver, &data).expect("overlay");
        assert!(!over.message.contains("High Score"));
    }

    #[test]
    fn test_level_complete_title() {
        let mut data = GameData::new(3, 0);
        data.set_level(4);
        let overlay = overlay_for(GamePhase::LevelComplete, &data).expect("overlay");
        assert_eq!(overlay.title, "Level 4 Complete!");
        assert!(!overlay.show_button);
    }

    #[test]
    fn test_hud_text() {
        let mut data = GameData::new(2, 0);
        data.add_score(60);
        let hud = HudText::from(&data);
        assert_eq!((hud.score.as_str(), hud.level.as_str(), hud.lives.as_str()), ("60", "1", "2"));
    }
}
