//! Data-driven game tuning and the maze layout
//!
//! Defaults mirror `crate::consts`; a JSON document can override any field.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// The classic layout shipped with the game. Rows shorter than the maze
/// width, and rows missing at the bottom, are filled with walls.
pub const CLASSIC_PATTERN: [&str; 24] = [
    "########################################",
    "#..................##..................#",
    "#.####.#########.####.#########.####.#",
    "#o####.#########.####.#########.####o#",
    "#......................................#",
    "#.####.##.############.##.####.####.##",
    "#......##......##......##......##....#",
    "######.#######.##.#######.##.##########",
    "     #.#######.##.#######.##.#    #    ",
    "     #.##......  ......##.##.#    #    ",
    "######.##.#### ## ####.##.##.##########",
    "#      ..      ##      ..      ..      #",
    "######.##.#### ## ####.##.##.##########",
    "     #.##......  ......##.##.#    #    ",
    "     #.##.############.##.##.#    #    ",
    "######.##.############.##.##.##########",
    "#..................##..................#",
    "#.####.#######.####.##.####.#######.####",
    "#o..##......##.................##....o#",
    "###.##.####.##.##########.##.####.##.###",
    "#......####....####.####....####......#",
    "#.##########.##.####.####.##.##########.#",
    "#......................................#",
    "########################################",
];

/// Characters the strict parser accepts
pub const KNOWN_MAZE_CHARS: [char; 4] = ['#', '.', 'o', ' '];

/// Maze dimensions plus the ASCII pattern they are filled from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeLayout {
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
    /// Pattern rows, top to bottom
    pub rows: Vec<String>,
}

impl MazeLayout {
    pub fn new(width: usize, height: usize, rows: &[&str]) -> Self {
        Self {
            width,
            height,
            rows: rows.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// The shipped 40x30 layout
    pub fn classic() -> Self {
        Self::new(MAZE_WIDTH, MAZE_HEIGHT, &CLASSIC_PATTERN)
    }

    /// Layout sized exactly to its pattern (widest row, row count)
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        Self::new(width, rows.len(), rows)
    }

    /// Characters that land inside the grid, with their cell coordinates
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.rows
            .iter()
            .take(self.height)
            .enumerate()
            .flat_map(move |(y, row)| {
                row.chars()
                    .take(self.width)
                    .enumerate()
                    .map(move |(x, ch)| (x, y, ch))
            })
    }

    /// Strict check: non-empty and only known characters inside the grid
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.rows.is_empty() {
            return Err(GameError::EmptyLayout);
        }
        if let Some((x, y, ch)) = self.cells().find(|(_, _, ch)| !KNOWN_MAZE_CHARS.contains(ch)) {
            return Err(GameError::UnknownMazeChar { ch, x, y });
        }
        Ok(())
    }
}

impl Default for MazeLayout {
    fn default() -> Self {
        Self::classic()
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Cell size in pixels
    pub grid_size: f32,
    /// Pixels per tick
    pub player_speed: f32,
    pub player_radius: f32,
    pub pellet_points: u64,
    pub power_pellet_points: u64,
    pub starting_lives: u32,
    /// Seconds
    pub ready_delay: f32,
    /// Seconds
    pub level_complete_delay: f32,
    /// Seconds
    pub invulnerability_time: f32,
    /// Clearing this level ends the run in Victory; None plays forever
    pub max_level: Option<u32>,
    pub layout: MazeLayout,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            grid_size: GRID_SIZE,
            player_speed: PLAYER_SPEED,
            player_radius: PLAYER_RADIUS,
            pellet_points: PELLET_POINTS,
            power_pellet_points: POWER_PELLET_POINTS,
            starting_lives: STARTING_LIVES,
            ready_delay: READY_DELAY,
            level_complete_delay: LEVEL_COMPLETE_DELAY,
            invulnerability_time: INVULNERABILITY_TIME,
            max_level: None,
            layout: MazeLayout::classic(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON override document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("grid_size", self.grid_size),
            ("player_speed", self.player_speed),
            ("player_radius", self.player_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidConfig {
                    reason: format!("{name} must be positive, got {value}"),
                });
            }
        }
        // A player wider than a corridor could never move
        if self.player_radius * 2.0 >= self.grid_size {
            return Err(GameError::InvalidConfig {
                reason: format!(
                    "player_radius {} does not fit a {} px corridor",
                    self.player_radius, self.grid_size
                ),
            });
        }
        if self.max_level == Some(0) {
            return Err(GameError::InvalidConfig {
                reason: "max_level must be at least 1".to_string(),
            });
        }
        if self.layout.width == 0 || self.layout.height == 0 {
            return Err(GameError::EmptyLayout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_overrides_fields() {
        let config = GameConfig::from_json(r#"{ "player_speed": 3.0, "starting_lives": 5 }"#)
            .expect("valid config");
        assert_eq!(config.player_speed, 3.0);
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.grid_size, GRID_SIZE);
        assert_eq!(config.layout, MazeLayout::classic());
    }

    #[test]
    fn test_from_json_rejects_oversized_player() {
        let err = GameConfig::from_json(r#"{ "player_radius": 12.0 }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = GameConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, GameError::Serialization(_)));
    }

    #[test]
    fn test_layout_validate() {
        assert!(MazeLayout::classic().validate().is_ok());

        let bad = MazeLayout::from_rows(&["#.#", "#x#"]);
        match bad.validate() {
            Err(GameError::UnknownMazeChar { ch, x, y }) => {
                assert_eq!((ch, x, y), ('x', 1, 1));
            }
            other => panic!("expected UnknownMazeChar, got {:?}", other),
        }

        let empty = MazeLayout::new(0, 0, &[]);
        assert!(matches!(empty.validate(), Err(GameError::EmptyLayout)));
    }

    #[test]
    fn test_layout_cells_clip_to_grid() {
        let layout = MazeLayout::new(2, 1, &["#..", "oo"]);
        let cells: Vec<_> = layout.cells().collect();
        assert_eq!(cells, vec![(0, 0, '#'), (1, 0, '.')]);
    }
}
