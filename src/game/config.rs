use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Shortest snake a game may start with; shorter requests are raised to this.
pub const MIN_SNAKE_LENGTH: usize = 5;
/// Most fruits that can be on the board at once.
pub const MAX_FRUIT_COUNT: usize = 5;
/// Smallest playable grid dimension.
pub const MIN_GRID_SIZE: usize = 3;
/// Largest grid dimension; keeps every coordinate well inside `i32`.
pub const MAX_GRID_SIZE: usize = 200;

/// Starting length presets offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SnakeLength {
    Short,
    #[default]
    Medium,
    Large,
}

impl SnakeLength {
    pub const ALL: [SnakeLength; 3] = [SnakeLength::Short, SnakeLength::Medium, SnakeLength::Large];

    pub fn segments(&self) -> usize {
        match self {
            SnakeLength::Short => 5,
            SnakeLength::Medium => 10,
            SnakeLength::Large => 15,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SnakeLength::Short => "Short",
            SnakeLength::Medium => "Medium",
            SnakeLength::Large => "Large",
        }
    }
}

/// Difficulty scales how often the snake moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Speed multiplier applied to the base tick rate
    pub fn speed(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Normal => 2.0,
            Difficulty::Hard => 3.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Reasons a [`GameConfig`] cannot be played
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small to play on")]
    GridTooSmall { width: usize, height: usize },

    #[error("grid {width}x{height} is too large to play on")]
    GridTooLarge { width: usize, height: usize },

    #[error("a snake of {length} segments does not fit in a grid {width} cells wide")]
    SnakeTooLong { length: usize, width: usize },

    #[error("fruit count {count} is out of range")]
    InvalidFruitCount { count: usize },

    #[error("not enough free cells for {count} fruits")]
    NoRoomForFruit { count: usize },

    #[error("base tick must be greater than zero")]
    ZeroTick,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Number of fruits kept on the board
    pub fruit_count: usize,
    pub difficulty: Difficulty,
    /// Milliseconds between ticks at speed 1.0
    pub base_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 16,
            initial_snake_length: SnakeLength::default().segments(),
            fruit_count: 2,
            difficulty: Difficulty::default(),
            base_tick_ms: 200,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(16, 12).with_length(SnakeLength::Short)
    }

    pub fn with_length(mut self, length: SnakeLength) -> Self {
        self.initial_snake_length = length.segments();
        self
    }

    pub fn with_fruit_count(mut self, count: usize) -> Self {
        self.fruit_count = count;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Snake length actually used when a game starts
    pub fn effective_snake_length(&self) -> usize {
        self.initial_snake_length.max(MIN_SNAKE_LENGTH)
    }

    /// Time between two movement ticks at the configured difficulty
    pub fn tick_interval(&self) -> Duration {
        let nanos = self.base_tick_ms as f64 * 1_000_000.0 / self.difficulty.speed();
        Duration::from_nanos(nanos.round() as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < MIN_GRID_SIZE || self.grid_height < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.grid_width > MAX_GRID_SIZE || self.grid_height > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        // The snake starts at the centre heading left, body trailing to the right.
        let length = self.effective_snake_length();
        if self.grid_width / 2 + length > self.grid_width {
            return Err(ConfigError::SnakeTooLong {
                length,
                width: self.grid_width,
            });
        }

        if self.fruit_count == 0 || self.fruit_count > MAX_FRUIT_COUNT {
            return Err(ConfigError::InvalidFruitCount {
                count: self.fruit_count,
            });
        }

        let cells = self.grid_width.checked_mul(self.grid_height).unwrap_or(usize::MAX);
        if cells < length + self.fruit_count {
            return Err(ConfigError::NoRoomForFruit {
                count: self.fruit_count,
            });
        }

        if self.base_tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }

        Ok(())
    }

    /// Load a configuration from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse config file")?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 32);
        assert_eq!(config.grid_height, 16);
        assert_eq!(config.initial_snake_length, 10);
        assert_eq!(config.fruit_count, 2);
        assert_eq!(config.difficulty, Difficulty::Normal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 15);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
    }

    #[test]
    fn test_length_presets() {
        assert_eq!(SnakeLength::Short.segments(), 5);
        assert_eq!(SnakeLength::Medium.segments(), 10);
        assert_eq!(SnakeLength::Large.segments(), 15);
    }

    #[test]
    fn test_short_snake_is_raised_to_minimum() {
        let mut config = GameConfig::default();
        config.initial_snake_length = 2;
        assert_eq!(config.effective_snake_length(), MIN_SNAKE_LENGTH);
    }

    #[test]
    fn test_tick_interval_scales_with_difficulty() {
        let config = GameConfig::default();
        assert_eq!(
            config.clone().with_difficulty(Difficulty::Easy).tick_interval(),
            Duration::from_millis(200)
        );
        assert_eq!(
            config.clone().with_difficulty(Difficulty::Normal).tick_interval(),
            Duration::from_millis(100)
        );
        assert_eq!(
            config.with_difficulty(Difficulty::Hard).tick_interval(),
            Duration::from_nanos(66_666_667)
        );
    }

    #[test]
    fn test_validate_rejects_snake_that_does_not_fit() {
        let config = GameConfig::new(20, 20).with_length(SnakeLength::Large);
        assert_eq!(
            config.validate(),
            Err(ConfigError::SnakeTooLong {
                length: 15,
                width: 20
            })
        );

        let config = GameConfig::new(20, 20).with_length(SnakeLength::Medium);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fruit_count() {
        let zero = GameConfig::default().with_fruit_count(0);
        assert_eq!(
            zero.validate(),
            Err(ConfigError::InvalidFruitCount { count: 0 })
        );

        let many = GameConfig::default().with_fruit_count(MAX_FRUIT_COUNT + 1);
        assert!(matches!(
            many.validate(),
            Err(ConfigError::InvalidFruitCount { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_tiny_grid_and_zero_tick() {
        assert!(matches!(
            GameConfig::new(2, 10).validate(),
            Err(ConfigError::GridTooSmall { .. })
        ));

        let mut config = GameConfig::default();
        config.base_tick_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTick));
    }

    #[test]
    fn test_validate_rejects_huge_grid() {
        assert_eq!(
            GameConfig::new(usize::MAX, 3).validate(),
            Err(ConfigError::GridTooLarge {
                width: usize::MAX,
                height: 3
            })
        );
        assert!(matches!(
            GameConfig::new(1 << 32, 3).validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(matches!(
            GameConfig::new(40, MAX_GRID_SIZE + 1).validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(GameConfig::new(MAX_GRID_SIZE, MAX_GRID_SIZE).validate().is_ok());
    }

    #[test]
    fn test_load_partial_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_width": 40, "difficulty": "hard" }}"#).unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.grid_width, 40);
        assert_eq!(config.grid_height, 16);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.fruit_count, 2);
    }

    #[test]
    fn test_load_invalid_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "fruit_count": 9 }}"#).unwrap();
        assert!(GameConfig::from_json_file(file.path()).is_err());

        let mut garbage = NamedTempFile::new().unwrap();
        write!(garbage, "not json").unwrap();
        assert!(GameConfig::from_json_file(garbage.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GameConfig::from_json_file(&dir.path().join("nope.json")).is_err());
    }
}
