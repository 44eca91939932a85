//! Game configuration
//!
//! Every tunable the simulation, reward shaping and pacing read lives in one
//! immutable [`GameConfig`] handed to the engine at construction. Persisted as
//! JSON next to the other driver artifacts.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Playfield dimensions in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Paddle geometry and movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleConfig {
    pub width: f32,
    pub height: f32,
    /// Fixed displacement per step while moving (pixels)
    pub speed: f32,
    /// Gap between paddle bottom and screen bottom
    pub bottom_offset: f32,
}

impl Default for PaddleConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 20.0,
            speed: 10.0,
            bottom_offset: 10.0,
        }
    }
}

/// Ball geometry and spawn parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    /// Upward launch speed magnitude at level 1
    pub launch_speed_y: f32,
    /// Horizontal launch speed range (magnitude, sign is random)
    pub launch_speed_x_min: f32,
    pub launch_speed_x_max: f32,
    /// Fractional launch speed increase per level above 1
    pub level_speed_increase: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            launch_speed_y: 5.0,
            launch_speed_x_min: 3.0,
            launch_speed_x_max: 7.0,
            level_speed_increase: 0.05,
        }
    }
}

impl BallConfig {
    /// Launch speed multiplier for a level (1-based)
    pub fn level_multiplier(&self, level: u32) -> f32 {
        1.0 + level.saturating_sub(1) as f32 * self.level_speed_increase
    }
}

/// Paddle bounce response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Lateral speed produced by an edge hit (offset of +/-1)
    pub bounce_factor: f32,
    /// Share of paddle velocity transferred to the ball
    pub momentum_transfer: f32,
    /// Speed multiplier applied on every paddle hit
    pub speed_up: f32,
    /// Speed cap after a paddle hit
    pub max_speed: f32,
    /// Minimum |vy| after a paddle hit
    pub min_vertical_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            bounce_factor: 5.0,
            momentum_transfer: 0.3,
            speed_up: 1.05,
            max_speed: 12.0,
            min_vertical_speed: 3.0,
        }
    }
}

/// Brick grid layout and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickConfig {
    pub rows: u32,
    pub cols: u32,
    pub width: f32,
    pub height: f32,
    pub gap: f32,
    pub offset_top: f32,
    pub offset_left: f32,
    pub points: u64,
    /// Probability a brick is flagged special
    pub special_chance: f64,
    /// First level where special bricks can appear
    pub special_from_level: u32,
}

impl Default for BrickConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 10,
            width: 60.0,
            height: 20.0,
            gap: 10.0,
            offset_top: 50.0,
            offset_left: 35.0,
            points: 10,
            special_chance: 0.1,
            special_from_level: 2,
        }
    }
}

/// Reward shaping weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub hit_brick: f32,
    pub hit_paddle: f32,
    /// Applied when a life is lost (negative)
    pub lose_life: f32,
    /// Scale of the ball-tracking term while the ball descends
    pub tracking_factor: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            hit_brick: 10.0,
            hit_paddle: 10.0,
            lose_life: -50.0,
            tracking_factor: 0.1,
        }
    }
}

/// Observation scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationConfig {
    /// Assumed velocity ceiling used to scale ball velocity
    pub velocity_ceiling: f32,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            velocity_ceiling: 20.0,
        }
    }
}

/// Frame pacing per render mode (0 = unthrottled)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub human_fps: u32,
    pub train_fps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            human_fps: 60,
            train_fps: 0,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub paddle: PaddleConfig,
    pub ball: BallConfig,
    pub physics: PhysicsConfig,
    pub bricks: BrickConfig,
    pub rewards: RewardConfig,
    pub observation: ObservationConfig,
    pub timing: TimingConfig,
    pub initial_lives: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            paddle: PaddleConfig::default(),
            ball: BallConfig::default(),
            physics: PhysicsConfig::default(),
            bricks: BrickConfig::default(),
            rewards: RewardConfig::default(),
            observation: ObservationConfig::default(),
            timing: TimingConfig::default(),
            initial_lives: 3,
        }
    }
}

impl GameConfig {
    /// Largest spawn offset from the paddle center that keeps the ball over it
    pub fn max_spawn_offset(&self) -> i32 {
        ((self.paddle.width / 2.0).floor() - self.ball.radius).max(0.0) as i32
    }

    /// Check invariants the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen.width", self.screen.width),
            ("screen.height", self.screen.height),
            ("paddle.width", self.paddle.width),
            ("paddle.height", self.paddle.height),
            ("paddle.speed", self.paddle.speed),
            ("ball.radius", self.ball.radius),
            ("ball.launch_speed_y", self.ball.launch_speed_y),
            ("physics.max_speed", self.physics.max_speed),
            ("bricks.width", self.bricks.width),
            ("bricks.height", self.bricks.height),
            ("observation.velocity_ceiling", self.observation.velocity_ceiling),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if self.initial_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.bricks.rows == 0 || self.bricks.cols == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.ball.launch_speed_x_min > self.ball.launch_speed_x_max
            || self.ball.launch_speed_x_min < 0.0
        {
            return Err(ConfigError::LaunchRange {
                min: self.ball.launch_speed_x_min,
                max: self.ball.launch_speed_x_max,
            });
        }
        if self.physics.min_vertical_speed < 0.0
            || self.physics.min_vertical_speed >= self.physics.max_speed
        {
            return Err(ConfigError::SpeedBounds {
                min_vertical: self.physics.min_vertical_speed,
                max: self.physics.max_speed,
            });
        }
        if !(0.0..=1.0).contains(&self.bricks.special_chance) {
            return Err(ConfigError::Probability(self.bricks.special_chance));
        }
        if self.paddle.width > self.screen.width {
            return Err(ConfigError::DoesNotFit("paddle"));
        }

        let grid_right = self.bricks.offset_left
            + self.bricks.cols as f32 * (self.bricks.width + self.bricks.gap)
            - self.bricks.gap;
        let grid_bottom = self.bricks.offset_top
            + self.bricks.rows as f32 * (self.bricks.height + self.bricks.gap)
            - self.bricks.gap;
        let paddle_top = self.screen.height - self.paddle.bottom_offset - self.paddle.height;
        if grid_right > self.screen.width || grid_bottom >= paddle_top {
            return Err(ConfigError::DoesNotFit("brick grid"));
        }

        Ok(())
    }

    /// Load a configuration file (JSON); missing sections fall back to defaults
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing config {}", path.display()))?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_lives, 3);
        assert_eq!(config.max_spawn_offset(), 40);
    }

    #[test]
    fn test_level_multiplier() {
        let ball = BallConfig::default();
        assert_eq!(ball.level_multiplier(1), 1.0);
        assert!((ball.level_multiplier(3) - 1.1).abs() < 1e-6);
        // Level 0 is treated like level 1
        assert_eq!(ball.level_multiplier(0), 1.0);
    }

    #[test]
    fn test_validate_rejects_bad_speed_bounds() {
        let mut config = GameConfig::default();
        config.physics.min_vertical_speed = 12.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpeedBounds { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_lives() {
        let config = GameConfig {
            initial_lives: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoLives)));
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        let mut config = GameConfig::default();
        config.bricks.cols = 20;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DoesNotFit("brick grid"))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "initial_lives": 5, "physics": { "bounce_factor": 4.0 } }"#)
                .unwrap();
        assert_eq!(config.initial_lives, 5);
        assert_eq!(config.physics.bounce_factor, 4.0);
        assert_eq!(config.physics.max_speed, 12.0);
        assert_eq!(config.screen, ScreenConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");

        let mut config = GameConfig::default();
        config.rewards.tracking_factor = 0.25;
        config.save(&path).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GameConfig::load(dir.path().join("missing.json")).is_err());
    }
}
