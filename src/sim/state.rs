//! Game state and reset semantics
//!
//! One `GameState` lives for a whole session. `reset_game` starts over from
//! level 1, `reset_ball` only respawns the ball.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entities::{Ball, Brick, Paddle};
use super::level::generate_bricks;
use crate::config::GameConfig;

/// Current phase of play
///
/// There is no persisted terminal state: exhausting lives resets straight back
/// into `Playing`. `GameOver` only means the session was asked to quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was last seeded with
    pub seed: u64,
    rng: Pcg32,
    pub score: u64,
    pub lives: u32,
    /// 1-based
    pub level: u32,
    /// Cleared by a quit signal; never restored by a reset
    pub running: bool,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Living bricks
    pub bricks: Vec<Brick>,
    /// Steps since the last full reset
    pub frame: u64,
}

impl GameState {
    /// Create a fresh game with the given seed
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            lives: config.initial_lives,
            level: 1,
            running: true,
            paddle: Paddle::new(config),
            ball: Ball::new(config.ball.radius),
            bricks: Vec::new(),
            frame: 0,
        };
        state.reset_game(config);
        state
    }

    /// Re-seed the RNG stream (used by environment resets)
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    pub fn phase(&self) -> GamePhase {
        if self.running {
            GamePhase::Playing
        } else {
            GamePhase::GameOver
        }
    }

    /// Start over: score 0, full lives, level 1, fresh paddle, grid and ball
    pub fn reset_game(&mut self, config: &GameConfig) {
        self.score = 0;
        self.lives = config.initial_lives;
        self.level = 1;
        self.frame = 0;
        self.paddle = Paddle::new(config);
        self.ball = Ball::new(config.ball.radius);
        self.create_bricks(config);
        self.reset_ball(config);
    }

    /// Respawn the ball on the paddle with a randomized offset, direction and speed
    ///
    /// Speed scales with the current level. Score and lives are untouched.
    pub fn reset_ball(&mut self, config: &GameConfig) {
        let max_offset = config.max_spawn_offset();
        let offset = self.rng.random_range(-max_offset..=max_offset) as f32;

        let multiplier = config.ball.level_multiplier(self.level);
        let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let speed_x = if config.ball.launch_speed_x_max > config.ball.launch_speed_x_min {
            self.rng
                .random_range(config.ball.launch_speed_x_min..=config.ball.launch_speed_x_max)
        } else {
            config.ball.launch_speed_x_min
        };

        let radius = config.ball.radius;
        self.ball = Ball {
            pos: Vec2::new(
                self.paddle.center_x() + offset,
                self.paddle.rect().top() - radius,
            ),
            vel: Vec2::new(
                speed_x * multiplier * direction,
                -config.ball.launch_speed_y * multiplier,
            ),
            radius,
        };
    }

    /// Replace the brick set with the layout for the current level
    pub fn create_bricks(&mut self, config: &GameConfig) {
        self.bricks = generate_bricks(config, self.level, &mut self.rng);
    }

    #[inline]
    pub fn bricks_remaining(&self) -> usize {
        self.bricks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let config = GameConfig::default();
        let state = GameState::new(&config, 42);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert!(state.running);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.bricks_remaining(), 50);
    }

    #[test]
    fn test_reset_ball_spawns_on_paddle() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 42);
        for _ in 0..50 {
            state.reset_ball(&config);
            let ball = &state.ball;
            assert_eq!(ball.rect().bottom(), state.paddle.rect().top());
            let offset = ball.pos.x - state.paddle.center_x();
            assert!(offset.abs() <= config.max_spawn_offset() as f32);
            assert!(ball.vel.y < 0.0);
            assert!((3.0..=7.0).contains(&ball.vel.x.abs()));
        }
    }

    #[test]
    fn test_reset_ball_scales_with_level() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 42);
        state.level = 3;
        state.reset_ball(&config);
        assert!((state.ball.vel.y + 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_reset_ball_keeps_score_and_lives() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.score = 120;
        state.lives = 2;
        state.reset_ball(&config);
        assert_eq!(state.score, 120);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_reset_game_keeps_running_flag() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.running = false;
        state.score = 30;
        state.level = 4;
        state.reset_game(&config);
        assert!(!state.running);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_same_seed_same_spawn() {
        let config = GameConfig::default();
        let a = GameState::new(&config, 99);
        let b = GameState::new(&config, 99);
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.ball.vel, b.ball.vel);
    }
}
