//! Shaped reward

use serde::Serialize;

use crate::config::GameConfig;
use crate::sim::{GameState, StepEvents};

/// Reward split into its terms
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RewardBreakdown {
    pub tracking: f32,
    pub brick: f32,
    pub paddle: f32,
    pub life: f32,
}

impl RewardBreakdown {
    pub fn total(&self) -> f32 {
        self.tracking + self.brick + self.paddle + self.life
    }
}

/// Reward for one step, computed from the post-step state and its events.
///
/// The tracking term only applies while the ball is descending; whether an
/// agent should also be rewarded for positioning during the ball's ascent is
/// left open, so it stays descent-only.
pub fn compute(state: &GameState, events: &StepEvents, config: &GameConfig) -> RewardBreakdown {
    let r = &config.rewards;
    let mut breakdown = RewardBreakdown::default();

    if state.ball.is_descending() {
        let distance = (state.paddle.center_x() - state.ball.pos.x).abs();
        breakdown.tracking = r.tracking_factor * (1.0 - distance / config.screen.width);
    }
    if events.bricks_destroyed > 0 {
        breakdown.brick = r.hit_brick;
    }
    if events.hit_paddle {
        breakdown.paddle = r.hit_paddle;
    }
    if events.life_lost {
        breakdown.life = r.lose_life;
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn setup() -> (GameConfig, GameState) {
        let config = GameConfig::default();
        let state = GameState::new(&config, 0);
        (config, state)
    }

    #[test]
    fn test_tracking_only_while_descending() {
        let (config, mut state) = setup();
        state.ball.pos = Vec2::new(state.paddle.center_x(), 300.0);

        state.ball.vel = Vec2::new(0.0, 5.0);
        let down = compute(&state, &StepEvents::default(), &config);
        assert!((down.tracking - 0.1).abs() < 1e-6);

        state.ball.vel = Vec2::new(0.0, -5.0);
        let up = compute(&state, &StepEvents::default(), &config);
        assert_eq!(up.total(), 0.0);
    }

    #[test]
    fn test_tracking_falls_off_with_distance() {
        let (config, mut state) = setup();
        state.ball.vel = Vec2::new(0.0, 5.0);
        state.ball.pos = Vec2::new(state.paddle.center_x() + 400.0, 300.0);
        let r = compute(&state, &StepEvents::default(), &config);
        assert!((r.tracking - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_event_terms() {
        let (config, mut state) = setup();
        state.ball.vel = Vec2::new(0.0, -5.0);

        let events = StepEvents {
            bricks_destroyed: 2,
            score_delta: 20,
            hit_paddle: true,
            ..Default::default()
        };
        let r = compute(&state, &events, &config);
        // Multiple bricks in one step still earn a single brick reward
        assert_eq!(r.brick, 10.0);
        assert_eq!(r.paddle, 10.0);
        assert_eq!(r.total(), 20.0);
    }

    #[test]
    fn test_final_life_penalized() {
        let (config, mut state) = setup();
        state.ball.vel = Vec2::new(0.0, -5.0);
        let events = StepEvents {
            life_lost: true,
            game_over: true,
            ..Default::default()
        };
        assert_eq!(compute(&state, &events, &config).total(), -50.0);
    }
}
