//! Observation vector

use crate::config::GameConfig;
use crate::sim::GameState;

/// Length of one observation frame
pub const OBS_DIM: usize = 5;

/// Declared lower bounds
pub const OBS_LOW: [f32; OBS_DIM] = [0.0, 0.0, 0.0, -5.0, -5.0];

/// Declared upper bounds; ball y may exceed 1.0 just before a miss registers
pub const OBS_HIGH: [f32; OBS_DIM] = [1.0, 1.0, 1.2, 5.0, 5.0];

/// `[paddle_cx / W, ball_cx / W, ball_cy / H, ball_vx / V, ball_vy / V]`
pub fn observe(state: &GameState, config: &GameConfig) -> [f32; OBS_DIM] {
    let w = config.screen.width;
    let h = config.screen.height;
    let v = config.observation.velocity_ceiling;
    [
        state.paddle.center_x() / w,
        state.ball.pos.x / w,
        state.ball.pos.y / h,
        state.ball.vel.x / v,
        state.ball.vel.y / v,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_observation_scaling() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 0);
        state.paddle.x = 350.0;
        state.ball.pos = Vec2::new(200.0, 300.0);
        state.ball.vel = Vec2::new(4.0, -5.0);

        let obs = observe(&state, &config);
        assert_eq!(obs, [0.5, 0.25, 0.5, 0.2, -0.25]);
    }

    #[test]
    fn test_fresh_state_within_bounds() {
        let config = GameConfig::default();
        for seed in 0..20 {
            let state = GameState::new(&config, seed);
            let obs = observe(&state, &config);
            for i in 0..OBS_DIM {
                assert!(obs[i] >= OBS_LOW[i] && obs[i] <= OBS_HIGH[i], "{i}: {}", obs[i]);
            }
        }
    }
}
