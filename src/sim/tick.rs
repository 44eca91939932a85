//! Fixed-step simulation tick
//!
//! One call advances the game by exactly one frame: paddle input, ball motion,
//! collisions, then the level/lives state machine.

use super::collision::{is_out_of_bounds, resolve};
use super::state::GameState;
use crate::config::GameConfig;
use crate::input::Action;

/// Everything that happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepEvents {
    pub score_delta: u64,
    pub bricks_destroyed: u32,
    pub hit_paddle: bool,
    pub life_lost: bool,
    /// Brick set emptied and the next level started
    pub level_completed: bool,
    /// Last life lost; the game was reset to level 1
    pub game_over: bool,
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, config: &GameConfig, action: Action) -> StepEvents {
    let mut events = StepEvents::default();
    state.frame += 1;

    state.paddle.apply(action, config.screen.width);
    state.ball.advance();

    let report = resolve(&mut state.ball, &state.paddle, &mut state.bricks, config);
    events.score_delta = report.score_delta;
    events.bricks_destroyed = report.bricks_destroyed;
    events.hit_paddle = report.hit_paddle;
    state.score += report.score_delta;

    if report.bricks_destroyed > 0 {
        log::debug!(
            "Broke {} brick(s), score {}",
            report.bricks_destroyed,
            state.score
        );
    }

    if state.bricks.is_empty() {
        state.level += 1;
        state.create_bricks(config);
        state.reset_ball(config);
        events.level_completed = true;
        log::info!("Level {} reached (score {})", state.level, state.score);
    }

    // The level-up respawn already put the ball back on the paddle
    if is_out_of_bounds(&state.ball, config.screen.height) {
        events.life_lost = true;
        state.lives = state.lives.saturating_sub(1);
        if state.lives > 0 {
            log::debug!("Ball lost, {} lives left", state.lives);
            state.reset_ball(config);
        } else {
            log::info!(
                "Game over at level {} with score {}, resetting",
                state.level,
                state.score
            );
            events.game_over = true;
            state.reset_game(config);
        }
    }

    events
}
