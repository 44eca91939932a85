//! Draw a game state onto a canvas

use glam::Vec2;

use super::Canvas;
use super::vertex::{Color, colors};
use crate::sim::{BrickColor, GamePhase, GameState};

const HUD_SIZE: f32 = 36.0;
const GAME_OVER_SIZE: f32 = 72.0;

fn brick_color(color: BrickColor, special: bool) -> Color {
    if special {
        return colors::BRICK_SPECIAL;
    }
    match color {
        BrickColor::Red => colors::BRICK_RED,
        BrickColor::Green => colors::BRICK_GREEN,
        BrickColor::Blue => colors::BRICK_BLUE,
    }
}

/// Render one complete frame and present it
///
/// HUD and overlay positions follow the canvas size.
pub fn draw<C: Canvas + ?Sized>(state: &GameState, canvas: &mut C) {
    let (width, height) = canvas.size();

    canvas.clear(colors::BACKGROUND);

    for brick in &state.bricks {
        canvas.fill_rect(brick.rect, brick_color(brick.color, brick.special));
    }
    canvas.fill_rect(state.paddle.rect(), colors::PADDLE);
    canvas.fill_circle(state.ball.pos, state.ball.radius, colors::BALL);

    // HUD
    canvas.draw_text(
        &format!("Score: {}", state.score),
        Vec2::new(10.0, 10.0),
        HUD_SIZE,
        colors::HUD_TEXT,
    );
    canvas.draw_text(
        &format!("Lives: {}", state.lives),
        Vec2::new(width - 120.0, 10.0),
        HUD_SIZE,
        colors::HUD_TEXT,
    );
    canvas.draw_text(
        &format!("Level: {}", state.level),
        Vec2::new(width / 2.0 - 50.0, 10.0),
        HUD_SIZE,
        colors::HUD_TEXT,
    );

    if state.phase() == GamePhase::GameOver {
        let center = Vec2::new(width / 2.0, height / 2.0);
        canvas.draw_text(
            "GAME OVER",
            center - Vec2::new(0.0, 50.0),
            GAME_OVER_SIZE,
            colors::GAME_OVER,
        );
        canvas.draw_text(
            &format!("Final Score: {}", state.score),
            center + Vec2::new(0.0, 50.0),
            HUD_SIZE,
            colors::HUD_TEXT,
        );
    }

    canvas.present();
}
