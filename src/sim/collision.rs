//! Collision detection and response
//!
//! Everything is axis-aligned: the ball collides through its bounding box.
//! The interesting part is the paddle response, which turns the impact point
//! and paddle motion into a new ball direction and speed.

use glam::Vec2;

use super::entities::{Ball, Brick, Paddle};
use crate::config::{GameConfig, PhysicsConfig};

/// What happened to the ball during one resolve pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Points awarded for bricks destroyed this pass
    pub score_delta: u64,
    pub bricks_destroyed: u32,
    pub hit_paddle: bool,
}

/// Resolve every collision for a ball that has already moved this step
///
/// Order: walls, ceiling, paddle, bricks. Ball velocity and position are
/// updated in place; destroyed bricks are removed from `bricks`. The caller
/// checks the floor with [`is_out_of_bounds`] after any level-up respawn.
pub fn resolve(
    ball: &mut Ball,
    paddle: &Paddle,
    bricks: &mut Vec<Brick>,
    config: &GameConfig,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let width = config.screen.width;

    // Side walls: point back into the field and clamp so the flip cannot repeat
    let rect = ball.rect();
    if rect.left() <= 0.0 {
        ball.vel.x = ball.vel.x.abs();
        ball.pos.x = ball.radius;
    } else if rect.right() >= width {
        ball.vel.x = -ball.vel.x.abs();
        ball.pos.x = width - ball.radius;
    }

    // Ceiling
    if ball.rect().top() <= 0.0 {
        ball.vel.y = ball.vel.y.abs();
        ball.pos.y = ball.radius;
    }

    // Paddle before bricks
    if ball.rect().intersects(&paddle.rect()) {
        ball.vel = paddle_bounce(ball, paddle, &config.physics);
        ball.pos.y = paddle.rect().top() - ball.radius;
        report.hit_paddle = true;
    }

    // Bricks: every overlapping brick breaks, the ball flips once
    let ball_rect = ball.rect();
    let before = bricks.len();
    bricks.retain(|brick| !brick.rect.intersects(&ball_rect));
    let destroyed = (before - bricks.len()) as u32;
    if destroyed > 0 {
        ball.vel.y = -ball.vel.y;
        report.bricks_destroyed = destroyed;
        report.score_delta = destroyed as u64 * config.bricks.points;
    }

    report
}

/// Ball fully below the bottom edge
#[inline]
pub fn is_out_of_bounds(ball: &Ball, screen_height: f32) -> bool {
    ball.rect().top() > screen_height
}

/// Normalized impact offset in [-1, 1]: +1 at the paddle's left edge, -1 at its right
pub fn impact_offset(ball: &Ball, paddle: &Paddle) -> f32 {
    let half = paddle.width / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    ((paddle.center_x() - ball.pos.x) / half).clamp(-1.0, 1.0)
}

/// Velocity after the ball strikes the paddle
///
/// Angle deflection from the impact offset, momentum transfer from the
/// paddle, speed-up capped at `max_speed`, and a minimum vertical component.
pub fn paddle_bounce(ball: &Ball, paddle: &Paddle, physics: &PhysicsConfig) -> Vec2 {
    let offset = impact_offset(ball, paddle);

    // Always leave upward
    let mut vy = -ball.vel.y.abs();
    let mut vx = -offset * physics.bounce_factor;
    vx += paddle.last_vel * physics.momentum_transfer;

    let speed = Vec2::new(vx, vy).length();
    let new_speed = (speed * physics.speed_up).min(physics.max_speed);
    let ratio = if speed > 0.0 { new_speed / speed } else { 1.0 };
    vx *= ratio;
    vy *= ratio;

    // vy is never positive here, so the re-injected minimum points up
    if vy.abs() < physics.min_vertical_speed {
        vy = -physics.min_vertical_speed;
        // Re-injecting vy can push the magnitude past the cap; give it back from vx
        let magnitude = Vec2::new(vx, vy).length();
        if magnitude > physics.max_speed {
            let max_vx = (physics.max_speed * physics.max_speed - vy * vy).max(0.0).sqrt();
            vx = vx.signum() * max_vx;
        }
    }

    Vec2::new(vx, vy)
}
