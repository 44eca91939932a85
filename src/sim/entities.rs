//! Paddle, ball and brick state holders
//!
//! Plain structs with no shared base type. Screen coordinates: origin top-left,
//! y grows downward, units are pixels and pixels/step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::input::Action;

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test (shared edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Displacement per step while moving
    pub speed: f32,
    /// Displacement requested on the last update (for momentum transfer)
    pub last_vel: f32,
}

impl Paddle {
    /// Paddle centered horizontally, resting `bottom_offset` above the floor
    pub fn new(config: &GameConfig) -> Self {
        let p = &config.paddle;
        Self {
            x: (config.screen.width - p.width) / 2.0,
            y: config.screen.height - p.bottom_offset - p.height,
            width: p.width,
            height: p.height,
            speed: p.speed,
            last_vel: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Apply one step of movement and clamp to `[0, screen_width]`
    pub fn apply(&mut self, action: Action, screen_width: f32) {
        let dx = match action {
            Action::Hold => 0.0,
            Action::Left => -self.speed,
            Action::Right => self.speed,
        };
        self.x += dx;
        self.last_vel = dx;
        self.x = self.x.clamp(0.0, (screen_width - self.width).max(0.0));
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
        }
    }

    /// Bounding box used for all collision tests
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.pos.x - self.radius,
            self.pos.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    /// Advance by one step of velocity
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn is_descending(&self) -> bool {
        self.vel.y > 0.0
    }
}

/// Brick color by row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Red,
    Green,
    Blue,
}

impl BrickColor {
    pub const CYCLE: [BrickColor; 3] = [BrickColor::Red, BrickColor::Green, BrickColor::Blue];

    pub fn for_row(row: u32) -> Self {
        Self::CYCLE[row as usize % Self::CYCLE.len()]
    }
}

/// A destructible brick
///
/// Destroyed bricks are removed from the brick set, so every brick held by the
/// game is alive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: BrickColor,
    /// Visual variant, rolled from level 2 onward
    pub special: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersects_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges only
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_paddle_starts_centered() {
        let config = GameConfig::default();
        let paddle = Paddle::new(&config);
        assert_eq!(paddle.center_x(), 400.0);
        assert_eq!(paddle.rect().bottom(), 590.0);
    }

    #[test]
    fn test_paddle_clamps_left() {
        let config = GameConfig::default();
        let mut paddle = Paddle::new(&config);
        for _ in 0..100 {
            paddle.apply(Action::Left, config.screen.width);
        }
        assert_eq!(paddle.x, 0.0);
        // Requested velocity is kept even when clamped
        assert_eq!(paddle.last_vel, -10.0);
    }

    #[test]
    fn test_paddle_clamps_right() {
        let config = GameConfig::default();
        let mut paddle = Paddle::new(&config);
        for _ in 0..100 {
            paddle.apply(Action::Right, config.screen.width);
        }
        assert_eq!(paddle.rect().right(), config.screen.width);
    }

    #[test]
    fn test_hold_resets_velocity() {
        let config = GameConfig::default();
        let mut paddle = Paddle::new(&config);
        paddle.apply(Action::Right, config.screen.width);
        paddle.apply(Action::Hold, config.screen.width);
        assert_eq!(paddle.last_vel, 0.0);
    }

    #[test]
    fn test_brick_color_cycle() {
        assert_eq!(BrickColor::for_row(0), BrickColor::Red);
        assert_eq!(BrickColor::for_row(4), BrickColor::Green);
    }
}
