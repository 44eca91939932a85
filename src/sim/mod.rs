//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per call, velocities in pixels/step
//! - Seeded RNG only
//! - No rendering, pacing or platform dependencies

pub mod collision;
pub mod entities;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, impact_offset, paddle_bounce, resolve};
pub use entities::{Ball, Brick, BrickColor, Paddle, Rect};
pub use level::generate_bricks;
pub use state::{GamePhase, GameState};
pub use tick::{StepEvents, tick};
