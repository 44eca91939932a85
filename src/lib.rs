//! Brick Breaker - an arcade game that doubles as an RL environment
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, levels, game state)
//! - `env`: Step/reset protocol, observation and reward, wrappers
//! - `renderer`: Canvas abstraction and GPU-ready vertex output
//! - `config`: Data-driven game constants
//! - `agent`, `session`, `benchmark`: Policies, driver loop, evaluation

pub mod agent;
pub mod benchmark;
pub mod config;
pub mod env;
pub mod error;
pub mod input;
pub mod pacing;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use env::{BrickBreakerEnv, EnvStatus, Environment, RenderMode, ResetOptions, StepResult};
pub use error::{ConfigError, InvalidAction};
pub use input::{Action, KeyState};
pub use pacing::{FrameLimiter, QuitSignal};
