//! Environment interface and the brick breaker environment
//!
//! A driver calls [`Environment::reset`] once, then [`Environment::step`]
//! repeatedly until the episode terminates or is truncated. Wrappers in
//! [`wrappers`] implement the same trait and forward [`Environment::status`],
//! so a driver can always read the game status without knowing how deep the
//! wrapper stack is.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::input::Action;

pub mod brick_breaker;
pub mod normalize;
pub mod observation;
pub mod reward;
pub mod wrappers;

pub use brick_breaker::{BrickBreakerEnv, RenderMode};
pub use normalize::RunningMeanStd;
pub use wrappers::{AutoReset, FrameStack, NormalizeObservation, TimeLimit};

/// Open key/value step information
pub type Info = serde_json::Map<String, serde_json::Value>;

/// Core trait for RL environments
pub trait Environment {
    /// Start a new episode; `seed` reseeds the game RNG when given
    fn reset(&mut self, seed: Option<u64>, options: ResetOptions) -> Result<(Vec<f32>, Info)>;

    /// Step the environment with an action
    fn step(&mut self, action: Action) -> Result<StepResult>;

    /// Get the observation space dimensions
    fn observation_space(&self) -> SpaceInfo;

    /// Get the action space dimensions
    fn action_space(&self) -> SpaceInfo;

    /// Current game status
    fn status(&self) -> EnvStatus;

    /// Step with a raw discrete action index
    fn step_index(&mut self, action: i64) -> Result<StepResult> {
        let action = Action::try_from(action)?;
        self.step(action)
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn reset(&mut self, seed: Option<u64>, options: ResetOptions) -> Result<(Vec<f32>, Info)> {
        (**self).reset(seed, options)
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        (**self).step(action)
    }

    fn observation_space(&self) -> SpaceInfo {
        (**self).observation_space()
    }

    fn action_space(&self) -> SpaceInfo {
        (**self).action_space()
    }

    fn status(&self) -> EnvStatus {
        (**self).status()
    }
}

/// Type-erased environment, handy for wrapper stacks chosen at runtime
pub type DynEnv = Box<dyn Environment>;

/// Result of an environment step
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Next observation
    pub observation: Vec<f32>,

    /// Reward received
    pub reward: f32,

    /// Whether the episode terminated
    pub terminated: bool,

    /// Whether the episode was truncated
    pub truncated: bool,

    /// Additional info
    pub info: Info,
}

impl StepResult {
    /// Episode ended for either reason
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Options accepted by [`Environment::reset`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetOptions {
    /// Start the episode at this level instead of level 1
    pub start_level: Option<u32>,
}

/// Game status readable through any wrapper stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvStatus {
    pub running: bool,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
}

/// Space information for observations and actions
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub dtype: SpaceType,

    /// Per-element lower bound (continuous spaces only)
    pub low: Option<Vec<f32>>,

    /// Per-element upper bound (continuous spaces only)
    pub high: Option<Vec<f32>>,
}

impl SpaceInfo {
    pub fn discrete(n: usize) -> Self {
        Self {
            shape: vec![],
            dtype: SpaceType::Discrete(n),
            low: None,
            high: None,
        }
    }

    pub fn continuous(low: Vec<f32>, high: Vec<f32>) -> Self {
        Self {
            shape: vec![low.len()],
            dtype: SpaceType::Continuous,
            low: Some(low),
            high: Some(high),
        }
    }

    /// Number of scalar elements
    pub fn flat_size(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Space data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Continuous space (Box)
    Continuous,
}
