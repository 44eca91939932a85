//! Built-in agents
//!
//! Stand-ins for trained policies: a ball-tracking heuristic, a seeded random
//! agent, and a linear Q-value agent whose weights come from a JSON artifact.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::env::observation::OBS_DIM;
use crate::input::Action;

/// A policy mapping observations to actions
pub trait Agent {
    fn name(&self) -> &str;

    fn act(&mut self, observation: &[f32]) -> Action;

    /// Per-action scores for an observation, if the agent has them
    fn action_values(&self, _observation: &[f32]) -> Option<[f32; Action::COUNT]> {
        None
    }
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn act(&mut self, observation: &[f32]) -> Action {
        (**self).act(observation)
    }

    fn action_values(&self, observation: &[f32]) -> Option<[f32; Action::COUNT]> {
        (**self).action_values(observation)
    }
}

/// Index of the largest value; ties go to the lowest index
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, best_v), (i, &v)| {
            if v > best_v { (i, v) } else { (best, best_v) }
        })
        .0
}

/// Follows the ball's projected x position.
///
/// Reads the most recent raw frame (the last five values), so it works on
/// plain or frame-stacked observations but not normalized ones.
#[derive(Debug, Clone)]
pub struct TrackingAgent {
    /// Tolerance around the paddle center, in screen-width units
    pub dead_zone: f32,
    /// Lead distance per unit of observed ball vx; 0.1 is about four steps
    /// ahead with the default screen and velocity ceiling
    pub lead: f32,
}

impl Default for TrackingAgent {
    fn default() -> Self {
        Self {
            dead_zone: 0.02,
            lead: 0.1,
        }
    }
}

impl Agent for TrackingAgent {
    fn name(&self) -> &str {
        "tracking"
    }

    fn act(&mut self, observation: &[f32]) -> Action {
        if observation.len() < OBS_DIM {
            return Action::Hold;
        }
        let frame = &observation[observation.len() - OBS_DIM..];
        let (paddle_x, ball_x, ball_vx) = (frame[0], frame[1], frame[3]);

        let target = ball_x + ball_vx * self.lead;
        let diff = target - paddle_x;
        if diff > self.dead_zone {
            Action::Right
        } else if diff < -self.dead_zone {
            Action::Left
        } else {
            Action::Hold
        }
    }
}

/// Uniform random actions from a seeded stream
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: Pcg32,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, _observation: &[f32]) -> Action {
        Action::ALL[self.rng.random_range(0..Action::COUNT)]
    }
}

/// Linear Q-values: `q = W · obs + b`, greedy action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearAgent {
    /// Frames the model expects stacked in its input
    pub n_stack: usize,
    /// One row per action, each `n_stack * 5` long
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl LinearAgent {
    pub fn new(n_stack: usize, weights: Vec<Vec<f32>>, bias: Vec<f32>) -> Result<Self> {
        let agent = Self {
            n_stack,
            weights,
            bias,
        };
        agent.validate()?;
        Ok(agent)
    }

    /// Expected observation length
    pub fn input_dim(&self) -> usize {
        self.n_stack * OBS_DIM
    }

    fn validate(&self) -> Result<()> {
        if self.n_stack == 0 {
            bail!("model must stack at least one frame");
        }
        if self.weights.len() != Action::COUNT || self.bias.len() != Action::COUNT {
            bail!(
                "model needs {} weight rows and biases, found {} and {}",
                Action::COUNT,
                self.weights.len(),
                self.bias.len()
            );
        }
        let dim = self.input_dim();
        if let Some(row) = self.weights.iter().find(|row| row.len() != dim) {
            bail!("weight row has {} entries, expected {}", row.len(), dim);
        }
        Ok(())
    }

    /// Q-values for one observation
    pub fn q_values(&self, observation: &[f32]) -> [f32; Action::COUNT] {
        let mut q = [0.0; Action::COUNT];
        for (i, (row, b)) in self.weights.iter().zip(&self.bias).enumerate() {
            q[i] = row.iter().zip(observation).map(|(w, x)| w * x).sum::<f32>() + b;
        }
        q
    }

    /// Save model to JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing model to {}", path.display()))?;
        Ok(())
    }

    /// Load model from JSON file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading model from {}", path.display()))?;
        let agent: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parsing model in {}", path.display()))?;
        agent
            .validate()
            .with_context(|| format!("invalid model in {}", path.display()))?;
        log::info!(
            "Loaded linear model from {} ({} stacked frames)",
            path.display(),
            agent.n_stack
        );
        Ok(agent)
    }
}

impl Agent for LinearAgent {
    fn name(&self) -> &str {
        "linear"
    }

    fn act(&mut self, observation: &[f32]) -> Action {
        Action::ALL[argmax(&self.q_values(observation))]
    }

    fn action_values(&self, observation: &[f32]) -> Option<[f32; Action::COUNT]> {
        Some(self.q_values(observation))
    }
}
