//! Environment wrappers
//!
//! Each wrapper owns the environment it decorates and implements
//! [`Environment`] itself, so they nest freely. The usual training stack is
//!
//! ```text
//! AutoReset(NormalizeObservation(FrameStack(TimeLimit(BrickBreakerEnv))))
//! ```

use std::collections::VecDeque;
use std::path::Path;

use anyhow::{Result, bail};
use serde_json::json;

use super::{EnvStatus, Environment, Info, ResetOptions, RunningMeanStd, SpaceInfo, StepResult};
use crate::input::Action;

/// Default clip range for normalized observations
pub const DEFAULT_CLIP: f32 = 10.0;

const NORM_EPSILON: f32 = 1e-8;

/// Info key holding the last observation of a finished episode
pub const TERMINAL_OBSERVATION: &str = "terminal_observation";

macro_rules! inner_access {
    () => {
        pub fn inner(&self) -> &E {
            &self.env
        }

        pub fn inner_mut(&mut self) -> &mut E {
            &mut self.env
        }

        pub fn into_inner(self) -> E {
            self.env
        }
    };
}

/// Truncates episodes after a fixed number of steps
#[derive(Debug)]
pub struct TimeLimit<E> {
    env: E,
    max_steps: usize,
    elapsed: usize,
}

impl<E: Environment> TimeLimit<E> {
    pub fn new(env: E, max_steps: usize) -> Self {
        Self {
            env,
            max_steps,
            elapsed: 0,
        }
    }

    /// Steps taken in the current episode
    pub fn elapsed(&self) -> usize {
        self.elapsed
    }

    inner_access!();
}

impl<E: Environment> Environment for TimeLimit<E> {
    fn reset(&mut self, seed: Option<u64>, options: ResetOptions) -> Result<(Vec<f32>, Info)> {
        self.elapsed = 0;
        self.env.reset(seed, options)
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        let mut result = self.env.step(action)?;
        self.elapsed += 1;
        if self.elapsed >= self.max_steps && !result.terminated {
            result.truncated = true;
        }
        Ok(result)
    }

    fn observation_space(&self) -> SpaceInfo {
        self.env.observation_space()
    }

    fn action_space(&self) -> SpaceInfo {
        self.env.action_space()
    }

    fn status(&self) -> EnvStatus {
        self.env.status()
    }
}

/// Concatenates the last `n` observations, oldest first
#[derive(Debug)]
pub struct FrameStack<E> {
    env: E,
    n: usize,
    frame_dim: usize,
    frames: VecDeque<Vec<f32>>,
}

impl<E: Environment> FrameStack<E> {
    pub fn new(env: E, n: usize) -> Self {
        let n = n.max(1);
        let frame_dim = env.observation_space().flat_size();
        let frames = (0..n).map(|_| vec![0.0; frame_dim]).collect();
        Self {
            env,
            n,
            frame_dim,
            frames,
        }
    }

    pub fn n_stack(&self) -> usize {
        self.n
    }

    fn push(&mut self, frame: Vec<f32>) {
        self.frames.pop_front();
        self.frames.push_back(frame);
    }

    fn stacked(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.n * self.frame_dim);
        for frame in &self.frames {
            out.extend_from_slice(frame);
        }
        out
    }

    inner_access!();
}

impl<E: Environment> Environment for FrameStack<E> {
    fn reset(&mut self, seed: Option<u64>, options: ResetOptions) -> Result<(Vec<f32>, Info)> {
        let (obs, info) = self.env.reset(seed, options)?;
        for frame in &mut self.frames {
            frame.iter_mut().for_each(|v| *v = 0.0);
        }
        self.push(obs);
        Ok((self.stacked(), info))
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        let mut result = self.env.step(action)?;
        self.push(std::mem::take(&mut result.observation));
        result.observation = self.stacked();
        Ok(result)
    }

    fn observation_space(&self) -> SpaceInfo {
        let inner = self.env.observation_space();
        match (inner.low, inner.high) {
            (Some(low), Some(high)) => {
                SpaceInfo::continuous(low.repeat(self.n), high.repeat(self.n))
            }
            _ => SpaceInfo {
                shape: vec![self.n * self.frame_dim],
                dtype: inner.dtype,
                low: None,
                high: None,
            },
        }
    }

    fn action_space(&self) -> SpaceInfo {
        self.env.action_space()
    }

    fn status(&self) -> EnvStatus {
        self.env.status()
    }
}

/// Normalizes observations with running statistics
#[derive(Debug)]
pub struct NormalizeObservation<E> {
    env: E,
    stats: RunningMeanStd,
    clip: f32,
    training: bool,
}

impl<E: Environment> NormalizeObservation<E> {
    /// Fresh statistics, updated on every observation
    pub fn new(env: E) -> Self {
        let dim = env.observation_space().flat_size();
        Self {
            env,
            stats: RunningMeanStd::new(dim, NORM_EPSILON),
            clip: DEFAULT_CLIP,
            training: true,
        }
    }

    /// Frozen statistics loaded from `path`
    pub fn load(env: E, path: impl AsRef<Path>) -> Result<Self> {
        let mut wrapper = Self::new(env);
        wrapper.load_stats(path)?;
        wrapper.training = false;
        Ok(wrapper)
    }

    /// Frozen statistics from `path`, or untrained pass-through statistics when
    /// the file is missing or unreadable
    pub fn load_or_default(env: E, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut wrapper = Self::new(env);
        if let Err(e) = wrapper.load_stats(path) {
            log::warn!("Normalization stats unavailable ({e:#}); using untrained statistics");
        }
        wrapper.training = false;
        wrapper
    }

    pub fn with_clip(mut self, clip: f32) -> Self {
        self.clip = clip;
        self
    }

    pub fn training(&self) -> bool {
        self.training
    }

    /// Toggle whether observations update the statistics
    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    pub fn stats(&self) -> &RunningMeanStd {
        &self.stats
    }

    pub fn save_stats(&self, path: impl AsRef<Path>) -> Result<()> {
        self.stats.save_json(path)
    }

    pub fn load_stats(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let stats = RunningMeanStd::load_json(path)?;
        if stats.dim() != self.stats.dim() {
            bail!(
                "normalization stats have {} dimensions, environment has {}",
                stats.dim(),
                self.stats.dim()
            );
        }
        self.stats = stats;
        Ok(())
    }

    fn process(&mut self, obs: &[f32]) -> Vec<f32> {
        if self.training {
            self.stats.update(&[obs]);
        }
        self.stats.normalize(obs, self.clip)
    }

    inner_access!();
}

impl<E: Environment> Environment for NormalizeObservation<E> {
    fn reset(&mut self, seed: Option<u64>, options: ResetOptions) -> Result<(Vec<f32>, Info)> {
        let (obs, info) = self.env.reset(seed, options)?;
        Ok((self.process(&obs), info))
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        let mut result = self.env.step(action)?;
        result.observation = self.process(&result.observation);
        Ok(result)
    }

    fn observation_space(&self) -> SpaceInfo {
        let dim = self.stats.dim();
        SpaceInfo::continuous(vec![-self.clip; dim], vec![self.clip; dim])
    }

    fn action_space(&self) -> SpaceInfo {
        self.env.action_space()
    }

    fn status(&self) -> EnvStatus {
        self.env.status()
    }
}

/// Starts a new episode as soon as one ends
///
/// The returned observation is the first of the new episode; the final one is
/// kept in `info["terminal_observation"]`.
#[derive(Debug)]
pub struct AutoReset<E> {
    env: E,
    episodes: u64,
}

impl<E: Environment> AutoReset<E> {
    pub fn new(env: E) -> Self {
        Self { env, episodes: 0 }
    }

    /// Episodes completed so far
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    inner_access!();
}

impl<E: Environment> Environment for AutoReset<E> {
    fn reset(&mut self, seed: Option<u64>, options: ResetOptions) -> Result<(Vec<f32>, Info)> {
        self.env.reset(seed, options)
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        let mut result = self.env.step(action)?;
        if result.done() {
            self.episodes += 1;
            result
                .info
                .insert(TERMINAL_OBSERVATION.into(), json!(result.observation));
            let (obs, _) = self.env.reset(None, ResetOptions::default())?;
            result.observation = obs;
        }
        Ok(result)
    }

    fn observation_space(&self) -> SpaceInfo {
        self.env.observation_space()
    }

    fn action_space(&self) -> SpaceInfo {
        self.env.action_space()
    }

    fn status(&self) -> EnvStatus {
        self.env.status()
    }
}
