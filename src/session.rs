//! Agent/environment driver loop
//!
//! Runs an agent against an environment, resetting after each finished
//! episode, until a step or episode limit is hit or a callback asks to stop.
//! The driver owns episode bookkeeping; callbacks observe each step through a
//! [`StepContext`] and return `false` to end the session.

use anyhow::Result;
use serde::Serialize;

use crate::agent::Agent;
use crate::env::{EnvStatus, Environment, ResetOptions, StepResult};
use crate::input::Action;

/// What a callback sees after every step
#[derive(Debug)]
pub struct StepContext<'a> {
    /// Steps taken in the whole session, including this one
    pub total_steps: u64,
    /// Index of the current episode (0-based)
    pub episode: u64,
    pub action: Action,
    /// Per-action scores the agent reported for the observation it acted on
    pub action_values: Option<[f32; Action::COUNT]>,
    pub result: &'a StepResult,
    pub status: EnvStatus,
}

/// Hook invoked by [`run`]
pub trait Callback {
    /// Return `false` to stop the session after this step
    fn on_step(&mut self, ctx: &StepContext<'_>) -> bool;

    fn on_episode_end(&mut self, _episode: &EpisodeSummary) {}
}

impl<F: FnMut(&StepContext<'_>) -> bool> Callback for F {
    fn on_step(&mut self, ctx: &StepContext<'_>) -> bool {
        self(ctx)
    }
}

/// Stops the session once the game reports it is no longer running
#[derive(Debug, Default)]
pub struct StopOnQuit;

impl Callback for StopOnQuit {
    fn on_step(&mut self, ctx: &StepContext<'_>) -> bool {
        if !ctx.status.running {
            log::info!("Quit detected, stopping after {} steps", ctx.total_steps);
            return false;
        }
        true
    }
}

/// Logs a line every `every` finished episodes
#[derive(Debug)]
pub struct EpisodeLogger {
    every: u64,
}

impl EpisodeLogger {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Callback for EpisodeLogger {
    fn on_step(&mut self, _ctx: &StepContext<'_>) -> bool {
        true
    }

    fn on_episode_end(&mut self, episode: &EpisodeSummary) {
        if (episode.index + 1) % self.every == 0 {
            log::info!(
                "Episode {} - reward {:.1}, length {}, score {}, max level {}",
                episode.index + 1,
                episode.reward,
                episode.length,
                episode.final_score,
                episode.max_level
            );
        }
    }
}

/// Stop conditions; `None` means unlimited
#[derive(Debug, Clone, Copy, Default)]
pub struct Limits {
    pub max_steps: Option<u64>,
    pub max_episodes: Option<u64>,
}

/// One finished episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub index: u64,
    pub reward: f64,
    pub length: u64,
    /// Score just before the episode ended
    pub final_score: u64,
    /// Highest level seen during the episode
    pub max_level: u32,
    pub truncated: bool,
}

/// Everything a session produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSummary {
    pub total_steps: u64,
    pub episodes: Vec<EpisodeSummary>,
    /// Times each action was chosen, indexed by [`Action::index`]
    pub action_counts: [u64; Action::COUNT],
    /// A callback ended the session
    pub stopped_by_callback: bool,
}

#[derive(Debug, Default)]
struct EpisodeTracker {
    reward: f64,
    length: u64,
    score: u64,
    max_level: u32,
}

impl EpisodeTracker {
    fn start(status: EnvStatus) -> Self {
        Self {
            max_level: status.level,
            score: status.score,
            ..Default::default()
        }
    }

    fn record(&mut self, reward: f32, before: EnvStatus, after: EnvStatus) {
        self.reward += reward as f64;
        self.length += 1;
        // Score only grows within an episode until a game over zeroes it
        self.score = self.score.max(before.score).max(after.score);
        self.max_level = self.max_level.max(before.level).max(after.level);
    }
}

/// Drive `agent` in `env` until a limit is reached or a callback stops it
pub fn run<E, A>(
    env: &mut E,
    agent: &mut A,
    limits: Limits,
    callbacks: &mut [&mut dyn Callback],
) -> Result<SessionSummary>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    let mut summary = SessionSummary::default();
    if limits.max_episodes == Some(0) || limits.max_steps == Some(0) {
        return Ok(summary);
    }

    let (mut obs, _) = env.reset(None, ResetOptions::default())?;
    let mut tracker = EpisodeTracker::start(env.status());

    loop {
        let before = env.status();
        let action_values = agent.action_values(&obs);
        let action = agent.act(&obs);
        summary.action_counts[action.index()] += 1;

        let result = env.step(action)?;
        summary.total_steps += 1;
        let status = env.status();
        tracker.record(result.reward, before, status);

        let ctx = StepContext {
            total_steps: summary.total_steps,
            episode: summary.episodes.len() as u64,
            action,
            action_values,
            result: &result,
            status,
        };
        let mut keep_going = true;
        for callback in callbacks.iter_mut() {
            keep_going &= callback.on_step(&ctx);
        }

        let done = result.done();
        if done {
            let episode = EpisodeSummary {
                index: summary.episodes.len() as u64,
                reward: tracker.reward,
                length: tracker.length,
                final_score: tracker.score,
                max_level: tracker.max_level,
                truncated: result.truncated && !result.terminated,
            };
            for callback in callbacks.iter_mut() {
                callback.on_episode_end(&episode);
            }
            summary.episodes.push(episode);
        }

        if !keep_going {
            summary.stopped_by_callback = true;
            break;
        }
        if limits.max_steps.is_some_and(|max| summary.total_steps >= max) {
            break;
        }
        if limits
            .max_episodes
            .is_some_and(|max| summary.episodes.len() as u64 >= max)
        {
            break;
        }

        if done {
            let (next, _) = env.reset(None, ResetOptions::default())?;
            obs = next;
            tracker = EpisodeTracker::start(env.status());
        } else {
            obs = result.observation;
        }
    }

    Ok(summary)
}
