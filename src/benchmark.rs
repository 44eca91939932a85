//! Agent evaluation metrics
//!
//! Plays a fixed number of episodes and reports reward, episode length, how
//! often level 2 was reached and cleared, the action distribution and the
//! right/left bias ratio.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::agent::Agent;
use crate::env::Environment;
use crate::input::Action;
use crate::session::{self, Callback, EpisodeLogger, Limits, SessionSummary, StopOnQuit};

/// How far the right/left ratio strays from 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BiasVerdict {
    /// Ratio within 0.9..=1.1
    Balanced,
    /// Ratio within 0.8..=1.2
    Slight,
    Strong,
}

impl BiasVerdict {
    pub fn from_ratio(ratio: f64) -> Self {
        if (0.9..=1.1).contains(&ratio) {
            BiasVerdict::Balanced
        } else if (0.8..=1.2).contains(&ratio) {
            BiasVerdict::Slight
        } else {
            BiasVerdict::Strong
        }
    }
}

impl fmt::Display for BiasVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiasVerdict::Balanced => write!(f, "balanced (target 0.9-1.1)"),
            BiasVerdict::Slight => write!(f, "slight bias (target 0.9-1.1)"),
            BiasVerdict::Strong => write!(f, "strong bias (target 0.9-1.1)"),
        }
    }
}

/// Right-action count over left-action count.
///
/// With no left actions the ratio is infinite if any right action was taken,
/// otherwise 1.0.
pub fn bias_ratio(counts: &[u64; Action::COUNT]) -> f64 {
    let left = counts[Action::Left.index()];
    let right = counts[Action::Right.index()];
    if left > 0 {
        right as f64 / left as f64
    } else if right > 0 {
        f64::INFINITY
    } else {
        1.0
    }
}

/// Fraction of each action; all zeros when nothing was counted
pub fn action_distribution(counts: &[u64; Action::COUNT]) -> [f64; Action::COUNT] {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return [0.0; Action::COUNT];
    }
    counts.map(|c| c as f64 / total as f64)
}

/// Aggregated results over all episodes
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub agent: String,
    pub episodes: usize,
    pub avg_reward: f64,
    pub std_reward: f64,
    pub avg_length: f64,
    /// Percentage of episodes that reached level 2
    pub level2_reach_rate: f64,
    /// Percentage of episodes that reached level 3 (level 2 cleared)
    pub level2_completion_rate: f64,
    pub action_counts: [u64; Action::COUNT],
    pub action_distribution: [f64; Action::COUNT],
    pub bias_ratio: f64,
    pub verdict: BiasVerdict,
    pub episode_rewards: Vec<f64>,
}

impl BenchmarkReport {
    /// Build a report from a finished session
    pub fn from_session(agent: &str, summary: &SessionSummary) -> Self {
        let rewards: Vec<f64> = summary.episodes.iter().map(|e| e.reward).collect();
        let lengths: Vec<f64> = summary.episodes.iter().map(|e| e.length as f64).collect();
        let (avg_reward, std_reward) = mean_std(&rewards);
        let (avg_length, _) = mean_std(&lengths);

        let reached = |level: u32| {
            summary
                .episodes
                .iter()
                .filter(|e| e.max_level >= level)
                .count()
        };
        let rate = |count: usize| {
            if summary.episodes.is_empty() {
                0.0
            } else {
                count as f64 / summary.episodes.len() as f64 * 100.0
            }
        };

        let ratio = bias_ratio(&summary.action_counts);
        Self {
            agent: agent.to_string(),
            episodes: summary.episodes.len(),
            avg_reward,
            std_reward,
            avg_length,
            level2_reach_rate: rate(reached(2)),
            level2_completion_rate: rate(reached(3)),
            action_counts: summary.action_counts,
            action_distribution: action_distribution(&summary.action_counts),
            bias_ratio: ratio,
            verdict: BiasVerdict::from_ratio(ratio),
            episode_rewards: rewards,
        }
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Benchmark results - {} ({} episodes)", self.agent, self.episodes)?;
        writeln!(
            f,
            "  Average reward:        {:.2} +/- {:.2}",
            self.avg_reward, self.std_reward
        )?;
        writeln!(f, "  Average length:        {:.1}", self.avg_length)?;
        writeln!(f, "  Level 2 reached:       {:.1}%", self.level2_reach_rate)?;
        writeln!(f, "  Level 2 completed:     {:.1}%", self.level2_completion_rate)?;
        let actions: Vec<String> = Action::ALL
            .iter()
            .zip(self.action_distribution)
            .map(|(action, share)| format!("{} {:.1}%", action.as_str(), share * 100.0))
            .collect();
        writeln!(f, "  Actions:               {}", actions.join(" | "))?;
        write!(
            f,
            "  Bias (right/left):     {:.2} - {}",
            self.bias_ratio, self.verdict
        )
    }
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Play `episodes` full episodes and aggregate the results
pub fn evaluate<E, A>(env: &mut E, agent: &mut A, episodes: u64) -> Result<BenchmarkReport>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    log::info!("Running {} benchmark episodes with {}", episodes, agent.name());
    let limits = Limits {
        max_steps: None,
        max_episodes: Some(episodes),
    };
    let mut stop = StopOnQuit;
    let mut logger = EpisodeLogger::new(10);
    let callbacks: &mut [&mut dyn Callback] = &mut [&mut stop, &mut logger];
    let summary = session::run(env, agent, limits, callbacks)?;
    Ok(BenchmarkReport::from_session(agent.name(), &summary))
}

/// Side-by-side comparison of a baseline and a candidate
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Relative change of the average reward, in percent (0 for a zero baseline)
    pub reward_improvement: f64,
    /// Change of the level 2 reach rate, in percentage points
    pub level2_improvement: f64,
    pub baseline_bias: f64,
    pub candidate_bias: f64,
    /// Candidate's bias ratio is closer to 1.0
    pub bias_improved: bool,
}

pub fn compare(baseline: &BenchmarkReport, candidate: &BenchmarkReport) -> Comparison {
    let reward_improvement = if baseline.avg_reward != 0.0 {
        (candidate.avg_reward - baseline.avg_reward) / baseline.avg_reward.abs() * 100.0
    } else {
        0.0
    };
    Comparison {
        reward_improvement,
        level2_improvement: candidate.level2_reach_rate - baseline.level2_reach_rate,
        baseline_bias: baseline.bias_ratio,
        candidate_bias: candidate.bias_ratio,
        bias_improved: (1.0 - candidate.bias_ratio).abs() < (1.0 - baseline.bias_ratio).abs(),
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Comparison")?;
        writeln!(f, "  Reward change:         {:+.1}%", self.reward_improvement)?;
        writeln!(f, "  Level 2 change:        {:+.1} points", self.level2_improvement)?;
        writeln!(f, "  Baseline bias:         {:.2}", self.baseline_bias)?;
        writeln!(f, "  Candidate bias:        {:.2}", self.candidate_bias)?;
        write!(
            f,
            "  Bias corrected:        {}",
            if self.bias_improved { "yes" } else { "no" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{RandomAgent, TrackingAgent};
    use crate::config::GameConfig;
    use crate::env::{BrickBreakerEnv, RenderMode, TimeLimit};
    use crate::session::EpisodeSummary;

    fn episode(index: u64, reward: f64, max_level: u32) -> EpisodeSummary {
        EpisodeSummary {
            index,
            reward,
            length: 100,
            final_score: 0,
            max_level,
            truncated: false,
        }
    }

    fn report(avg_reward: f64, level2: f64, bias: f64) -> BenchmarkReport {
        BenchmarkReport {
            agent: "test".into(),
            episodes: 1,
            avg_reward,
            std_reward: 0.0,
            avg_length: 0.0,
            level2_reach_rate: level2,
            level2_completion_rate: 0.0,
            action_counts: [0; 3],
            action_distribution: [0.0; 3],
            bias_ratio: bias,
            verdict: BiasVerdict::from_ratio(bias),
            episode_rewards: vec![],
        }
    }

    #[test]
    fn test_bias_ratio_guards() {
        assert_eq!(bias_ratio(&[5, 10, 12]), 1.2);
        assert_eq!(bias_ratio(&[5, 0, 3]), f64::INFINITY);
        assert_eq!(bias_ratio(&[5, 0, 0]), 1.0);
        assert_eq!(bias_ratio(&[0, 0, 0]), 1.0);
    }

    #[test]
    fn test_verdict_bands() {
        assert_eq!(BiasVerdict::from_ratio(1.0), BiasVerdict::Balanced);
        assert_eq!(BiasVerdict::from_ratio(0.9), BiasVerdict::Balanced);
        assert_eq!(BiasVerdict::from_ratio(1.15), BiasVerdict::Slight);
        assert_eq!(BiasVerdict::from_ratio(0.8), BiasVerdict::Slight);
        // Band edges are inclusive
        assert_eq!(BiasVerdict::from_ratio(1.1), BiasVerdict::Balanced);
        assert_eq!(BiasVerdict::from_ratio(1.2), BiasVerdict::Slight);
        assert_eq!(BiasVerdict::from_ratio(1.25), BiasVerdict::Strong);
        assert_eq!(BiasVerdict::from_ratio(0.79), BiasVerdict::Strong);
        assert_eq!(BiasVerdict::from_ratio(0.5), BiasVerdict::Strong);
        assert_eq!(BiasVerdict::from_ratio(f64::INFINITY), BiasVerdict::Strong);
    }

    #[test]
    fn test_action_distribution() {
        assert_eq!(action_distribution(&[0, 0, 0]), [0.0; 3]);
        assert_eq!(action_distribution(&[1, 1, 2]), [0.25, 0.25, 0.5]);
    }

    #[test]
    fn test_report_from_session() {
        let summary = SessionSummary {
            total_steps: 400,
            episodes: vec![
                episode(0, 10.0, 1),
                episode(1, 20.0, 2),
                episode(2, 30.0, 3),
                episode(3, 40.0, 2),
            ],
            action_counts: [100, 150, 150],
            stopped_by_callback: false,
        };

        let report = BenchmarkReport::from_session("tracking", &summary);
        assert_eq!(report.episodes, 4);
        assert_eq!(report.avg_reward, 25.0);
        assert!((report.std_reward - 125.0f64.sqrt()).abs() < 1e-9);
        assert_eq!(report.avg_length, 100.0);
        assert_eq!(report.level2_reach_rate, 75.0);
        assert_eq!(report.level2_completion_rate, 25.0);
        assert_eq!(report.bias_ratio, 1.0);
        assert_eq!(report.verdict, BiasVerdict::Balanced);
    }

    #[test]
    fn test_empty_session_report() {
        let report = BenchmarkReport::from_session("none", &SessionSummary::default());
        assert_eq!(report.episodes, 0);
        assert_eq!(report.avg_reward, 0.0);
        assert_eq!(report.level2_reach_rate, 0.0);
        assert_eq!(report.action_distribution, [0.0; 3]);
    }

    #[test]
    fn test_compare() {
        let cmp = compare(&report(100.0, 10.0, 1.5), &report(150.0, 30.0, 1.05));
        assert_eq!(cmp.reward_improvement, 50.0);
        assert_eq!(cmp.level2_improvement, 20.0);
        assert!(cmp.bias_improved);

        let negative_baseline = compare(&report(-100.0, 0.0, 1.0), &report(-50.0, 0.0, 1.0));
        assert_eq!(negative_baseline.reward_improvement, 50.0);
        assert!(!negative_baseline.bias_improved);

        let zero = compare(&report(0.0, 0.0, 1.0), &report(42.0, 0.0, 1.0));
        assert_eq!(zero.reward_improvement, 0.0);
    }

    #[test]
    fn test_evaluate_runs_all_episodes() {
        let env = BrickBreakerEnv::new(GameConfig::default(), RenderMode::Training).unwrap();
        let mut env = TimeLimit::new(env, 50);

        let report = evaluate(&mut env, &mut TrackingAgent::default(), 3).unwrap();
        assert_eq!(report.episodes, 3);
        assert_eq!(report.avg_length, 50.0);
        assert_eq!(report.episode_rewards.len(), 3);

        let report = evaluate(&mut env, &mut RandomAgent::new(4), 2).unwrap();
        assert_eq!(report.agent, "random");
        assert_eq!(report.action_counts.iter().sum::<u64>(), 100);
    }
}
