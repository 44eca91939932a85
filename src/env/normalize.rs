//! Running observation statistics
//!
//! Mean and variance are tracked with the parallel-axis (Chan et al.) update
//! so batches and single observations merge the same way. Statistics persist
//! as JSON so a policy trained on normalized inputs can be evaluated later.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Running mean and variance normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningMeanStd {
    mean: Vec<f32>,
    var: Vec<f32>,
    count: f64,
    epsilon: f32,
}

impl RunningMeanStd {
    /// Create a normalizer for observations of length `size`
    pub fn new(size: usize, epsilon: f32) -> Self {
        Self {
            mean: vec![0.0; size],
            var: vec![1.0; size],
            count: 1e-4,
            epsilon,
        }
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Update statistics with a batch of observations
    pub fn update<O: AsRef<[f32]>>(&mut self, observations: &[O]) {
        if observations.is_empty() {
            return;
        }

        let batch_size = observations.len() as f64;
        let obs_dim = self.mean.len();

        let mut batch_mean = vec![0.0; obs_dim];
        for obs in observations {
            for (i, &val) in obs.as_ref().iter().enumerate().take(obs_dim) {
                batch_mean[i] += val as f64;
            }
        }
        for val in &mut batch_mean {
            *val /= batch_size;
        }

        let mut batch_var = vec![0.0; obs_dim];
        for obs in observations {
            for (i, &val) in obs.as_ref().iter().enumerate().take(obs_dim) {
                let diff = val as f64 - batch_mean[i];
                batch_var[i] += diff * diff;
            }
        }
        for val in &mut batch_var {
            *val /= batch_size;
        }

        self.merge(&batch_mean, &batch_var, batch_size);
    }

    fn merge(&mut self, batch_mean: &[f64], batch_var: &[f64], batch_size: f64) {
        let total_count = self.count + batch_size;

        for i in 0..self.mean.len().min(batch_mean.len()) {
            let delta = batch_mean[i] - self.mean[i] as f64;
            let m_a = self.var[i] as f64 * self.count;
            let m_b = batch_var[i] * batch_size;
            let m2 = m_a + m_b + delta * delta * self.count * batch_size / total_count;

            self.mean[i] = (self.mean[i] as f64 + delta * batch_size / total_count) as f32;
            self.var[i] = (m2 / total_count) as f32;
        }

        self.count = total_count;
    }

    /// `(obs - mean) / (std + epsilon)`, each element clipped to `±clip`
    pub fn normalize(&self, observation: &[f32], clip: f32) -> Vec<f32> {
        observation
            .iter()
            .zip(&self.mean)
            .zip(&self.var)
            .map(|((&obs, &mean), &var)| {
                ((obs - mean) / (var.sqrt() + self.epsilon)).clamp(-clip, clip)
            })
            .collect()
    }

    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    pub fn var(&self) -> &[f32] {
        &self.var
    }

    /// Number of samples seen
    pub fn count(&self) -> f64 {
        self.count
    }

    /// Save statistics to a JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("writing normalization stats to {}", path.display()))?;
        log::info!("Saved normalization stats to {}", path.display());
        Ok(())
    }

    /// Load statistics from a JSON file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading normalization stats from {}", path.display()))?;
        let stats: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parsing normalization stats in {}", path.display()))?;
        if stats.mean.len() != stats.var.len() {
            bail!(
                "normalization stats in {} have mismatched lengths ({} vs {})",
                path.display(),
                stats.mean.len(),
                stats.var.len()
            );
        }
        Ok(stats)
    }
}
