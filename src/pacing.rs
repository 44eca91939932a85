//! Frame pacing and cooperative quit signalling

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Caps the step rate at `fps` frames per second; `fps == 0` never sleeps.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    fps: u32,
    last_frame: Option<Instant>,
}

impl FrameLimiter {
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            last_frame: None,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Target time per frame, `None` when unthrottled
    pub fn frame_interval(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_secs_f64(1.0 / self.fps as f64))
    }

    /// How long to wait when `elapsed` has passed since the previous frame
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame_interval()
            .map(|interval| interval.saturating_sub(elapsed))
            .unwrap_or(Duration::ZERO)
    }

    /// Wait out the rest of the current frame
    pub fn wait(&mut self) {
        if self.fps == 0 {
            return;
        }
        let now = Instant::now();
        if let Some(last) = self.last_frame {
            let sleep = self.remaining(now.duration_since(last));
            if !sleep.is_zero() {
                std::thread::sleep(sleep);
            }
        }
        self.last_frame = Some(Instant::now());
    }
}

/// Shared quit flag. Any clone may trigger it; the environment polls it once
/// per step.
#[derive(Debug, Clone, Default)]
pub struct QuitSignal(Arc<AtomicBool>);

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unthrottled_never_waits() {
        let mut limiter = FrameLimiter::new(0);
        assert_eq!(limiter.frame_interval(), None);
        assert_eq!(limiter.remaining(Duration::ZERO), Duration::ZERO);

        let start = Instant::now();
        for _ in 0..1000 {
            limiter.wait();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_remaining_time() {
        let limiter = FrameLimiter::new(50);
        assert_eq!(limiter.frame_interval(), Some(Duration::from_millis(20)));
        assert_eq!(
            limiter.remaining(Duration::from_millis(5)),
            Duration::from_millis(15)
        );
        assert_eq!(limiter.remaining(Duration::from_millis(30)), Duration::ZERO);
    }

    #[test]
    fn test_throttled_wait() {
        let mut limiter = FrameLimiter::new(100);
        let start = Instant::now();
        for _ in 0..4 {
            limiter.wait();
        }
        // First frame is free, the next three wait ~10ms each
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn test_quit_signal_shared() {
        let signal = QuitSignal::new();
        let handle = signal.clone();
        assert!(!signal.is_triggered());
        handle.trigger();
        assert!(signal.is_triggered());
    }
}
