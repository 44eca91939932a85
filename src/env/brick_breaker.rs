//! Brick breaker as an RL environment
//!
//! Each step polls the quit signal, waits on the frame limiter, advances the
//! simulation by one tick, renders a frame and returns the shaped reward with
//! the next observation.
//!
//! # Observation
//!
//! Five floats: paddle center x and ball center x over the screen width, ball
//! center y over the screen height, and both ball velocity components over the
//! velocity ceiling.
//!
//! # Actions
//!
//! `Discrete(3)`: 0 hold, 1 left, 2 right.

use anyhow::Result;
use serde_json::json;

use super::observation::{OBS_DIM, OBS_HIGH, OBS_LOW, observe};
use super::{EnvStatus, Environment, Info, ResetOptions, SpaceInfo, StepResult, reward};
use crate::config::GameConfig;
use crate::input::Action;
use crate::pacing::{FrameLimiter, QuitSignal};
use crate::renderer::{Canvas, VertexCanvas, scene};
use crate::sim::{GameState, StepEvents, tick};

/// Pacing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Real time at `human_fps`
    Human,
    /// As fast as `train_fps` allows (0 = unthrottled)
    #[default]
    Training,
}

impl RenderMode {
    pub fn fps(self, config: &GameConfig) -> u32 {
        match self {
            RenderMode::Human => config.timing.human_fps,
            RenderMode::Training => config.timing.train_fps,
        }
    }
}

/// The game wrapped behind the [`Environment`] protocol
#[derive(Debug)]
pub struct BrickBreakerEnv<C: Canvas = VertexCanvas> {
    config: GameConfig,
    state: GameState,
    canvas: C,
    limiter: FrameLimiter,
    quit: QuitSignal,
    render_mode: RenderMode,
}

impl BrickBreakerEnv<VertexCanvas> {
    /// Environment drawing into an offscreen vertex canvas
    pub fn new(config: GameConfig, render_mode: RenderMode) -> Result<Self> {
        let canvas = VertexCanvas::new(config.screen.width, config.screen.height);
        Self::with_canvas(config, render_mode, canvas)
    }
}

impl<C: Canvas> BrickBreakerEnv<C> {
    /// Environment drawing into a caller-supplied canvas
    pub fn with_canvas(config: GameConfig, render_mode: RenderMode, canvas: C) -> Result<Self> {
        config.validate()?;
        let state = GameState::new(&config, rand::random());
        let limiter = FrameLimiter::new(render_mode.fps(&config));
        log::debug!(
            "Environment created ({:?}, {} fps, seed {})",
            render_mode,
            limiter.fps(),
            state.seed
        );
        Ok(Self {
            config,
            state,
            canvas,
            limiter,
            quit: QuitSignal::new(),
            render_mode,
        })
    }

    /// Use an externally owned quit signal (e.g. one shared with an input thread)
    pub fn with_quit_signal(mut self, quit: QuitSignal) -> Self {
        self.quit = quit;
        self
    }

    /// Handle that stops the game at the next step
    pub fn quit_signal(&self) -> QuitSignal {
        self.quit.clone()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    fn observation(&self) -> Vec<f32> {
        observe(&self.state, &self.config).to_vec()
    }

    fn info(&self) -> Info {
        let mut info = Info::new();
        info.insert("score".into(), json!(self.state.score));
        info.insert("lives".into(), json!(self.state.lives));
        info.insert("level".into(), json!(self.state.level));
        info.insert(
            "bricks_remaining".into(),
            json!(self.state.bricks_remaining()),
        );
        info
    }
}

impl<C: Canvas> Environment for BrickBreakerEnv<C> {
    fn reset(&mut self, seed: Option<u64>, options: ResetOptions) -> Result<(Vec<f32>, Info)> {
        if let Some(seed) = seed {
            self.state.reseed(seed);
        }
        self.state.reset_game(&self.config);

        if let Some(level) = options.start_level {
            self.state.level = level.max(1);
            self.state.create_bricks(&self.config);
            self.state.reset_ball(&self.config);
        }

        Ok((self.observation(), self.info()))
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        if self.state.running && self.quit.is_triggered() {
            log::info!("Quit requested, stopping at score {}", self.state.score);
            self.state.running = false;
        }

        self.limiter.wait();

        let events = if self.state.running {
            tick(&mut self.state, &self.config, action)
        } else {
            StepEvents::default()
        };

        scene::draw(&self.state, &mut self.canvas);

        let reward = reward::compute(&self.state, &events, &self.config).total();
        let terminated = events.game_over || !self.state.running;

        Ok(StepResult {
            observation: self.observation(),
            reward,
            terminated,
            truncated: false,
            info: self.info(),
        })
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo::continuous(OBS_LOW.to_vec(), OBS_HIGH.to_vec())
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo::discrete(Action::COUNT)
    }

    fn status(&self) -> EnvStatus {
        EnvStatus {
            running: self.state.running,
            score: self.state.score,
            lives: self.state.lives,
            level: self.state.level,
        }
    }
}
