//! Brick Breaker CLI
//!
//! Subcommands:
//!   demo       Play episodes in real time with a built-in or loaded agent
//!   benchmark  Evaluate an agent over many episodes (optionally against a baseline model)
//!   calibrate  Collect observation normalization statistics and save them
//!   config     Print or write the default game configuration
//!
//! Example:
//!   brick-breaker benchmark --agent linear --model models/brick_breaker.json --episodes 100

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use brick_breaker_rl::agent::{Agent, LinearAgent, RandomAgent, TrackingAgent};
use brick_breaker_rl::benchmark::{self, BenchmarkReport};
use brick_breaker_rl::env::observation::OBS_DIM;
use brick_breaker_rl::env::{
    BrickBreakerEnv, DynEnv, Environment, FrameStack, NormalizeObservation, RenderMode, TimeLimit,
};
use brick_breaker_rl::session::{self, Callback, EpisodeLogger, Limits, StepContext, StopOnQuit};
use brick_breaker_rl::GameConfig;

const DEFAULT_MODEL: &str = "models/brick_breaker.json";
const DEFAULT_STATS: &str = "logs/normalize_stats.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Brick Breaker game and RL environment", long_about = None)]
struct Cli {
    /// Game configuration JSON (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play episodes in real time
    Demo(DemoArgs),
    /// Evaluate an agent and report reward, level progress and action bias
    Benchmark(BenchmarkArgs),
    /// Run random play through the training stack and save normalization stats
    Calibrate(CalibrateArgs),
    /// Print the default configuration, or write it to a file
    Config {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum AgentKind {
    Tracking,
    Random,
    Linear,
}

#[derive(Args, Debug)]
struct AgentArgs {
    #[arg(long, value_enum, default_value_t = AgentKind::Tracking)]
    agent: AgentKind,
    /// Linear model weights (JSON)
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: PathBuf,
    /// Normalization statistics used with the linear model
    #[arg(long, default_value = DEFAULT_STATS)]
    stats: PathBuf,
    /// Seed for the random agent
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Truncate episodes after this many steps
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,
}

#[derive(Args, Debug)]
struct DemoArgs {
    #[command(flatten)]
    agent: AgentArgs,
    #[arg(long, default_value_t = 5)]
    episodes: u64,
    /// Run unthrottled instead of at the human frame rate
    #[arg(long)]
    fast: bool,
}

#[derive(Args, Debug)]
struct BenchmarkArgs {
    #[command(flatten)]
    agent: AgentArgs,
    #[arg(long, default_value_t = 100)]
    episodes: u64,
    /// Baseline linear model to compare against
    #[arg(long)]
    compare: Option<PathBuf>,
    /// Watch the evaluation at the human frame rate
    #[arg(long)]
    render: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CalibrateArgs {
    #[arg(long, default_value_t = 10_000)]
    steps: u64,
    #[arg(long, default_value_t = 4)]
    n_stack: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value = DEFAULT_STATS)]
    stats: PathBuf,
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path),
        None => Ok(GameConfig::default()),
    }
}

/// Load a linear model, or `None` when the file does not exist
fn load_model(path: &Path) -> Result<Option<LinearAgent>> {
    if !path.exists() {
        log::error!(
            "Model not found at {}; train one or pick --agent tracking",
            path.display()
        );
        return Ok(None);
    }
    LinearAgent::load_json(path).map(Some)
}

/// Environment stack matching what the agent was trained on
fn build_env(
    config: &GameConfig,
    mode: RenderMode,
    max_steps: usize,
    model: Option<(&LinearAgent, &Path)>,
) -> Result<DynEnv> {
    let env = TimeLimit::new(BrickBreakerEnv::new(config.clone(), mode)?, max_steps);
    let env: DynEnv = match model {
        Some((model, stats)) => {
            let stacked = FrameStack::new(env, model.n_stack);
            Box::new(NormalizeObservation::load_or_default(stacked, stats))
        }
        None => Box::new(env),
    };
    Ok(env)
}

/// Agent plus the environment it expects; `None` when a model is missing
fn build_agent(
    config: &GameConfig,
    mode: RenderMode,
    args: &AgentArgs,
) -> Result<Option<(Box<dyn Agent>, DynEnv)>> {
    let agent: Box<dyn Agent> = match args.agent {
        AgentKind::Tracking => Box::new(TrackingAgent::default()),
        AgentKind::Random => Box::new(RandomAgent::new(args.seed)),
        AgentKind::Linear => {
            let Some(model) = load_model(&args.model)? else {
                return Ok(None);
            };
            let stats = args.stats.as_path();
            let env = build_env(config, mode, args.max_steps, Some((&model, stats)))?;
            let agent: Box<dyn Agent> = Box::new(model);
            return Ok(Some((agent, env)));
        }
    };
    let env = build_env(config, mode, args.max_steps, None)?;
    Ok(Some((agent, env)))
}

fn cmd_demo(config: &GameConfig, args: DemoArgs) -> Result<()> {
    let mode = if args.fast {
        RenderMode::Training
    } else {
        RenderMode::Human
    };
    let Some((mut agent, mut env)) = build_agent(config, mode, &args.agent)? else {
        return Ok(());
    };

    log::info!(
        "Starting demo with the {} agent for {} episodes",
        agent.name(),
        args.episodes
    );
    let mut stop = StopOnQuit;
    let mut logger = EpisodeLogger::new(1);
    let mut step_report = |ctx: &StepContext<'_>| {
        if let Some([hold, left, right]) = ctx.action_values {
            log::info!(
                "Q-values hold {hold:.3} | left {left:.3} | right {right:.3} -> {}",
                ctx.action.as_str()
            );
        }
        if ctx.result.done() {
            log::info!("Restarting game...");
        }
        true
    };
    let limits = Limits {
        max_steps: None,
        max_episodes: Some(args.episodes),
    };
    let callbacks: &mut [&mut dyn Callback] =
        &mut [&mut stop, &mut logger, &mut step_report];
    let summary = session::run(&mut env, &mut agent, limits, callbacks)?;
    log::info!(
        "Demo finished after {} steps and {} episodes",
        summary.total_steps,
        summary.episodes.len()
    );
    Ok(())
}

fn run_benchmark(
    config: &GameConfig,
    mode: RenderMode,
    args: &AgentArgs,
    episodes: u64,
) -> Result<Option<BenchmarkReport>> {
    let Some((mut agent, mut env)) = build_agent(config, mode, args)? else {
        return Ok(None);
    };
    benchmark::evaluate(&mut env, &mut agent, episodes).map(Some)
}

fn cmd_benchmark(config: &GameConfig, args: BenchmarkArgs) -> Result<()> {
    let mode = if args.render {
        RenderMode::Human
    } else {
        RenderMode::Training
    };
    let Some(report) = run_benchmark(config, mode, &args.agent, args.episodes)? else {
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if let Some(baseline_path) = args.compare {
        let baseline_args = AgentArgs {
            agent: AgentKind::Linear,
            model: baseline_path,
            ..args.agent
        };
        let Some(baseline) = run_benchmark(config, mode, &baseline_args, args.episodes)? else {
            return Ok(());
        };
        let comparison = benchmark::compare(&baseline, &report);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        } else {
            println!("{baseline}");
            println!("{comparison}");
        }
    }
    Ok(())
}

fn cmd_calibrate(config: &GameConfig, args: CalibrateArgs) -> Result<()> {
    let env = BrickBreakerEnv::new(config.clone(), RenderMode::Training)?;
    let mut env = NormalizeObservation::new(FrameStack::new(env, args.n_stack));
    let mut agent = RandomAgent::new(args.seed);

    log::info!(
        "Calibrating over {} steps, observation shape {:?}",
        args.steps,
        env.observation_space().shape
    );
    let start = Instant::now();
    let mut stop = StopOnQuit;
    let limits = Limits {
        max_steps: Some(args.steps),
        max_episodes: None,
    };
    let callbacks: &mut [&mut dyn Callback] = &mut [&mut stop];
    let summary = session::run(&mut env, &mut agent, limits, callbacks)?;
    let elapsed = start.elapsed().as_secs_f64().max(1e-9);

    if let Some(dir) = args.stats.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    env.save_stats(&args.stats)?;

    println!(
        "Ran {} steps ({} episodes) at {:.0} steps/s",
        summary.total_steps,
        summary.episodes.len(),
        summary.total_steps as f64 / elapsed
    );
    let stats = env.stats();
    let last = stats.dim().saturating_sub(OBS_DIM);
    println!("Latest-frame mean: {:?}", &stats.mean()[last..]);
    println!("Latest-frame var:  {:?}", &stats.var()[last..]);
    println!("Saved statistics to {}", args.stats.display());
    Ok(())
}

fn cmd_config(config: &GameConfig, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            config.save(&path)?;
            println!("Wrote configuration to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Demo(a) => cmd_demo(&config, a),
        Commands::Benchmark(a) => cmd_benchmark(&config, a),
        Commands::Calibrate(a) => cmd_calibrate(&config, a),
        Commands::Config { output } => cmd_config(&config, output),
    }
}
