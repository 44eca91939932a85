//! Property tests over the public environment API

use brick_breaker_rl::env::wrappers::TERMINAL_OBSERVATION;
use brick_breaker_rl::env::{AutoReset, FrameStack, NormalizeObservation, TimeLimit};
use brick_breaker_rl::{Action, BrickBreakerEnv, Environment, GameConfig, RenderMode, ResetOptions};
use proptest::prelude::*;

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Hold), Just(Action::Left), Just(Action::Right)]
}

fn make_env() -> BrickBreakerEnv {
    BrickBreakerEnv::new(GameConfig::default(), RenderMode::Training).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn paddle_stays_on_screen(
        seed in any::<u64>(),
        actions in prop::collection::vec(action_strategy(), 1..400),
    ) {
        let mut env = make_env();
        env.reset(Some(seed), ResetOptions::default()).unwrap();
        let width = env.config().screen.width;

        for action in actions {
            env.step(action).unwrap();
            let paddle = env.state().paddle.rect();
            prop_assert!(paddle.left() >= 0.0);
            prop_assert!(paddle.right() <= width);
        }
    }

    #[test]
    fn score_moves_in_brick_multiples(
        seed in any::<u64>(),
        actions in prop::collection::vec(action_strategy(), 1..600),
    ) {
        let mut env = make_env();
        env.reset(Some(seed), ResetOptions::default()).unwrap();
        let points = env.config().bricks.points;

        let mut last = env.status().score;
        for action in actions {
            let result = env.step(action).unwrap();
            let score = env.status().score;
            if result.terminated {
                prop_assert_eq!(score, 0);
            } else {
                prop_assert!(score >= last);
                prop_assert_eq!((score - last) % points, 0);
            }
            last = score;
        }
    }

    #[test]
    fn observations_are_finite(
        seed in any::<u64>(),
        actions in prop::collection::vec(action_strategy(), 1..300),
    ) {
        let mut env = make_env();
        let (obs, _) = env.reset(Some(seed), ResetOptions::default()).unwrap();
        prop_assert_eq!(obs.len(), 5);

        for action in actions {
            let result = env.step(action).unwrap();
            prop_assert!(result.observation.iter().all(|v| v.is_finite()));
            prop_assert!(result.reward.is_finite());
        }
    }
}

#[test]
fn training_stack_shapes_and_auto_reset() {
    let env = TimeLimit::new(make_env(), 30);
    let mut env = AutoReset::new(NormalizeObservation::new(FrameStack::new(env, 4)));

    let (obs, _) = env.reset(Some(11), ResetOptions::default()).unwrap();
    assert_eq!(obs.len(), 20);
    assert_eq!(env.observation_space().shape, vec![20]);

    let mut saw_terminal = false;
    for _ in 0..30 {
        let result = env.step(Action::Hold).unwrap();
        assert_eq!(result.observation.len(), 20);
        assert!(result.observation.iter().all(|v| v.abs() <= 10.0));
        if let Some(terminal) = result.info.get(TERMINAL_OBSERVATION) {
            assert!(result.truncated);
            assert_eq!(terminal.as_array().map(Vec::len), Some(20));
            saw_terminal = true;
        }
    }
    assert!(saw_terminal);
    assert_eq!(env.episodes(), 1);
}

#[test]
fn quit_is_visible_through_wrappers() {
    let inner = make_env();
    let quit = inner.quit_signal();
    let mut env = NormalizeObservation::new(FrameStack::new(TimeLimit::new(inner, 1000), 4));
    env.reset(Some(2), ResetOptions::default()).unwrap();

    assert!(env.status().running);
    quit.trigger();
    let result = env.step(Action::Left).unwrap();
    assert!(result.terminated);
    assert!(!env.status().running);
}
