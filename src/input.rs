//! Paddle actions and input sources
//!
//! Agents send discrete action indices, humans send key states. Both end up as
//! an [`Action`] so the paddle movement rule is identical for either source.

use serde::{Deserialize, Serialize};

use crate::error::InvalidAction;
use crate::pacing::QuitSignal;

/// Discrete paddle action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Hold,
    Left,
    Right,
}

impl Action {
    /// Number of discrete actions
    pub const COUNT: usize = 3;

    pub const ALL: [Action; Self::COUNT] = [Action::Hold, Action::Left, Action::Right];

    /// Index in the discrete action space
    pub fn index(self) -> usize {
        match self {
            Action::Hold => 0,
            Action::Left => 1,
            Action::Right => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Hold => "hold",
            Action::Left => "left",
            Action::Right => "right",
        }
    }
}

impl TryFrom<i64> for Action {
    type Error = InvalidAction;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Hold),
            1 => Ok(Action::Left),
            2 => Ok(Action::Right),
            other => Err(InvalidAction(other)),
        }
    }
}

impl From<Action> for i64 {
    fn from(action: Action) -> Self {
        action.index() as i64
    }
}

/// Raw key state polled once per frame in human mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub quit: bool,
}

impl KeyState {
    /// Map held keys to an action; right wins when both are held
    pub fn action(&self) -> Action {
        if self.right {
            Action::Right
        } else if self.left {
            Action::Left
        } else {
            Action::Hold
        }
    }

    /// Resolve one polled frame: a held quit key raises `quit` for the
    /// environment to observe on its next step, movement keys become the action
    pub fn apply(&self, quit: &QuitSignal) -> Action {
        if self.quit {
            quit.trigger();
        }
        self.action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_index() {
        assert_eq!(Action::try_from(0), Ok(Action::Hold));
        assert_eq!(Action::try_from(1), Ok(Action::Left));
        assert_eq!(Action::try_from(2), Ok(Action::Right));
        assert_eq!(Action::try_from(3), Err(InvalidAction(3)));
        assert_eq!(Action::try_from(-1), Err(InvalidAction(-1)));
    }

    #[test]
    fn test_action_index_matches_conversion() {
        for action in Action::ALL {
            assert_eq!(Action::try_from(i64::from(action)), Ok(action));
        }
    }

    #[test]
    fn test_key_state_mapping() {
        assert_eq!(KeyState::default().action(), Action::Hold);
        let left = KeyState {
            left: true,
            ..Default::default()
        };
        assert_eq!(left.action(), Action::Left);
        let both = KeyState {
            left: true,
            right: true,
            quit: false,
        };
        assert_eq!(both.action(), Action::Right);
    }

    #[test]
    fn test_key_state_apply_raises_quit() {
        let quit = QuitSignal::new();
        let keys = KeyState {
            left: true,
            ..Default::default()
        };
        assert_eq!(keys.apply(&quit), Action::Left);
        assert!(!quit.is_triggered());

        let keys = KeyState {
            right: true,
            quit: true,
            ..Default::default()
        };
        assert_eq!(keys.apply(&quit), Action::Right);
        assert!(quit.is_triggered());
    }
}
