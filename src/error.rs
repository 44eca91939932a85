//! Typed errors for configuration and the action boundary

use core::fmt;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NotPositive { field: &'static str, value: f32 },
    NoLives,
    EmptyGrid,
    LaunchRange { min: f32, max: f32 },
    SpeedBounds { min_vertical: f32, max: f32 },
    Probability(f64),
    DoesNotFit(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::NoLives => write!(f, "initial_lives must be at least 1"),
            Self::EmptyGrid => write!(f, "brick grid needs at least one row and column"),
            Self::LaunchRange { min, max } => {
                write!(f, "launch speed range [{min}, {max}] is invalid")
            }
            Self::SpeedBounds { min_vertical, max } => write!(
                f,
                "min_vertical_speed {min_vertical} must be in [0, max_speed {max})"
            ),
            Self::Probability(p) => write!(f, "special_chance {p} is not a probability"),
            Self::DoesNotFit(what) => write!(f, "{what} does not fit on the screen"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Action index outside the discrete action space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAction(pub i64);

impl fmt::Display for InvalidAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid action {} (expected 0=hold, 1=left, 2=right)", self.0)
    }
}

impl std::error::Error for InvalidAction {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            InvalidAction(7).to_string(),
            "invalid action 7 (expected 0=hold, 1=left, 2=right)"
        );
        assert_eq!(
            ConfigError::DoesNotFit("paddle").to_string(),
            "paddle does not fit on the screen"
        );
    }
}
