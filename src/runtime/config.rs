//! Runtime configuration.

use std::error::Error as StdError;
use std::fmt;

/// Steps a fiber takes per turn when no other value is configured.
pub const DEFAULT_STEPS_PER_TURN: usize = 1;

/// Scheduling configuration for a [`Runtime`](super::Runtime).
///
/// Configurations are plain data: they describe scheduling but never run
/// anything, so they are easy to clone, compare and persist.
///
/// # Examples
///
/// ```rust
/// use kleisli::RuntimeConfig;
///
/// let config = RuntimeConfig::default().with_steps_per_turn(8);
/// assert_eq!(config.steps_per_turn(), 8);
///
/// assert!(RuntimeConfig::try_new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuntimeConfig {
    steps_per_turn: usize,
}

/// Reasons a [`RuntimeConfig`] can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A turn must advance a fiber by at least one step.
    ZeroStepsPerTurn,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroStepsPerTurn => write!(f, "steps_per_turn must be at least 1"),
        }
    }
}

impl StdError for ConfigError {}

impl RuntimeConfig {
    /// A configuration taking `steps_per_turn` steps per turn, if valid.
    pub fn try_new(steps_per_turn: usize) -> Result<Self, ConfigError> {
        if steps_per_turn == 0 {
            return Err(ConfigError::ZeroStepsPerTurn);
        }
        Ok(RuntimeConfig { steps_per_turn })
    }

    /// Set how many steps a fiber may take before yielding its turn.
    ///
    /// # Panics
    ///
    /// Panics if `steps_per_turn` is zero: a turn that never advances its
    /// fiber would make the runtime spin forever.
    ///
    /// ```rust,should_panic
    /// use kleisli::RuntimeConfig;
    ///
    /// let _ = RuntimeConfig::default().with_steps_per_turn(0);
    /// ```
    pub fn with_steps_per_turn(self, steps_per_turn: usize) -> Self {
        match RuntimeConfig::try_new(steps_per_turn) {
            Ok(config) => config,
            Err(error) => panic!("invalid runtime configuration: {}", error),
        }
    }

    /// How many steps a fiber may take before yielding its turn.
    pub fn steps_per_turn(&self) -> usize {
        self.steps_per_turn
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            steps_per_turn: DEFAULT_STEPS_PER_TURN,
        }
    }
}
