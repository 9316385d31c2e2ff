//! Machine configuration: the alphabet, the start and terminal states, and the run limits.

use crate::types::TuringMachineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The conventional start state of a state-table program.
pub const DEFAULT_START_STATE: &str = "Q1";
/// The conventional terminal state of a state-table program.
pub const DEFAULT_TERMINAL_STATE: &str = "Q0";
/// The default limit on the number of occupied tape cells.
pub const DEFAULT_MAX_TAPE_LENGTH: usize = 10_000;

/// Configuration of a Turing Machine, independent of the program it runs.
///
/// ```json
/// { "alphabet": "1+", "start_state": "Q1", "terminal_state": "Q0",
///   "max_tape_length": 100, "max_steps": 100 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// The symbols the tape may contain. The blank symbol is always added.
    pub alphabet: String,
    pub start_state: String,
    pub terminal_state: String,
    /// Maximum number of occupied tape cells. Must be greater than zero.
    pub max_tape_length: usize,
    /// Maximum number of steps, `0` disables the limit.
    pub max_steps: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            alphabet: String::new(),
            start_state: DEFAULT_START_STATE.to_string(),
            terminal_state: DEFAULT_TERMINAL_STATE.to_string(),
            max_tape_length: DEFAULT_MAX_TAPE_LENGTH,
            max_steps: 0,
        }
    }
}

impl MachineConfig {
    /// Creates a configuration with the default states and limits for `alphabet`.
    pub fn new(alphabet: impl Into<String>) -> Self {
        Self {
            alphabet: alphabet.into(),
            ..Self::default()
        }
    }

    pub fn with_states(
        mut self,
        start_state: impl Into<String>,
        terminal_state: impl Into<String>,
    ) -> Self {
        self.start_state = start_state.into();
        self.terminal_state = terminal_state.into();
        self
    }

    pub fn with_limits(mut self, max_tape_length: usize, max_steps: u64) -> Self {
        self.max_tape_length = max_tape_length;
        self.max_steps = max_steps;
        self
    }

    /// Parses a configuration from JSON. Missing fields take their default values.
    pub fn from_json(content: &str) -> Result<Self, TuringMachineError> {
        serde_json::from_str(content).map_err(|e| TuringMachineError::ConfigError(e.to_string()))
    }

    /// Loads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }
}
