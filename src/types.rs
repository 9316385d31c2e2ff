//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including the program representation, transitions, the sparse tape, execution
//! outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// The blank symbol. Every unwritten tape cell reads as blank and the blank symbol is always
/// part of a machine's alphabet.
pub const DEFAULT_BLANK_SYMBOL: char = ' ';
/// A special input symbol used in program text and tape input to represent the blank symbol.
pub const INPUT_BLANK_SYMBOL: char = '_';

/// A sparse single tape: cell index to symbol. Indices absent from the map read as blank and
/// the carriage may move into negative indices.
pub type Tape = HashMap<i64, char>;

/// Represents the possible directions the carriage can move after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the carriage one cell to the left.
    Left,
    /// Move the carriage one cell to the right.
    Right,
    /// Keep the carriage on the same cell.
    Stay,
}

impl Direction {
    /// Returns the change in carriage position for this direction.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }

    /// Returns the separator character used for this direction in transition fields.
    pub fn separator(self) -> char {
        match self {
            Direction::Left => '<',
            Direction::Right => '>',
            Direction::Stay => '.',
        }
    }

    /// Maps a transition field separator back to its direction.
    pub fn from_separator(sep: char) -> Option<Self> {
        match sep {
            '<' => Some(Direction::Left),
            '>' => Some(Direction::Right),
            '.' => Some(Direction::Stay),
            _ => None,
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = TuringMachineError;

    /// Converts a raw carriage offset (-1, 0 or 1) into a `Direction`.
    fn try_from(offset: i64) -> Result<Self, Self::Error> {
        match offset {
            -1 => Ok(Direction::Left),
            1 => Ok(Direction::Right),
            0 => Ok(Direction::Stay),
            other => Err(TuringMachineError::InvalidMoveDirection(other.to_string())),
        }
    }
}

/// The action bound to a (state, symbol) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state the machine moves to.
    pub next_state: String,
    /// The symbol written into the cell under the carriage.
    pub write: char,
    /// Where the carriage moves after writing.
    pub direction: Direction,
}

impl Transition {
    pub fn new(next_state: impl Into<String>, write: char, direction: Direction) -> Self {
        Self {
            next_state: next_state.into(),
            write,
            direction,
        }
    }
}

/// A Turing Machine program: for every state, the transition taken on each symbol.
///
/// A missing (state, symbol) entry means the program defines no transition for that pair.
/// The program is built once, either by the parser or directly, and is not mutated while a
/// machine uses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    rules: BTreeMap<String, BTreeMap<char, Transition>>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `transition` to the (`state`, `symbol`) pair, returning the transition that was
    /// previously bound to it, if any.
    pub fn insert(
        &mut self,
        state: impl Into<String>,
        symbol: char,
        transition: Transition,
    ) -> Option<Transition> {
        self.rules
            .entry(state.into())
            .or_default()
            .insert(symbol, transition)
    }

    /// Looks up the transition for a (state, symbol) pair.
    pub fn get(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.rules.get(state).and_then(|row| row.get(&symbol))
    }

    /// Returns `true` if `state` has at least one transition in this program.
    pub fn contains_state(&self, state: &str) -> bool {
        self.rules.contains_key(state)
    }

    /// Returns every state that has transitions, in lexical order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Returns the transitions of a single state keyed by symbol.
    pub fn transitions(&self, state: &str) -> Option<&BTreeMap<char, Transition>> {
        self.rules.get(state)
    }

    /// Iterates over every `(state, symbol, transition)` entry.
    pub fn iter(&self) -> impl Iterator<Item = (&str, char, &Transition)> {
        self.rules.iter().flat_map(|(state, row)| {
            row.iter()
                .map(move |(symbol, transition)| (state.as_str(), *symbol, transition))
        })
    }

    /// Returns every symbol the program reads or writes, excluding the blank symbol.
    pub fn symbols(&self) -> BTreeSet<char> {
        self.iter()
            .flat_map(|(_, symbol, transition)| [symbol, transition.write])
            .filter(|&symbol| symbol != DEFAULT_BLANK_SYMBOL)
            .collect()
    }

    pub fn state_count(&self) -> usize {
        self.rules.len()
    }

    pub fn transition_count(&self) -> usize {
        self.rules.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, char, Transition)> for Program {
    fn from_iter<I: IntoIterator<Item = (S, char, Transition)>>(iter: I) -> Self {
        let mut program = Program::new();
        for (state, symbol, transition) in iter {
            program.insert(state, symbol, transition);
        }
        program
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a step and continues execution.
    Continue,
    /// The machine is in its terminal state.
    Halt,
}

/// Broad classification of a [`TuringMachineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Raised while constructing a machine; the configuration or program is unusable.
    Configuration,
    /// Raised while running; fatal to that run only.
    Execution,
    /// Raised while reading program text or its source.
    Parse,
}

/// Where an out-of-alphabet symbol was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolOrigin {
    /// In the write field of a transition, found while validating the program.
    Written,
    /// Under the carriage, found while running.
    Read,
}

impl std::fmt::Display for SymbolOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolOrigin::Written => write!(f, "written"),
            SymbolOrigin::Read => write!(f, "read"),
        }
    }
}

/// Represents the errors that can occur while configuring, running, or parsing a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    #[error("start state is empty")]
    StartStateEmpty,

    #[error("terminal state is empty")]
    TerminalStateEmpty,

    #[error("invalid max tape length: {0}")]
    InvalidMaxTapeLength(usize),

    #[error("invalid move direction: {0}")]
    InvalidMoveDirection(String),

    /// A symbol outside the alphabet, either in a transition's write field or under the
    /// carriage at run time.
    #[error("unexpected symbol {symbol:?} {origin} in state {state:?}")]
    UnexpectedSymbol {
        state: String,
        symbol: char,
        origin: SymbolOrigin,
    },

    #[error("state not found: {state:?} (referenced from state {from:?}, symbol {symbol:?})")]
    StateNotFound {
        state: String,
        from: String,
        symbol: char,
    },

    #[error("transition not found: state {state:?}, symbol {symbol:?}")]
    TransitionNotFound { state: String, symbol: char },

    #[error("infinite loop: state {state:?}, symbol {symbol:?}")]
    InfiniteLoop { state: String, symbol: char },

    #[error("tape is over: {cells} cells used, carriage at {carriage}")]
    TapeOver { cells: usize, carriage: i64 },

    #[error("carriage moved past cell {carriage} in state {state:?}")]
    CarriageOverflow { state: String, carriage: i64 },

    #[error("steps exceeded: {0}")]
    StepsExceeded(u64),

    #[error("cancelled")]
    Cancelled,

    #[error("parse transition {field:?}: {reason}")]
    ParseTransition { field: String, reason: String },

    #[error("line {line}: field {column} has no state in the header row")]
    ColumnOutOfRange { line: usize, column: usize },

    #[error("no transitions")]
    NoTransitions,

    #[error("file {0} does not exist")]
    FileNotFound(String),

    #[error("File error: {0}")]
    FileError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("program not found: {0}")]
    ProgramNotFound(String),
}

impl TuringMachineError {
    /// Returns a stable code for this error kind, suitable for scripting and exit reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            TuringMachineError::StartStateEmpty => "START_STATE_EMPTY",
            TuringMachineError::TerminalStateEmpty => "TERMINAL_STATE_EMPTY",
            TuringMachineError::InvalidMaxTapeLength(_) => "INVALID_MAX_TAPE_LENGTH",
            TuringMachineError::InvalidMoveDirection(_) => "INVALID_MOVE_DIRECTION",
            TuringMachineError::UnexpectedSymbol { .. } => "UNEXPECTED_SYMBOL",
            TuringMachineError::StateNotFound { .. } => "STATE_NOT_FOUND",
            TuringMachineError::TransitionNotFound { .. } => "TRANSITION_NOT_FOUND",
            TuringMachineError::InfiniteLoop { .. } => "INFINITE_LOOP",
            TuringMachineError::TapeOver { .. } => "TAPE_OVER",
            TuringMachineError::CarriageOverflow { .. } => "CARRIAGE_OVERFLOW",
            TuringMachineError::StepsExceeded(_) => "STEPS_EXCEEDED",
            TuringMachineError::Cancelled => "CANCELLED",
            TuringMachineError::ParseTransition { .. } => "PARSE_TRANSITION",
            TuringMachineError::ColumnOutOfRange { .. } => "COLUMN_OUT_OF_RANGE",
            TuringMachineError::NoTransitions => "NO_TRANSITIONS",
            TuringMachineError::FileNotFound(_) => "FILE_NOT_FOUND",
            TuringMachineError::FileError(_) => "FILE_ERROR",
            TuringMachineError::ConfigError(_) => "CONFIG_ERROR",
            TuringMachineError::ProgramNotFound(_) => "PROGRAM_NOT_FOUND",
        }
    }

    /// Returns the phase this error belongs to. `UnexpectedSymbol` follows its origin.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TuringMachineError::StartStateEmpty
            | TuringMachineError::TerminalStateEmpty
            | TuringMachineError::InvalidMaxTapeLength(_)
            | TuringMachineError::InvalidMoveDirection(_)
            | TuringMachineError::UnexpectedSymbol {
                origin: SymbolOrigin::Written,
                ..
            }
            | TuringMachineError::StateNotFound { .. }
            | TuringMachineError::ConfigError(_)
            | TuringMachineError::ProgramNotFound(_) => ErrorCategory::Configuration,
            TuringMachineError::UnexpectedSymbol {
                origin: SymbolOrigin::Read,
                ..
            }
            | TuringMachineError::TransitionNotFound { .. }
            | TuringMachineError::InfiniteLoop { .. }
            | TuringMachineError::TapeOver { .. }
            | TuringMachineError::CarriageOverflow { .. }
            | TuringMachineError::StepsExceeded(_)
            | TuringMachineError::Cancelled => ErrorCategory::Execution,
            TuringMachineError::ParseTransition { .. }
            | TuringMachineError::ColumnOutOfRange { .. }
            | TuringMachineError::NoTransitions
            | TuringMachineError::FileNotFound(_)
            | TuringMachineError::FileError(_) => ErrorCategory::Parse,
        }
    }
}
