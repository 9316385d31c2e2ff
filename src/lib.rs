//! This crate provides the core logic for a single-tape Turing Machine simulator.
//! It includes modules for reading state-table programs, validating them against a machine
//! configuration, executing them on a sparse tape, and a small collection of built-in programs.

pub mod analyzer;
pub mod cancel;
pub mod config;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod types;

/// Re-exports the analysis functions from the analyzer module.
pub use analyzer::{unreachable_states, validate};
/// Re-exports the `CancellationToken` used to stop runs and reads.
pub use cancel::CancellationToken;
/// Re-exports the `MachineConfig` struct from the config module.
pub use config::MachineConfig;
/// Re-exports the text conversion functions from the encoder module.
pub use encoder::{encode, render_tape, tape_from_str};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` and `Execution` structs from the machine module.
pub use machine::{Execution, TuringMachine};
/// Re-exports the reading functions from the parser module.
pub use parser::{parse_transition, read, read_str, read_with_cancel};
/// Re-exports `BuiltinProgram`, `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{BuiltinProgram, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports various types related to Turing Machine definition and execution from the types module.
pub use types::{
    Direction, ErrorCategory, Program, Step, SymbolOrigin, Tape, Transition, TuringMachineError,
    DEFAULT_BLANK_SYMBOL, INPUT_BLANK_SYMBOL,
};
