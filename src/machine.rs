//! This module defines the `TuringMachine` struct, an immutable single-tape machine
//! description, and `Execution`, the per-run context that owns the carriage, the current
//! state, the step counter and the live tape.

use crate::analyzer::{unreachable_states, validate};
use crate::cancel::CancellationToken;
use crate::config::MachineConfig;
use crate::types::{
    Direction, Program, Step, SymbolOrigin, Tape, TuringMachineError, DEFAULT_BLANK_SYMBOL,
};
use std::collections::HashSet;
use std::sync::Arc;

/// A validated single-tape Turing Machine.
///
/// The machine holds the alphabet, the program, the start and terminal states and the run
/// limits. It never changes after construction, so one machine can serve any number of runs,
/// including runs on different threads; every run gets its own [`Execution`].
#[derive(Debug, Clone)]
pub struct TuringMachine {
    alphabet: HashSet<char>,
    program: Arc<Program>,
    start_state: String,
    terminal_state: String,
    max_tape_length: usize,
    max_steps: u64,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` and validates `program` against it.
    ///
    /// # Arguments
    ///
    /// * `alphabet` - The tape symbols, e.g. `"1+"`. The blank symbol is always included.
    /// * `start_state` - The state execution begins in, e.g. `"Q1"`.
    /// * `terminal_state` - The state that halts execution, e.g. `"Q0"`.
    /// * `program` - The transition table.
    /// * `max_tape_length` - The number of occupied cells that aborts a run. Must be positive.
    /// * `max_steps` - The number of steps that aborts a run, `0` for no limit.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the configuration and the program are valid.
    /// * `Err(TuringMachineError)` naming the first problem found otherwise.
    pub fn new(
        alphabet: &str,
        start_state: impl Into<String>,
        terminal_state: impl Into<String>,
        program: Program,
        max_tape_length: usize,
        max_steps: u64,
    ) -> Result<Self, TuringMachineError> {
        let mut symbols: HashSet<char> = alphabet.chars().collect();
        symbols.insert(DEFAULT_BLANK_SYMBOL);

        let start_state = start_state.into();
        let terminal_state = terminal_state.into();

        if start_state.is_empty() {
            return Err(TuringMachineError::StartStateEmpty);
        }

        if terminal_state.is_empty() {
            return Err(TuringMachineError::TerminalStateEmpty);
        }

        if max_tape_length == 0 {
            return Err(TuringMachineError::InvalidMaxTapeLength(max_tape_length));
        }

        validate(&program, &symbols, &terminal_state)?;

        let unreachable = unreachable_states(&program, &start_state, &terminal_state);
        if !unreachable.is_empty() {
            tracing::warn!(
                "States unreachable from {}: {}",
                start_state,
                unreachable.join(", ")
            );
        }

        tracing::debug!(
            "Machine ready: {} states, {} transitions, {} symbols, max tape length {}, max steps {}",
            program.state_count(),
            program.transition_count(),
            symbols.len(),
            max_tape_length,
            max_steps
        );

        Ok(Self {
            alphabet: symbols,
            program: Arc::new(program),
            start_state,
            terminal_state,
            max_tape_length,
            max_steps,
        })
    }

    /// Creates a new `TuringMachine` from a [`MachineConfig`].
    pub fn from_config(
        config: &MachineConfig,
        program: Program,
    ) -> Result<Self, TuringMachineError> {
        Self::new(
            &config.alphabet,
            config.start_state.as_str(),
            config.terminal_state.as_str(),
            program,
            config.max_tape_length,
            config.max_steps,
        )
    }

    /// Runs the program from `carriage` on a copy of `input` until the machine halts.
    ///
    /// # Returns
    ///
    /// * `Ok(Tape)` with the final tape contents once the terminal state is reached.
    /// * `Err(TuringMachineError)` if the run fails; no tape is produced.
    pub fn exec(&self, carriage: i64, input: &Tape) -> Result<Tape, TuringMachineError> {
        self.exec_with_cancel(&CancellationToken::new(), carriage, input)
    }

    /// Same as [`exec`](Self::exec), but stops with `TuringMachineError::Cancelled` once
    /// `cancel` fires. The token is checked before every step.
    pub fn exec_with_cancel(
        &self,
        cancel: &CancellationToken,
        carriage: i64,
        input: &Tape,
    ) -> Result<Tape, TuringMachineError> {
        self.start(carriage, input).run(cancel)
    }

    /// Creates a fresh execution context positioned at `carriage` over a copy of `input`.
    pub fn start(&self, carriage: i64, input: &Tape) -> Execution<'_> {
        Execution {
            machine: self,
            carriage,
            state: self.start_state.clone(),
            steps: 0,
            tape: input.clone(),
        }
    }

    pub fn alphabet(&self) -> &HashSet<char> {
        &self.alphabet
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    pub fn terminal_state(&self) -> &str {
        &self.terminal_state
    }

    pub fn max_tape_length(&self) -> usize {
        self.max_tape_length
    }

    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }
}

/// The mutable state of one run of a [`TuringMachine`].
///
/// Cloning an `Execution` forks the run: the clone continues independently from the same
/// carriage, state, step count and tape.
#[derive(Debug, Clone)]
pub struct Execution<'m> {
    machine: &'m TuringMachine,
    carriage: i64,
    state: String,
    steps: u64,
    tape: Tape,
}

impl Execution<'_> {
    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Halt)` if the machine is in its terminal state; nothing is executed.
    /// * `Ok(Step::Continue)` if a transition was applied and the run may go on.
    /// * `Err(TuringMachineError)` if the step failed or a limit was reached.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        let machine = self.machine;

        if self.state == machine.terminal_state {
            return Ok(Step::Halt);
        }

        let symbol = self.read();

        if !machine.alphabet.contains(&symbol) {
            return Err(TuringMachineError::UnexpectedSymbol {
                state: self.state.clone(),
                symbol,
                origin: SymbolOrigin::Read,
            });
        }

        let transition = machine.program.get(&self.state, symbol).ok_or_else(|| {
            TuringMachineError::TransitionNotFound {
                state: self.state.clone(),
                symbol,
            }
        })?;

        // Writing what was read, staying, and keeping the state repeats this step forever.
        if transition.direction == Direction::Stay
            && transition.next_state == self.state
            && transition.write == symbol
        {
            return Err(TuringMachineError::InfiniteLoop {
                state: self.state.clone(),
                symbol,
            });
        }

        let carriage = self
            .carriage
            .checked_add(transition.direction.offset())
            .ok_or_else(|| TuringMachineError::CarriageOverflow {
                state: self.state.clone(),
                carriage: self.carriage,
            })?;

        self.tape.insert(self.carriage, transition.write);
        self.carriage = carriage;
        self.state.clone_from(&transition.next_state);
        self.steps += 1;

        tracing::trace!(
            "step {}: read {:?}, wrote {:?}, moved {:?}, now {} at {}",
            self.steps,
            symbol,
            transition.write,
            transition.direction,
            self.state,
            self.carriage
        );

        if self.tape.len() >= machine.max_tape_length {
            return Err(TuringMachineError::TapeOver {
                cells: self.tape.len(),
                carriage: self.carriage,
            });
        }

        if machine.max_steps > 0 && self.steps >= machine.max_steps {
            return Err(TuringMachineError::StepsExceeded(self.steps));
        }

        Ok(Step::Continue)
    }

    /// Steps until the machine halts, checking `cancel` before every step.
    pub fn run(mut self, cancel: &CancellationToken) -> Result<Tape, TuringMachineError> {
        loop {
            if cancel.is_cancelled() {
                tracing::debug!("Run cancelled after {} steps", self.steps);
                return Err(TuringMachineError::Cancelled);
            }

            if self.step()? == Step::Halt {
                tracing::debug!("Machine halted after {} steps", self.steps);
                return Ok(self.tape);
            }
        }
    }

    /// Returns the symbol under the carriage, blank if the cell was never written.
    pub fn read(&self) -> char {
        self.tape
            .get(&self.carriage)
            .copied()
            .unwrap_or(DEFAULT_BLANK_SYMBOL)
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn carriage(&self) -> i64 {
        self.carriage
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn is_halted(&self) -> bool {
        self.state == self.machine.terminal_state
    }

    /// Consumes the execution and returns its tape.
    pub fn into_tape(self) -> Tape {
        self.tape
    }
}
