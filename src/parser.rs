//! This module provides the parser for state-table programs (`.tur` files).
//!
//! A state-table file has three sections:
//! 1. free-form comment lines;
//! 2. the state table: a header row of tab-delimited state names (`\tQ1\tQ2...`) followed by
//!    one row per symbol, `<symbol>\t<transition>\t<transition>...`, where the n-th
//!    transition belongs to the n-th state of the header and an empty field means the pair
//!    has no transition;
//! 3. an optional trailing section (such as a saved tape) which is not interpreted.
//!
//! A transition field is `<write><direction><state digits>`, e.g. `1>2` writes `1`, moves
//! right and continues in `Q2`. `>`, `<` and `.` stand for right, left and stay.

use crate::cancel::CancellationToken;
use crate::types::{
    Direction, Program, Transition, TuringMachineError, DEFAULT_BLANK_SYMBOL, INPUT_BLANK_SYMBOL,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::BufRead;

/// Prefix of every state name; transition fields only carry the digits that follow it.
pub const STATE_PREFIX: &str = "Q";

/// Direction separators in the order they are looked for in a transition field.
const SEPARATORS: [char; 3] = ['>', '<', '.'];

lazy_static! {
    static ref STATE_PATTERN: Regex = Regex::new(r"Q\d+").unwrap();
}

/// Parses a transition field such as `1>2` into a [`Transition`].
///
/// The symbol before the separator is the symbol to write (`_` writes a blank) and the
/// digits after it name the next state (`2` is `Q2`).
///
/// # Returns
///
/// * `Ok(Transition)` if the field is well formed.
/// * `Err(TuringMachineError::ParseTransition)` if the field has no direction separator, or
///   does not split into exactly two non-empty parts around it.
pub fn parse_transition(field: &str) -> Result<Transition, TuringMachineError> {
    let (separator, direction) = SEPARATORS
        .iter()
        .filter(|sep| field.contains(**sep))
        .find_map(|&sep| Direction::from_separator(sep).map(|direction| (sep, direction)))
        .ok_or_else(|| parse_error(field, "no direction found"))?;

    let parts: Vec<&str> = field.split(separator).collect();

    let (symbol, state) = match parts.as_slice() {
        [symbol, state] if !symbol.is_empty() && !state.is_empty() => (*symbol, *state),
        _ => {
            return Err(parse_error(
                field,
                "expected <symbol><direction><state>",
            ))
        }
    };

    Ok(Transition {
        next_state: format!("{STATE_PREFIX}{state}"),
        write: parse_symbol(symbol),
        direction,
    })
}

/// Reads a state-table program from `reader`.
///
/// # Returns
///
/// * `Ok(Program)` with every transition found in the state table.
/// * `Err(TuringMachineError::ParseTransition)` for the first malformed transition field.
/// * `Err(TuringMachineError::ColumnOutOfRange)` if a row has more fields than the header.
/// * `Err(TuringMachineError::NoTransitions)` if the input holds no transitions at all.
/// * `Err(TuringMachineError::FileError)` if reading from `reader` fails.
pub fn read<R: BufRead>(reader: R) -> Result<Program, TuringMachineError> {
    read_with_cancel(reader, &CancellationToken::new())
}

/// Reads a state-table program from a string.
pub fn read_str(content: &str) -> Result<Program, TuringMachineError> {
    read(content.as_bytes())
}

/// Same as [`read`], but stops with `TuringMachineError::Cancelled` once `cancel` fires. The
/// token is checked before every line.
pub fn read_with_cancel<R: BufRead>(
    reader: R,
    cancel: &CancellationToken,
) -> Result<Program, TuringMachineError> {
    let mut program = Program::new();
    let mut states: Option<Vec<String>> = None;

    for (index, line) in reader.lines().enumerate() {
        if cancel.is_cancelled() {
            return Err(TuringMachineError::Cancelled);
        }

        let line = line
            .map_err(|e| TuringMachineError::FileError(format!("Failed to read program: {}", e)))?;
        let fields: Vec<&str> = line.split('\t').collect();

        let header = match states.as_ref() {
            Some(header) => header,
            None => {
                if let Some(header) = parse_header(&fields) {
                    tracing::debug!("State table header at line {}: {:?}", index + 1, header);
                    states = Some(header);
                }
                continue;
            }
        };

        // Rows without a symbol are skipped.
        let Some(symbol) = fields[0].chars().next() else {
            continue;
        };

        for (column, field) in fields.iter().enumerate().skip(1) {
            if field.is_empty() {
                continue;
            }

            let state = header
                .get(column - 1)
                .ok_or(TuringMachineError::ColumnOutOfRange {
                    line: index + 1,
                    column,
                })?;

            let transition = parse_transition(field)?;
            tracing::trace!("{} {:?} -> {:?}", state, symbol, transition);

            program.insert(state.clone(), symbol, transition);
        }
    }

    if program.is_empty() {
        return Err(TuringMachineError::NoTransitions);
    }

    tracing::debug!(
        "Read {} transitions for {} states",
        program.transition_count(),
        program.state_count()
    );

    Ok(program)
}

/// Recognises the state table header: a row whose fields after the first name at least one
/// state. Returns the state names in column order.
fn parse_header(fields: &[&str]) -> Option<Vec<String>> {
    let states = fields.get(1..)?;

    states
        .iter()
        .any(|field| STATE_PATTERN.is_match(field))
        .then(|| states.iter().map(|state| state.to_string()).collect())
}

/// Parses the first character of `input` as a symbol, mapping `_` to the blank symbol.
fn parse_symbol(input: &str) -> char {
    match input.chars().next() {
        Some(INPUT_BLANK_SYMBOL) | None => DEFAULT_BLANK_SYMBOL,
        Some(symbol) => symbol,
    }
}

/// Creates a `TuringMachineError::ParseTransition` for `field`.
fn parse_error(field: &str, reason: &str) -> TuringMachineError {
    TuringMachineError::ParseTransition {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
