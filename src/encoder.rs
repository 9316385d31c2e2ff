//! This module converts programs and tapes back into text: a [`Program`] into the
//! tab-delimited state table read by [`crate::parser`], and a sparse [`Tape`] into a line of
//! symbols.

use crate::parser::STATE_PREFIX;
use crate::types::{Program, Tape, Transition, DEFAULT_BLANK_SYMBOL, INPUT_BLANK_SYMBOL};
use std::collections::BTreeSet;

/// Encodes a program as a state table.
///
/// The header lists the states ordered by their number (`Q1`, `Q2`, ..., `Q10`), followed by
/// one row per symbol in ascending order. The blank symbol is written as a space in the row
/// key and as `_` in transition fields. Reading the output back yields an equal program as
/// long as every state is named `Q<digits>` and no transition writes a direction separator
/// (`>`, `<` or `.`), since the reader splits a field on the first separator it finds.
pub fn encode(program: &Program) -> String {
    let mut states: Vec<&str> = program.states().collect();
    states.sort_by(|a, b| state_order(a).cmp(&state_order(b)));

    let symbols: BTreeSet<char> = program.iter().map(|(_, symbol, _)| symbol).collect();

    let mut lines = Vec::with_capacity(symbols.len() + 1);
    lines.push(format!("\t{}", states.join("\t")));

    for symbol in symbols {
        let fields: Vec<String> = states
            .iter()
            .map(|state| {
                program
                    .get(state, symbol)
                    .map(encode_transition)
                    .unwrap_or_default()
            })
            .collect();

        lines.push(format!("{}\t{}", symbol, fields.join("\t")));
    }

    lines.join("\n") + "\n"
}

/// Encodes a single transition field, e.g. `1>2`.
pub fn encode_transition(transition: &Transition) -> String {
    let write = if transition.write == DEFAULT_BLANK_SYMBOL {
        INPUT_BLANK_SYMBOL
    } else {
        transition.write
    };

    let state = transition
        .next_state
        .strip_prefix(STATE_PREFIX)
        .unwrap_or(&transition.next_state);

    format!("{}{}{}", write, transition.direction.separator(), state)
}

/// Longest run of unwritten cells [`render_tape`] spells out as blanks.
pub const MAX_RENDERED_GAP: u64 = 16;
/// Stands in for a run of unwritten cells longer than [`MAX_RENDERED_GAP`].
pub const GAP_MARKER: char = '\u{2026}';

/// Renders the written cells of a tape from the lowest index to the highest.
///
/// Unwritten cells between two written ones are rendered blank, unless there are more than
/// [`MAX_RENDERED_GAP`] of them in a row; such a run collapses into a single [`GAP_MARKER`].
pub fn render_tape(tape: &Tape) -> String {
    let mut cells: Vec<(i64, char)> = tape.iter().map(|(&i, &symbol)| (i, symbol)).collect();
    cells.sort_unstable_by_key(|&(i, _)| i);

    let mut rendered = String::with_capacity(cells.len());
    let mut previous: Option<i64> = None;

    for (i, symbol) in cells {
        if let Some(previous) = previous {
            let gap = i.abs_diff(previous) - 1;
            if gap > MAX_RENDERED_GAP {
                rendered.push(GAP_MARKER);
            } else {
                rendered.extend(std::iter::repeat(DEFAULT_BLANK_SYMBOL).take(gap as usize));
            }
        }

        rendered.push(symbol);
        previous = Some(i);
    }

    rendered
}

/// Builds a tape from text, placing the first character at cell `start`.
///
/// `_` and the blank symbol leave their cell unwritten.
pub fn tape_from_str(input: &str, start: i64) -> Tape {
    input
        .chars()
        .zip(start..)
        .filter(|(symbol, _)| *symbol != INPUT_BLANK_SYMBOL && *symbol != DEFAULT_BLANK_SYMBOL)
        .map(|(symbol, i)| (i, symbol))
        .collect()
}

/// Orders `Q<n>` states by `n`; any other name sorts after them.
fn state_order(state: &str) -> (u64, &str) {
    let number = state
        .strip_prefix(STATE_PREFIX)
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(u64::MAX);

    (number, state)
}
