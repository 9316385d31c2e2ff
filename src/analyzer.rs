//! This module provides the checks a machine runs over its program before execution: the
//! validation that rejects an unusable program, and a reachability analysis whose findings
//! are only reported.

use crate::types::{Program, SymbolOrigin, TuringMachineError};
use std::collections::HashSet;

/// Validates every transition of `program` against the machine's alphabet and terminal state.
///
/// Directions need no check: [`crate::types::Direction`] cannot hold an invalid move.
/// For each entry, in program order:
/// - the written symbol must belong to `alphabet`;
/// - the next state must be `terminal_state` or a state defined in the program.
///
/// # Returns
///
/// * `Ok(())` if every entry is valid.
/// * `Err(TuringMachineError)` describing the first invalid entry.
pub fn validate(
    program: &Program,
    alphabet: &HashSet<char>,
    terminal_state: &str,
) -> Result<(), TuringMachineError> {
    for (state, symbol, transition) in program.iter() {
        if !alphabet.contains(&transition.write) {
            return Err(TuringMachineError::UnexpectedSymbol {
                state: state.to_string(),
                symbol: transition.write,
                origin: SymbolOrigin::Written,
            });
        }

        if transition.next_state == terminal_state {
            continue;
        }

        if !program.contains_state(&transition.next_state) {
            return Err(TuringMachineError::StateNotFound {
                state: transition.next_state.clone(),
                from: state.to_string(),
                symbol,
            });
        }
    }

    Ok(())
}

/// Finds the states defined in `program` that cannot be reached from `start_state`.
///
/// Performs a depth-first traversal over `next_state` links. The terminal state has no
/// outgoing transitions and is never reported.
///
/// # Returns
///
/// The unreachable states, sorted for deterministic output.
pub fn unreachable_states(
    program: &Program,
    start_state: &str,
    terminal_state: &str,
) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut queue = vec![start_state];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        if let Some(row) = program.transitions(state) {
            for transition in row.values() {
                if !visited.contains(transition.next_state.as_str()) {
                    queue.push(transition.next_state.as_str());
                }
            }
        }
    }

    let mut unreachable: Vec<String> = program
        .states()
        .filter(|state| !visited.contains(state) && *state != terminal_state)
        .map(str::to_string)
        .collect();

    unreachable.sort();
    unreachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Transition, DEFAULT_BLANK_SYMBOL};

    fn blank_alphabet() -> HashSet<char> {
        HashSet::from([DEFAULT_BLANK_SYMBOL])
    }

    #[test]
    fn test_valid_program() {
        let program: Program = [("Q1", ' ', Transition::new("Q0", ' ', Direction::Stay))]
            .into_iter()
            .collect();

        assert!(validate(&program, &blank_alphabet(), "Q0").is_ok());
    }

    #[test]
    fn test_invalid_next_state() {
        let program: Program = [("Q1", ' ', Transition::new("Q2", ' ', Direction::Stay))]
            .into_iter()
            .collect();

        let error = validate(&program, &blank_alphabet(), "Q0").unwrap_err();
        assert_eq!(
            error,
            TuringMachineError::StateNotFound {
                state: "Q2".into(),
                from: "Q1".into(),
                symbol: ' ',
            }
        );
    }

    #[test]
    fn test_unexpected_write_symbol() {
        // The write check runs before the next-state check.
        let program: Program = [("Q1", ' ', Transition::new("Q2", '1', Direction::Stay))]
            .into_iter()
            .collect();

        let error = validate(&program, &blank_alphabet(), "Q0").unwrap_err();
        assert!(matches!(
            error,
            TuringMachineError::UnexpectedSymbol {
                symbol: '1',
                origin: SymbolOrigin::Written,
                ..
            }
        ));
    }

    #[test]
    fn test_terminal_state_need_not_be_defined() {
        let program: Program = [
            ("Q1", 'a', Transition::new("Q2", 'a', Direction::Right)),
            ("Q2", ' ', Transition::new("halt", 'a', Direction::Stay)),
        ]
        .into_iter()
        .collect();

        let alphabet = HashSet::from(['a', DEFAULT_BLANK_SYMBOL]);
        assert!(validate(&program, &alphabet, "halt").is_ok());
        assert!(matches!(
            validate(&program, &alphabet, "Q0"),
            Err(TuringMachineError::StateNotFound { .. })
        ));
    }

    #[test]
    fn test_unreachable_states() {
        let program: Program = [
            ("Q1", '1', Transition::new("Q2", '1', Direction::Right)),
            ("Q2", ' ', Transition::new("Q0", ' ', Direction::Stay)),
            ("Q3", '1', Transition::new("Q4", '1', Direction::Left)),
            ("Q4", '1', Transition::new("Q3", '1', Direction::Left)),
        ]
        .into_iter()
        .collect();

        assert_eq!(unreachable_states(&program, "Q1", "Q0"), vec!["Q3", "Q4"]);
        assert!(unreachable_states(&program, "Q3", "Q0")
            .iter()
            .all(|state| state != "Q4"));
    }

    #[test]
    fn test_all_states_reachable() {
        let program: Program = [
            ("Q1", '1', Transition::new("Q1", '1', Direction::Left)),
            ("Q1", ' ', Transition::new("Q0", '1', Direction::Stay)),
        ]
        .into_iter()
        .collect();

        assert!(unreachable_states(&program, "Q1", "Q0").is_empty());
    }
}
