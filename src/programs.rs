//! Built-in state-table programs, each bundled with the configuration it runs under.

use crate::config::MachineConfig;
use crate::machine::TuringMachine;
use crate::parser::read_str;
use crate::types::{Program, TuringMachineError};

/// A program shipped with the crate.
#[derive(Debug, Clone)]
pub struct BuiltinProgram {
    pub name: &'static str,
    /// The state table, in the format read by [`crate::parser`].
    pub text: &'static str,
    pub config: MachineConfig,
    /// A sample input, read from cell 0 with the carriage on its first symbol.
    pub example_input: &'static str,
}

impl BuiltinProgram {
    pub fn program(&self) -> Result<Program, TuringMachineError> {
        read_str(self.text)
    }

    /// Parses the program and builds the machine it runs on.
    pub fn machine(&self) -> Result<TuringMachine, TuringMachineError> {
        TuringMachine::from_config(&self.config, self.program()?)
    }
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<BuiltinProgram> = vec![
        BuiltinProgram {
            name: "increment",
            text: include_str!("../programs/increment.tur"),
            config: MachineConfig::new("1").with_limits(1_000, 1_000),
            example_input: "111",
        },
        BuiltinProgram {
            name: "addition",
            text: include_str!("../programs/addition.tur"),
            config: MachineConfig::new("1+").with_limits(1_000, 10_000),
            example_input: "111+11",
        },
        BuiltinProgram {
            name: "triple",
            text: include_str!("../programs/triple.tur"),
            config: MachineConfig::new("1*").with_limits(10_000, 100_000),
            example_input: "111",
        },
    ];
}

/// Summary of a built-in program.
#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub alphabet: String,
    pub state_count: usize,
    pub transition_count: usize,
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// List all program names
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|builtin| builtin.name).collect()
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<&'static BuiltinProgram, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|builtin| builtin.name == name)
            .ok_or_else(|| TuringMachineError::ProgramNotFound(name.to_string()))
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<&'static BuiltinProgram, TuringMachineError> {
        PROGRAMS
            .get(index)
            .ok_or_else(|| TuringMachineError::ProgramNotFound(format!("#{}", index)))
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let builtin = Self::get_program_by_index(index)?;
        let program = builtin.program()?;

        Ok(ProgramInfo {
            index,
            name: builtin.name.to_string(),
            alphabet: builtin.config.alphabet.clone(),
            state_count: program.state_count(),
            transition_count: program.transition_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{render_tape, tape_from_str};

    #[test]
    fn test_all_programs_build_machines() {
        for builtin in PROGRAMS.iter() {
            assert!(
                builtin.machine().is_ok(),
                "Program '{}' is invalid",
                builtin.name
            );
        }
    }

    #[test]
    fn test_example_inputs() {
        let expected = [("increment", "1111"), ("addition", "1111"), ("triple", "1111111")];

        for (name, output) in expected {
            let builtin = ProgramManager::get_program_by_name(name).unwrap();
            let machine = builtin.machine().unwrap();

            let tape = machine
                .exec(0, &tape_from_str(builtin.example_input, 0))
                .unwrap();
            assert_eq!(render_tape(&tape).trim(), output, "program '{}'", name);
        }
    }

    #[test]
    fn test_increment_from_text() {
        let machine = TuringMachine::new(
            "1",
            "Q1",
            "Q0",
            read_str(include_str!("../programs/increment.tur")).unwrap(),
            20,
            10,
        )
        .unwrap();

        for n in 0..10 {
            let input = tape_from_str(&"1".repeat(n + 1), 0);
            let tape = machine.exec(0, &input).unwrap();
            assert_eq!(render_tape(&tape), "1".repeat(n + 2));
        }
    }

    #[test]
    fn test_addition_from_text() {
        let builtin = ProgramManager::get_program_by_name("addition").unwrap();
        let machine = builtin.machine().unwrap();

        for i in 1..10 {
            for j in 1..10 {
                let input = format!("{}+{}", "1".repeat(i), "1".repeat(j));
                let tape = machine.exec(0, &tape_from_str(&input, 0)).unwrap();

                let ones = tape.values().filter(|&&symbol| symbol == '1').count();
                assert_eq!(ones, (i - 1) + (j - 1) + 1, "{}", input);
                assert!(tape.values().all(|&symbol| symbol == '1' || symbol == ' '));
            }
        }
    }

    #[test]
    fn test_program_names() {
        assert_eq!(
            ProgramManager::list_program_names(),
            vec!["increment", "addition", "triple"]
        );
        assert_eq!(ProgramManager::get_program_count(), 3);
    }

    #[test]
    fn test_program_not_found() {
        let result = ProgramManager::get_program_by_name("Nonexistent");
        assert!(matches!(
            result,
            Err(TuringMachineError::ProgramNotFound(_))
        ));

        assert!(ProgramManager::get_program_by_index(999).is_err());
    }

    #[test]
    fn test_program_info() {
        let info = ProgramManager::get_program_info(2).unwrap();

        assert_eq!(info.index, 2);
        assert_eq!(info.name, "triple");
        assert_eq!(info.alphabet, "1*");
        assert_eq!(info.state_count, 7);
        assert_eq!(info.transition_count, 13);
    }
}
