//! Loading of state-table programs from files, directories and strings.

use crate::cancel::CancellationToken;
use crate::parser::{read_str, read_with_cancel};
use crate::types::{Program, TuringMachineError};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Reads state-table programs from the file system or from memory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Reads and parses the program stored at `path`.
    ///
    /// Fails with `FileNotFound` when nothing exists at `path`, with `FileError` when the
    /// file cannot be opened or read, and otherwise with whatever [`crate::parser::read`]
    /// reports for its content.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        Self::load_program_with_cancel(path, &CancellationToken::new())
    }

    /// Same as [`load_program`](Self::load_program), but stops with
    /// `TuringMachineError::Cancelled` once `cancel` fires.
    pub fn load_program_with_cancel(
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Program, TuringMachineError> {
        if !path.exists() {
            return Err(TuringMachineError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path).map_err(|e| {
            TuringMachineError::FileError(format!("cannot open {}: {}", path.display(), e))
        })?;

        read_with_cancel(BufReader::new(file), cancel).map_err(|e| match e {
            TuringMachineError::FileError(message) => {
                TuringMachineError::FileError(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        read_str(content)
    }

    /// Loads every `.tur` file directly inside `directory`, in file name order.
    ///
    /// Each file yields its own result, so one broken program does not hide the others. A
    /// missing or unreadable directory yields a single error.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringMachineError>> {
        let paths = match program_files(directory) {
            Ok(paths) => paths,
            Err(e) => return vec![Err(e)],
        };

        paths
            .into_iter()
            .map(|path| match Self::load_program(&path) {
                Ok(program) => Ok((path, program)),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    Err(e)
                }
            })
            .collect()
    }
}

/// Lists the `.tur` files in `directory`, sorted by path.
fn program_files(directory: &Path) -> Result<Vec<PathBuf>, TuringMachineError> {
    if !directory.exists() {
        return Err(TuringMachineError::FileNotFound(
            directory.display().to_string(),
        ));
    }

    let dir_error =
        |e: io::Error| TuringMachineError::FileError(format!("{}: {}", directory.display(), e));

    let mut paths = Vec::new();
    for entry in fs::read_dir(directory).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "tur") {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const VALID: &str = "Test program\n\tQ1\n1\t1<1\n \t1.0\n";

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tur");

        fs::write(&file_path, VALID).unwrap();

        let program = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(program.state_count(), 1);
        assert_eq!(program.transition_count(), 2);
    }

    #[test]
    fn test_load_missing_program() {
        let result = ProgramLoader::load_program(Path::new("invalid_path"));
        assert_eq!(
            result,
            Err(TuringMachineError::FileNotFound("invalid_path".into()))
        );
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tur");

        fs::write(&file_path, "Q1 Q2").unwrap();

        assert_eq!(
            ProgramLoader::load_program(&file_path),
            Err(TuringMachineError::NoTransitions)
        );
    }

    #[test]
    fn test_load_directory_as_program() {
        let dir = tempdir().unwrap();

        let result = ProgramLoader::load_program(dir.path());
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_cancelled() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tur");
        fs::write(&file_path, VALID).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = ProgramLoader::load_program_with_cancel(&file_path, &cancel);
        assert_eq!(result, Err(TuringMachineError::Cancelled));
    }

    #[test]
    fn test_load_program_from_string() {
        let program = ProgramLoader::load_program_from_string(VALID).unwrap();
        assert!(program.contains_state("Q1"));
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("valid.tur"), VALID).unwrap();
        fs::write(dir.path().join("invalid.tur"), "\tQ1\n1\t1!0\n").unwrap();
        fs::write(dir.path().join("ignored.txt"), VALID).unwrap();
        fs::create_dir(dir.path().join("nested.tur")).unwrap();

        let results = ProgramLoader::load_programs(dir.path());
        assert_eq!(results.len(), 2);

        // Sorted by name: invalid.tur, then valid.tur.
        assert!(matches!(
            results[0],
            Err(TuringMachineError::ParseTransition { .. })
        ));
        let (path, program) = results[1].as_ref().unwrap();
        assert!(path.ends_with("valid.tur"));
        assert_eq!(program.transition_count(), 2);
    }

    #[test]
    fn test_load_programs_missing_directory() {
        let results = ProgramLoader::load_programs(Path::new("no/such/dir"));
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(TuringMachineError::FileNotFound(_))
        ));
    }
}
