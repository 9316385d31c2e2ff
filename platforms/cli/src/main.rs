use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use turtab::{
    read_with_cancel, render_tape, tape_from_str, CancellationToken, Execution, MachineConfig,
    Program, ProgramLoader, ProgramManager, Step, Tape, TuringMachine, TuringMachineError,
};

/// Runs a single-tape Turing machine program written as a tab-delimited state table.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  turtab programs/addition.tur --alphabet 1+ --input 111+11
  turtab --builtin triple --input 1111 --debug
  cat programs/increment.tur | turtab --input 11")]
struct Cli {
    /// The state-table program file (.tur) to execute.
    /// If not provided, the program is read from stdin.
    program: Option<PathBuf>,

    /// Run a built-in program instead of a file
    #[clap(short, long, conflicts_with = "program")]
    builtin: Option<String>,

    /// List the built-in programs and exit
    #[clap(long)]
    list: bool,

    /// JSON machine configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Tape symbols; inferred from the program when not configured
    #[clap(short, long)]
    alphabet: Option<String>,

    /// Start state
    #[clap(long)]
    start: Option<String>,

    /// Terminal state
    #[clap(long)]
    terminal: Option<String>,

    /// Maximum number of occupied tape cells
    #[clap(long)]
    max_tape_length: Option<usize>,

    /// Maximum number of steps, 0 for no limit
    #[clap(long)]
    max_steps: Option<u64>,

    /// The input tape, written from cell 0; '_' is a blank cell
    #[clap(short, long)]
    input: Option<String>,

    /// The initial carriage position
    #[clap(long, default_value_t = 0, allow_hyphen_values = true)]
    carriage: i64,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Log machine and parser activity
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.list {
        for index in 0..ProgramManager::get_program_count() {
            match ProgramManager::get_program_info(index) {
                Ok(info) => println!(
                    "{}\talphabet {:?}, {} states, {} transitions",
                    info.name, info.alphabet, info.state_count, info.transition_count
                ),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        return ExitCode::SUCCESS;
    }

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!("Failed to install Ctrl-C handler: {}", e);
    }

    match run(&cli, &cancel) {
        Ok(tape) => {
            println!("{}", render_tape(&tape));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, cancel: &CancellationToken) -> Result<Tape, TuringMachineError> {
    let (program, mut config, example_input) = load_program(cli, cancel)?;

    if let Some(path) = &cli.config {
        config = MachineConfig::load(path)?;
    }
    apply_overrides(cli, &mut config);

    if config.alphabet.is_empty() {
        config.alphabet = program.symbols().into_iter().collect();
        tracing::debug!("Inferred alphabet {:?}", config.alphabet);
    }

    let machine = TuringMachine::from_config(&config, program)?;
    let input = tape_from_str(cli.input.as_deref().unwrap_or(example_input), 0);

    if cli.debug {
        run_debug(machine.start(cli.carriage, &input), cancel)
    } else {
        machine.exec_with_cancel(cancel, cli.carriage, &input)
    }
}

/// Loads the program from a built-in, a file, or stdin, together with the configuration and
/// input that come with it.
fn load_program(
    cli: &Cli,
    cancel: &CancellationToken,
) -> Result<(Program, MachineConfig, &'static str), TuringMachineError> {
    if let Some(name) = &cli.builtin {
        let builtin = ProgramManager::get_program_by_name(name)?;
        Ok((builtin.program()?, builtin.config.clone(), builtin.example_input))
    } else if let Some(path) = &cli.program {
        let program = ProgramLoader::load_program_with_cancel(path, cancel)?;
        Ok((program, MachineConfig::default(), ""))
    } else if atty::isnt(atty::Stream::Stdin) {
        let program = read_with_cancel(io::stdin().lock(), cancel)?;
        Ok((program, MachineConfig::default(), ""))
    } else {
        Err(TuringMachineError::FileError(
            "no program given: pass a file, --builtin, or pipe a program into stdin".to_string(),
        ))
    }
}

fn apply_overrides(cli: &Cli, config: &mut MachineConfig) {
    if let Some(alphabet) = &cli.alphabet {
        config.alphabet.clone_from(alphabet);
    }
    if let Some(start) = &cli.start {
        config.start_state.clone_from(start);
    }
    if let Some(terminal) = &cli.terminal {
        config.terminal_state.clone_from(terminal);
    }
    if let Some(max_tape_length) = cli.max_tape_length {
        config.max_tape_length = max_tape_length;
    }
    if let Some(max_steps) = cli.max_steps {
        config.max_steps = max_steps;
    }
}

/// Steps through the run, printing the machine after every step.
fn run_debug(
    mut execution: Execution<'_>,
    cancel: &CancellationToken,
) -> Result<Tape, TuringMachineError> {
    print_state(&execution);

    loop {
        if cancel.is_cancelled() {
            return Err(TuringMachineError::Cancelled);
        }

        match execution.step()? {
            Step::Continue => print_state(&execution),
            Step::Halt => {
                println!("\nMachine halted.\n\nFinal tape:");
                return Ok(execution.into_tape());
            }
        }
    }
}

fn print_state(execution: &Execution<'_>) {
    println!(
        "Step: {}, State: {}, Carriage: {}, Tape: [{}]",
        execution.step_count(),
        execution.state(),
        execution.carriage(),
        render_tape(execution.tape())
    );
}
