use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use yezu::frontend;

#[derive(Debug, Parser)]
#[command(name = "yezu", version, about = "Checks a Yezu source file")]
struct Cli {
    /// Source file to check
    #[arg(required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Print every token, comments included
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program
    #[arg(long)]
    ast: bool,

    /// Print inferred function signatures and the final stack
    #[arg(long)]
    signatures: bool,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    completions: Option<Shell>,
}

/// Writes log records to stderr
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "yezu", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let Some(input) = cli.input.as_ref() else {
        eprintln!("{}", Cli::command().render_usage());
        return ExitCode::FAILURE;
    };
    let path = input.to_string_lossy();

    let source = match fs::read_to_string(input) {
        Ok(source) => source,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            eprintln!("ERROR: file '{}' not found", path);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("ERROR: failed to read '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    if cli.tokens {
        for token in frontend::tokens(&source, &path) {
            println!("{}", token);
        }
    }

    log::info!("Checking {}...", path);
    let checked = match frontend::check_source(&source, &path) {
        Ok(checked) => checked,
        Err(e) => {
            log::debug!("failed with {}", e.name());
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.ast {
        print!("{}", checked.program);
    }

    if cli.signatures {
        for (name, signature) in &checked.report.signatures {
            println!("{} {}", name, signature);
        }
        println!("stack {}", checked.report.stack);
    }

    log::info!("{} ok", path);
    ExitCode::SUCCESS
}
