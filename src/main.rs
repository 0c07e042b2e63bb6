use std::path::Path;
use std::process::ExitCode;

use argh::FromArgs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use parsh::{DIAGNOSTIC, Interpreter};

#[derive(FromArgs)]
/// A line-oriented command interpreter. Commands on one line separated by `&`
/// run concurrently; `> file` sends a command's output and error streams to
/// `file`; `path`, `cd`, and `exit` are built in.
struct Invocation {
    /// batch file to read commands from instead of standard input
    #[argh(positional)]
    script: Option<String>,
}

/// Debug telemetry to stderr, off unless `RUST_LOG` asks for it, so the
/// shell's error stream carries nothing but the fixed diagnostic by default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();
    let invocation = match Invocation::from_args(&[args[0].as_str()], &rest) {
        Ok(invocation) => invocation,
        Err(early_exit) => {
            return if early_exit.status.is_ok() {
                println!("{}", early_exit.output);
                ExitCode::SUCCESS
            } else {
                eprintln!("{DIAGNOSTIC}");
                ExitCode::FAILURE
            };
        }
    };

    let mut interpreter = Interpreter::new();
    let result = match &invocation.script {
        Some(script) => interpreter.run_batch(Path::new(script)),
        None => interpreter.run_interactive(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            debug!(%error, "fatal");
            eprintln!("{DIAGNOSTIC}");
            ExitCode::FAILURE
        }
    }
}
