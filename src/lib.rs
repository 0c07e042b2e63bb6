//! A line-oriented command interpreter with search-path lookup, output
//! redirection, and parallel command launch.
//!
//! Each input line holds one or more sub-commands separated by `&`. Built-in
//! commands (`path`, `cd`, `exit`) run synchronously in the shell process and
//! mutate the [`Session`]; everything else is resolved against the session's
//! search path and spawned as a child process. All children launched from one
//! line run concurrently, and the shell waits for every one of them before
//! reading the next line. A trailing `> file` clause on a sub-command sends
//! both its standard output and standard error to `file`.
//!
//! The main entry point is [`Interpreter`], which drives either an
//! interactive prompt or a batch file. The [`lexer`] and [`parser`] modules
//! expose the tokenizer and sub-command splitter for embedding and testing.
//!
//! Unix only: spawning relies on executable permission bits and on passing
//! the command name as argument 0 of the child.

mod builtin;
pub mod env;
mod external;
mod interpreter;
pub mod lexer;
pub mod parser;
mod redirect;

pub use env::Session;
pub use interpreter::Interpreter;

/// The single diagnostic line written for every recoverable shell failure.
///
/// Malformed redirections, unresolvable commands, failed spawns, and bad
/// built-in usage all print exactly this line to the error stream in effect
/// for the failing sub-command; nothing else is ever printed for them.
pub const DIAGNOSTIC: &str = "An error has occurred";

/// Write the diagnostic to the shell's own error stream.
pub(crate) fn report() {
    eprintln!("{DIAGNOSTIC}");
}
