//! The shell loop: reading lines, dispatching sub-commands, and the per-line
//! wait barrier.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::Child;

use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::env::Session;
use crate::lexer::Token;
use crate::redirect::Redirection;
use crate::{builtin, external, lexer, parser, report};

const PROMPT: &str = "parsh> ";

/// The interpreter drives one shell session over an input source.
///
/// Lines are processed one at a time: every sub-command of a line is
/// dispatched (built-ins inline, externals as concurrent children) and the
/// line is complete only once every launched child has been waited on. No
/// command of a later line starts before that barrier.
pub struct Interpreter {
    session: Session,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
        }
    }

    /// Read lines from standard input, printing a prompt before each one.
    ///
    /// Ends cleanly on `exit`, end of input, or an interrupt at the prompt.
    pub fn run_interactive(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    self.process_line(&line);
                    if self.session.should_exit {
                        return Ok(());
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Read lines from a batch file, with no prompt.
    ///
    /// Failing to open the file is a fatal invocation error; the caller maps
    /// it to a failure exit status.
    pub fn run_batch(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("cannot open batch file {}", path.display()))?;
        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("reading {}", path.display()))?;
            self.process_line(&line);
            if self.session.should_exit {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Run every sub-command of one line and wait for all of its children.
    pub fn process_line(&mut self, line: &str) {
        let tokens = lexer::split_into_tokens(line);
        let groups = parser::split_commands(tokens);
        debug!(subcommands = groups.len(), "processing line");

        let mut jobs: Vec<Child> = Vec::new();
        for group in &groups {
            self.dispatch(group, &mut jobs);
            if self.session.should_exit {
                // The process is terminating; leave launched children to the
                // operating system, as a mid-line exit always has.
                return;
            }
        }

        for mut child in jobs {
            if let Err(error) = child.wait() {
                debug!(pid = child.id(), %error, "wait failed");
            }
        }
    }

    /// Route one sub-command group: built-ins run inline, anything else is
    /// launched as a child and enters the line's job set.
    fn dispatch(&mut self, group: &[Token], jobs: &mut Vec<Child>) {
        // Built-ins see their group's raw words, redirection symbols
        // included; only the external path strips a clause.
        let words: Vec<String> = group.iter().map(|t| t.text().to_string()).collect();
        if let Some(result) = builtin::dispatch(&words, &mut self.session) {
            if result.is_err() {
                report();
            }
            return;
        }

        let command = match parser::parse_command(group) {
            Ok(command) => command,
            Err(error) => {
                debug!(?error, "malformed redirection");
                report();
                return;
            }
        };

        let redirection = match &command.redirect {
            Some(target) => match Redirection::open(target) {
                Ok(redirection) => Some(redirection),
                Err(error) => {
                    debug!(file = %target, %error, "opening redirection target failed");
                    report();
                    return;
                }
            },
            None => None,
        };

        if let Some(child) = external::launch(&command.argv, &self.session.search_path, redirection)
        {
            jobs.push(child);
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
