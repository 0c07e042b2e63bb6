//! Built-in commands: `path`, `cd`, and `exit`.
//!
//! Built-ins execute synchronously in the shell's own process and mutate the
//! [`Session`]; they never spawn. They are handed the raw words of their
//! sub-command group, so a `>` among the arguments is just another word:
//! redirection does not apply to built-ins.

use crate::env::Session;
use anyhow::{Result, anyhow, bail};
use argh::FromArgs;
use std::path::PathBuf;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Built-ins are parsed with [`argh`] (`FromArgs`) and use greedy positionals
/// so that flag-looking words (`-l`, `--x`) reach them unchanged; arity is
/// checked in `execute`.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Executes the command against the session. An `Err` is a usage or
    /// state-change failure; the session is left unchanged.
    fn execute(self, session: &mut Session) -> Result<()>;
}

/// Run `argv` as a built-in if its name is one, returning `None` for any
/// other name so the caller falls through to external dispatch.
pub(crate) fn dispatch(argv: &[String], session: &mut Session) -> Option<Result<()>> {
    let name = argv.first()?;
    let args: Vec<&str> = argv[1..].iter().map(String::as_str).collect();

    let result = match name.as_str() {
        n if n == SearchPath::name() => run::<SearchPath>(&args, session),
        n if n == Cd::name() => run::<Cd>(&args, session),
        n if n == Exit::name() => run::<Exit>(&args, session),
        _ => return None,
    };
    if let Err(error) = &result {
        debug!(builtin = %name, %error, "builtin failed");
    }
    Some(result)
}

fn run<T: BuiltinCommand>(args: &[&str], session: &mut Session) -> Result<()> {
    // argh's greedy positional only ends option parsing *after* a non-flag
    // positional has been consumed, so a leading flag-looking word (`--bin`)
    // would otherwise be rejected as an unknown option. Prepend the `--`
    // end-of-options separator so every word reaches the greedy positional
    // verbatim, as the built-ins require.
    let mut with_sep = Vec::with_capacity(args.len() + 1);
    with_sep.push("--");
    with_sep.extend_from_slice(args);
    let command = T::from_args(&[T::name()], &with_sep)
        .map_err(|exit| anyhow!("{}: {}", T::name(), exit.output.trim()))?;
    command.execute(session)
}

#[derive(FromArgs)]
/// Replace the executable search path with the given directories.
pub(crate) struct SearchPath {
    /// directories to search in order; the path is emptied when none are given
    #[argh(positional, greedy)]
    pub dirs: Vec<String>,
}

impl BuiltinCommand for SearchPath {
    fn name() -> &'static str {
        "path"
    }

    fn execute(self, session: &mut Session) -> Result<()> {
        session.search_path = self.dirs.into_iter().map(PathBuf::from).collect();
        Ok(())
    }
}

#[derive(FromArgs)]
/// Change the working directory of the shell process.
pub(crate) struct Cd {
    /// target directory; exactly one must be given
    #[argh(positional, greedy)]
    pub targets: Vec<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _session: &mut Session) -> Result<()> {
        let [target] = self.targets.as_slice() else {
            bail!("cd expects exactly one directory");
        };
        std::env::set_current_dir(target)
            .map_err(|error| anyhow!("cd: {target}: {error}"))
    }
}

#[derive(FromArgs)]
/// Terminate the shell.
pub(crate) struct Exit {
    /// no arguments are accepted
    #[argh(positional, greedy)]
    pub args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, session: &mut Session) -> Result<()> {
        if !self.args.is_empty() {
            bail!("exit takes no arguments");
        }
        session.should_exit = true;
        Ok(())
    }
}
