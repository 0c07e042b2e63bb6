//! Resolving external commands against the search path and launching them.

use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};

use crate::redirect::Redirection;
use crate::report;
use tracing::debug;

/// Why a command name produced no executable path.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ResolveError {
    /// The search path had no entries; resolution was not attempted.
    EmptySearchPath,
    /// Every search-path entry was tried and none held an executable match.
    NotFound,
}

/// Find the first executable candidate for `name`, trying the search-path
/// directories in order. Candidates are the plain join of directory and name;
/// the name itself is never interpreted as a path.
pub(crate) fn resolve(name: &str, search_path: &[PathBuf]) -> Result<PathBuf, ResolveError> {
    if search_path.is_empty() {
        return Err(ResolveError::EmptySearchPath);
    }
    search_path
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
        .ok_or(ResolveError::NotFound)
}

fn is_executable(path: &Path) -> bool {
    match path.metadata() {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

/// Launch one external sub-command, returning its handle for the end-of-line
/// wait.
///
/// The argument vector is passed to the child unchanged: argument 0 stays the
/// command name, with the resolved path used only as the program image. Any
/// failure (resolution, handle duplication, or the spawn itself) writes the
/// fixed diagnostic to the error stream in effect for this sub-command (the
/// redirection target when a clause is present, the shell's stderr otherwise)
/// and yields no job.
pub(crate) fn launch(
    argv: &[String],
    search_path: &[PathBuf],
    mut redirection: Option<Redirection>,
) -> Option<Child> {
    let name = argv.first()?;

    let program = match resolve(name, search_path) {
        Ok(program) => program,
        Err(error) => {
            debug!(command = %name, ?error, "resolution failed");
            report_failure(redirection.as_mut());
            return None;
        }
    };

    let mut command = Command::new(&program);
    command.arg0(name).args(&argv[1..]);

    if let Some(active) = &redirection {
        match active.child_io() {
            Ok((stdout, stderr)) => {
                command.stdout(stdout).stderr(stderr);
            }
            Err(error) => {
                debug!(%error, "duplicating redirection handles failed");
                report();
                return None;
            }
        }
    }

    match command.spawn() {
        Ok(child) => {
            debug!(command = %name, program = %program.display(), pid = child.id(), "spawned");
            Some(child)
        }
        Err(error) => {
            debug!(command = %name, %error, "spawn failed");
            report_failure(redirection.as_mut());
            None
        }
    }
}

fn report_failure(redirection: Option<&mut Redirection>) {
    match redirection {
        Some(active) => active.report(),
        None => report(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let p = std::env::temp_dir().join(format!(
            "parsh_external_{}_{}_{}",
            tag,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&p).unwrap();
        p
    }

    fn install_script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn empty_search_path_refuses_resolution() {
        assert_eq!(resolve("sh", &[]), Err(ResolveError::EmptySearchPath));
    }

    #[test]
    fn exhausted_search_path_is_not_found() {
        let empty = make_unique_temp_dir("empty");
        assert_eq!(
            resolve("no_such_command", &[empty.clone()]),
            Err(ResolveError::NotFound)
        );
        let _ = fs::remove_dir_all(empty);
    }

    #[test]
    fn directories_are_tried_in_order() {
        let first = make_unique_temp_dir("first");
        let second = make_unique_temp_dir("second");
        install_script(&first, "tool", ":");
        install_script(&second, "tool", ":");

        let found = resolve("tool", &[first.clone(), second.clone()]).unwrap();
        assert_eq!(found, first.join("tool"));

        let _ = fs::remove_dir_all(first);
        let _ = fs::remove_dir_all(second);
    }

    #[test]
    fn a_non_executable_file_does_not_shadow_a_later_match() {
        let first = make_unique_temp_dir("plain");
        let second = make_unique_temp_dir("exec");
        fs::write(first.join("tool"), "not a program").unwrap();
        install_script(&second, "tool", ":");

        let found = resolve("tool", &[first.clone(), second.clone()]).unwrap();
        assert_eq!(found, second.join("tool"));

        let _ = fs::remove_dir_all(first);
        let _ = fs::remove_dir_all(second);
    }

    #[test]
    fn launch_runs_the_resolved_script() {
        let bin = make_unique_temp_dir("bin");
        let out = bin.join("touched");
        install_script(&bin, "mark", "printf ok > \"$1\"");

        let argv = vec![
            String::from("mark"),
            out.to_string_lossy().into_owned(),
        ];
        let mut child = launch(&argv, &[bin.clone()], None).expect("spawn");
        child.wait().unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), "ok");
        let _ = fs::remove_dir_all(bin);
    }

    #[test]
    fn launch_without_a_resolvable_command_yields_no_job() {
        let empty = make_unique_temp_dir("none");
        let argv = vec![String::from("absent")];
        assert!(launch(&argv, &[empty.clone()], None).is_none());
        assert!(launch(&argv, &[], None).is_none());
        let _ = fs::remove_dir_all(empty);
    }

    #[test]
    fn launch_failure_reports_into_the_redirection_target() {
        let dir = make_unique_temp_dir("redir");
        let target = dir.join("err.txt");

        let redirection = Redirection::open(target.to_str().unwrap()).unwrap();
        let argv = vec![String::from("absent")];
        assert!(launch(&argv, &[], Some(redirection)).is_none());

        let contents = fs::read_to_string(&target).unwrap();
        assert_eq!(contents, format!("{}\n", crate::DIAGNOSTIC));
        let _ = fs::remove_dir_all(dir);
    }
}
