//! Output redirection for a single sub-command.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::process::Stdio;

use crate::DIAGNOSTIC;

/// The two output handles backing a `> file` clause.
///
/// The target is opened twice, once per stream, so standard output and
/// standard error keep independent file offsets and their writes interleave
/// byte-for-byte, the same way two separate `open(2)` calls would. Both opens
/// are write-only, create the file if absent, truncate it if present, and use
/// mode 0644.
///
/// The handles are owned by this value and scoped to one launch: the child
/// receives duplicates, and dropping the `Redirection` releases the parent's
/// copies. The shell's own standard streams are never rebound.
pub(crate) struct Redirection {
    stdout: File,
    stderr: File,
}

impl Redirection {
    /// Open the target once per stream.
    pub(crate) fn open(target: &str) -> io::Result<Self> {
        let open = || {
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o644)
                .open(target)
        };
        Ok(Self {
            stdout: open()?,
            stderr: open()?,
        })
    }

    /// Duplicate the handles for a child's standard output and error.
    ///
    /// The duplicates share offsets with the parent's handles, so a failure
    /// reported through [`Redirection::report`] lands in the same stream the
    /// child would have written to.
    pub(crate) fn child_io(&self) -> io::Result<(Stdio, Stdio)> {
        Ok((
            Stdio::from(self.stdout.try_clone()?),
            Stdio::from(self.stderr.try_clone()?),
        ))
    }

    /// Write the fixed diagnostic into the redirected error stream, as the
    /// launched command itself would have.
    pub(crate) fn report(&mut self) {
        let _ = writeln!(self.stderr, "{DIAGNOSTIC}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let p = std::env::temp_dir().join(format!(
            "parsh_redirect_{}_{}",
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&p).unwrap();
        p
    }

    #[test]
    fn creates_the_target_owner_readable_and_writable() {
        let dir = make_unique_temp_dir();
        let target = dir.join("out.txt");

        let _redirection = Redirection::open(target.to_str().unwrap()).unwrap();
        // The requested mode is 0644; the process umask may mask group/other
        // bits, so only the owner bits are asserted.
        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o700, 0o600);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn truncates_an_existing_target() {
        let dir = make_unique_temp_dir();
        let target = dir.join("out.txt");
        fs::write(&target, "stale contents").unwrap();

        let _redirection = Redirection::open(target.to_str().unwrap()).unwrap();
        assert_eq!(fs::metadata(&target).unwrap().len(), 0);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn streams_have_independent_offsets() {
        let dir = make_unique_temp_dir();
        let target = dir.join("out.txt");

        let mut redirection = Redirection::open(target.to_str().unwrap()).unwrap();
        redirection.stdout.write_all(b"aa").unwrap();
        // The error stream starts at offset zero of its own open.
        redirection.stderr.write_all(b"b").unwrap();
        drop(redirection);

        assert_eq!(fs::read(&target).unwrap(), b"ba");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn report_lands_in_the_target() {
        let dir = make_unique_temp_dir();
        let target = dir.join("out.txt");

        let mut redirection = Redirection::open(target.to_str().unwrap()).unwrap();
        redirection.report();
        drop(redirection);

        let contents = fs::read_to_string(&target).unwrap();
        assert_eq!(contents, format!("{DIAGNOSTIC}\n"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn unwritable_target_fails_to_open() {
        let dir = make_unique_temp_dir();
        let target = dir.join("missing").join("out.txt");
        assert!(Redirection::open(target.to_str().unwrap()).is_err());
        let _ = fs::remove_dir_all(dir);
    }
}
