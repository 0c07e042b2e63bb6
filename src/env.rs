//! Shell session state.

use std::path::PathBuf;

/// State shared by every sub-command of a session.
///
/// The search path is replaced wholesale by the `path` built-in and read by
/// command resolution; the termination flag is raised by a successful `exit`
/// and observed by the line loop. The working directory is the real process
/// working directory (mutated only by `cd`), so children inherit it, along
/// with a snapshot of the search path, at spawn time.
#[derive(Debug, Clone)]
pub struct Session {
    /// Ordered directories searched for external commands. Empty means no
    /// external command can be found.
    pub search_path: Vec<PathBuf>,
    /// Raised by `exit`; the shell stops reading lines once set.
    pub should_exit: bool,
}

impl Session {
    /// A fresh session: `/bin` as the sole search-path entry.
    pub fn new() -> Self {
        Self {
            search_path: vec![PathBuf::from("/bin")],
            should_exit: false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
