//! Client side tracking of the remote working directory.

use std::fmt;

const ROOT: &str = "/";
const PARENT: &str = "..";

/// The remote working directory of a session.
///
/// Starts at `/` and always begins with `/`. It is only ever changed through
/// `change`, which works on the string itself: going up recomputes the parent
/// from the current path, there is no history to pop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkingDirectory {
    path: String,
}

impl WorkingDirectory {
    pub fn new() -> WorkingDirectory {
        WorkingDirectory { path: ROOT.to_owned() }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT
    }

    /// Navigates to `input` and returns the new working directory.
    /// See `resolve` for the rules.
    pub fn change(&mut self, input: &str) -> &str {
        let next = resolve(&self.path, input);
        trace!("working directory {} -> {}", self.path, next);
        self.path = next;
        &self.path
    }
}

impl Default for WorkingDirectory {
    fn default() -> WorkingDirectory {
        WorkingDirectory::new()
    }
}

impl fmt::Display for WorkingDirectory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for WorkingDirectory {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

/// Computes the working directory reached from `current` by `input`.
///
/// * `..` goes up one level, never above `/`.
/// * A path starting with `/` replaces the current one as is.
/// * Anything else is appended to the current path.
///
/// Surrounding whitespace in `input` is ignored. No other normalisation
/// happens: `//a`, `a/../b` or `.` are kept literally.
pub fn resolve(current: &str, input: &str) -> String {
    let input = input.trim();

    if input == PARENT {
        match current.rfind('/') {
            Some(pos) if pos > 0 => current[..pos].to_owned(),
            _ => ROOT.to_owned(),
        }
    } else if input.starts_with(ROOT) {
        input.to_owned()
    } else if current == ROOT {
        format!("{}{}", ROOT, input)
    } else {
        format!("{}/{}", current, input)
    }
}

/// Builds the `ftp://` URL of `relative` inside `current_dir` on a server.
/// Without a relative part the URL names the directory itself.
///
/// The pieces are concatenated as given, nothing is escaped or normalised.
pub fn target_url(server: &str, port: u16, current_dir: &str, relative: Option<&str>) -> String {
    match relative {
        Some(rel) if !rel.is_empty() => format!("ftp://{}:{}{}/{}", server, port, current_dir, rel),
        _ => format!("ftp://{}:{}{}", server, port, current_dir),
    }
}
