//! Working-directory state for an interactive session and the path helpers
//! that resolve operator input against it.

pub const ROOT: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    working_dir: String,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            working_dir: ROOT.to_string(),
        }
    }

    pub fn working_dir(&self) -> &str {
        &self.working_dir
    }

    /// Resolves `input` against the working directory into a normalized absolute path.
    pub fn resolve(&self, input: &str) -> String {
        if input.starts_with('/') {
            normalize_path(input)
        } else {
            normalize_path(&format!("{}/{}", self.working_dir, input))
        }
    }

    /// Only the change-directory operation moves the session, after the master
    /// has confirmed the destination.
    pub(crate) fn set_working_dir(&mut self, path: String) {
        self.working_dir = path;
    }
}

pub fn normalize_path(input: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in input.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        ROOT.to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

pub fn join_path(directory: &str, name: &str) -> String {
    normalize_path(&format!("{}/{}", directory, name))
}

/// True when `target` is `path` itself or one of its ancestors, compared segment by segment.
pub fn is_ancestor_or_self(target: &str, path: &str) -> bool {
    let target = normalize_path(target);
    let path = normalize_path(path);

    if target == ROOT || target == path {
        return true;
    }

    path.strip_prefix(target.as_str())
        .is_some_and(|rest| rest.starts_with('/'))
}
