//! Remote Target Value Object
//!
//! The directory on the FTP server that a deployment fully replaces,
//! split into the parent to `CWD` into and the basename to recreate.

use std::fmt;

/// Error when a remote target path cannot be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTargetError {
    /// Path is empty
    Empty,
    /// Path points at the server root, which cannot be replaced
    Root,
    /// Path ends in `.` or `..`
    NotADirectoryName(String),
}

impl fmt::Display for RemoteTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteTargetError::Empty => write!(f, "remote path is empty"),
            RemoteTargetError::Root => {
                write!(f, "remote path '/' cannot be replaced; choose a subdirectory")
            }
            RemoteTargetError::NotADirectoryName(path) => {
                write!(f, "remote path '{}' does not end in a directory name", path)
            }
        }
    }
}

impl std::error::Error for RemoteTargetError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    parent: String,
    name: String,
}

impl RemoteTarget {
    /// Split a remote path (`/www/app`, `app`, `www/app/`) into parent and basename
    pub fn parse(path: &str) -> Result<Self, RemoteTargetError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(RemoteTargetError::Empty);
        }

        let without_trailing = trimmed.trim_end_matches('/');
        if without_trailing.is_empty() {
            return Err(RemoteTargetError::Root);
        }

        let (parent, name) = match without_trailing.rsplit_once('/') {
            Some(("", name)) => ("/".to_string(), name),
            Some((parent, name)) => (parent.to_string(), name),
            None => (".".to_string(), without_trailing),
        };

        if name == "." || name == ".." {
            return Err(RemoteTargetError::NotADirectoryName(path.to_string()));
        }

        Ok(Self {
            parent,
            name: name.to_string(),
        })
    }

    /// Directory containing the target
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Basename of the target directory
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent.as_str() {
            "." => write!(f, "{}", self.name),
            "/" => write!(f, "/{}", self.name),
            parent => write!(f, "{}/{}", parent, self.name),
        }
    }
}
