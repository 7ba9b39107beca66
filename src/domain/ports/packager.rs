//! Packager Port
//!
//! Produces the local staging tree whose contents are mirrored remotely.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::deploy_hooks::DeployStatus;
use crate::domain::value_objects::RelativePath;

/// Result type for packaging
pub type PackagingResult<T> = Result<T, PackagingError>;

/// Packaging errors
#[derive(Debug, Error)]
pub enum PackagingError {
    /// Reading the project or writing the staging directory failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The package manifest is missing or malformed
    #[error("invalid manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// An external command could not be started
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The dependency installer exited unsuccessfully
    #[error("'{program}' exited with {status}: {stderr}")]
    Install {
        program: String,
        status: String,
        stderr: String,
    },

    /// The packed archive could not be produced or read
    #[error("package archive error: {0}")]
    Archive(String),

    /// Walking a directory tree failed
    #[error("failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },
}

impl PackagingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PackagingError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A staged project ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedProject {
    /// Local directory holding the staged files
    pub directory: PathBuf,
    /// Every file to upload, relative to `directory`
    pub files: Vec<RelativePath>,
}

impl PackagedProject {
    /// Local path of a staged file
    pub fn local_path(&self, file: &RelativePath) -> PathBuf {
        file.segments()
            .fold(self.directory.clone(), |acc, segment| acc.join(segment))
    }
}

/// Stages a project into a directory
pub trait Packager {
    /// Stage `project` into the empty directory `staging`
    ///
    /// `report` receives status milestones (e.g. dependency installation).
    fn package(
        &self,
        project: &Path,
        staging: &Path,
        report: &mut dyn FnMut(DeployStatus),
    ) -> PackagingResult<PackagedProject>;
}
