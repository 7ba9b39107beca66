//! Deploy Hooks Port
//!
//! Lifecycle callbacks invoked by the deploy pipeline. Every method has a
//! no-op default, so implementations only override what they observe.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::transport::Transport;
use crate::domain::value_objects::RelativePath;

/// Status milestone reported through `DeployHooks::on_status_update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeployStatus {
    /// Deployment of a project directory started
    Started { project: PathBuf },
    /// Local staging directory is ready
    StagingCreated { directory: PathBuf },
    /// Dependency installer is running
    InstallingDependencies,
    /// Remote session accepts commands
    ConnectionEstablished { host: String },
    /// Remote target is being reset and leaf directories created
    PreparingRemote { target: String },
    /// Files are being sent
    Uploading { files: usize },
    /// The pre-close hook failed; the deployment itself continues
    Error { message: String },
    /// Connection closed and staging directory removed
    Completed,
}

impl fmt::Display for DeployStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployStatus::Started { project } => {
                write!(f, "starting deployment of {}", project.display())
            }
            DeployStatus::StagingCreated { directory } => {
                write!(f, "deployment directory {} created", directory.display())
            }
            DeployStatus::InstallingDependencies => write!(f, "installing npm dependencies"),
            DeployStatus::ConnectionEstablished { host } => {
                write!(f, "FTP connection established with {}", host)
            }
            DeployStatus::PreparingRemote { target } => {
                write!(f, "preparing remote directory structure in {}", target)
            }
            DeployStatus::Uploading { files } => write!(f, "uploading {} files", files),
            DeployStatus::Error { message } => write!(f, "error while deploying: {}", message),
            DeployStatus::Completed => write!(f, "deployment completed"),
        }
    }
}

/// Callbacks around the deploy pipeline
///
/// The `before_*` hooks receive the live transport and may issue their own
/// operations (e.g. reading back uploaded files). An `Err` from
/// `before_directories_creation` or `before_upload` aborts the deployment;
/// an `Err` from `before_closing_connection` is only reported.
pub trait DeployHooks {
    fn before_directories_creation(
        &mut self,
        _transport: &mut dyn Transport,
        _directories: &[RelativePath],
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn before_upload(
        &mut self,
        _transport: &mut dyn Transport,
        _files: &[RelativePath],
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn before_closing_connection(&mut self, _transport: &mut dyn Transport) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_directory_created(&mut self, _path: &RelativePath) {}

    fn on_file_uploaded(&mut self, _path: &RelativePath) {}

    fn on_status_update(&mut self, _status: &DeployStatus) {}
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl DeployHooks for NoopHooks {}
