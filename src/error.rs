//! Error types for ftp-deploy
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{PackagingError, TransportError};
use crate::domain::value_objects::RemoteTargetError;

/// Result type alias for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Staging the project or installing dependencies failed
    #[error("packaging failed: {0}")]
    Packaging(#[from] PackagingError),

    /// Connecting or logging in to the server failed
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: TransportError,
    },

    /// A remote directory, listing or upload operation failed
    #[error("remote {operation} '{path}' failed: {source}")]
    Remote {
        operation: &'static str,
        path: String,
        #[source]
        source: TransportError,
    },

    /// A caller-supplied hook failed
    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid remote target path
    #[error("invalid remote target: {0}")]
    RemoteTarget(#[from] RemoteTargetError),

    /// Configuration file could not be read or parsed
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Required setting is missing
    #[error("missing required setting '{0}'")]
    MissingSetting(&'static str),

    /// The staging directory could not be created
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Deployment was cancelled (Ctrl+C)
    #[error("deployment cancelled")]
    Cancelled,
}

impl DeployError {
    pub fn remote(operation: &'static str, path: impl Into<String>, source: TransportError) -> Self {
        DeployError::Remote {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Stable identifier for JSON output
    pub fn code(&self) -> &'static str {
        match self {
            DeployError::Packaging(_) => "packaging",
            DeployError::Connect { .. } => "connect",
            DeployError::Remote { .. } => "remote",
            DeployError::Hook { .. } => "hook",
            DeployError::RemoteTarget(_) => "remote_target",
            DeployError::Config { .. } => "config",
            DeployError::MissingSetting(_) => "missing_setting",
            DeployError::Io(_) => "io",
            DeployError::Cancelled => "cancelled",
        }
    }
}
