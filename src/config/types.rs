//! Configuration type definitions

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ports::ConnectionSettings;
use crate::domain::value_objects::RemoteTarget;
use crate::error::{DeployError, DeployResult};

use super::loader::{self, ConfigWarning};

/// Default FTP control port
pub const DEFAULT_PORT: u16 = 21;

/// FTP server configuration
///
/// There is deliberately no `password` key: credentials never live in a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FtpConfig {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub user: Option<String>,

    /// Remote directory that is replaced on every deploy
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            user: None,
            path: None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Transport tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    /// Socket read/write timeout in seconds; 0 disables the timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl TransportConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// How the package's own files are resolved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceStrategyKind {
    /// Copy the files declared by `package.json`
    #[default]
    Manifest,
    /// Extract the tarball produced by `npm pack`
    Archive,
}

impl fmt::Display for SourceStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStrategyKind::Manifest => write!(f, "manifest"),
            SourceStrategyKind::Archive => write!(f, "archive"),
        }
    }
}

/// Dependency installer command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallerConfig {
    #[serde(default = "default_installer_program")]
    pub program: String,

    #[serde(default = "default_installer_args")]
    pub args: Vec<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            program: default_installer_program(),
            args: default_installer_args(),
        }
    }
}

fn default_installer_program() -> String {
    "npm".to_string()
}

fn default_installer_args() -> Vec<String> {
    vec![
        "install".to_string(),
        "--production".to_string(),
        "--no-package-lock".to_string(),
    ]
}

/// Packaging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackagingConfig {
    #[serde(default)]
    pub strategy: SourceStrategyKind,

    /// Dependency file extensions worth shipping (without the dot)
    #[serde(default = "default_runtime_extensions")]
    pub runtime_extensions: Vec<String>,

    /// Dependency path segments whose subtrees are skipped
    #[serde(default = "default_excluded_segments")]
    pub excluded_segments: Vec<String>,

    #[serde(default)]
    pub installer: InstallerConfig,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            strategy: SourceStrategyKind::default(),
            runtime_extensions: default_runtime_extensions(),
            excluded_segments: default_excluded_segments(),
            installer: InstallerConfig::default(),
        }
    }
}

fn default_runtime_extensions() -> Vec<String> {
    ["js", "cjs", "mjs", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_excluded_segments() -> Vec<String> {
    vec!["test".to_string()]
}

/// Main configuration structure (`ftp-deploy.toml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub ftp: FtpConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub packaging: PackagingConfig,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> DeployResult<Self> {
        Ok(loader::load_with_warnings(path)?.0)
    }

    /// Load configuration and return non-fatal warnings (unknown keys)
    pub fn load_with_warnings(path: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load `ftp-deploy.toml` from the project directory, or defaults, plus env overrides
    pub fn load_or_default(project_dir: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(project_dir)
    }

    /// Resolve into the immutable settings of one deployment
    pub fn resolve(&self, password: impl Into<String>) -> DeployResult<DeploymentConfig> {
        let host = self
            .ftp
            .host
            .clone()
            .filter(|h| !h.trim().is_empty())
            .ok_or(DeployError::MissingSetting("host"))?;
        let user = self
            .ftp
            .user
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or(DeployError::MissingSetting("user"))?;
        let path = self
            .ftp
            .path
            .as_deref()
            .ok_or(DeployError::MissingSetting("path"))?;

        Ok(DeploymentConfig {
            connection: ConnectionSettings {
                host,
                port: self.ftp.port,
                user,
                password: password.into(),
                timeout: self.transport.timeout(),
            },
            remote_target: RemoteTarget::parse(path)?,
        })
    }
}

/// Settings for one deployment; immutable once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub connection: ConnectionSettings,
    pub remote_target: RemoteTarget,
}

impl DeploymentConfig {
    /// `user@host:path` for display (no password)
    pub fn display_destination(&self) -> String {
        format!(
            "{}@{}:{}",
            self.connection.user, self.connection.host, self.remote_target
        )
    }
}
