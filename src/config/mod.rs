//! Configuration module for ftp-deploy
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (FTP_DEPLOY_*)
//! 3. Project config (ftp-deploy.toml)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    parse_with_warnings, password_from_env, with_env_overrides, ConfigWarning, CONFIG_FILE_NAME,
};
pub use types::{
    Config, DeploymentConfig, FtpConfig, InstallerConfig, PackagingConfig, SourceStrategyKind,
    TransportConfig, DEFAULT_PORT,
};
