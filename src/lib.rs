//! ftp-deploy - deploy a Node.js project to an FTP server
//!
//! A deployment stages the package's own files together with the runtime part
//! of its production dependencies, wipes the remote target directory, creates
//! the minimal set of leaf directories and uploads every staged file.
//!
//! ## Layers
//!
//! - `domain` - value objects, the leaf-directory reducer and the ports
//! - `infrastructure` - npm packaging, FTP and in-memory transports
//! - `application` - the `DeployUseCase` pipeline
//! - `config` - `ftp-deploy.toml`, environment overrides

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{CancelToken, DeployReport, DeployStage, DeployUseCase};
pub use config::{Config, DeploymentConfig};
pub use domain::ports::{DeployHooks, DeployStatus, NoopHooks, Packager, Transport};
pub use domain::services::leaf_directories;
pub use domain::value_objects::{RelativePath, RemoteTarget};
pub use error::{DeployError, DeployResult};
pub use infrastructure::{FtpTransport, MemoryTransport, NpmPackager};
