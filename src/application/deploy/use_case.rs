//! Deploy Use Case
//!
//! Orchestrates the deployment flow:
//! 1. Package the project while connecting to the server
//! 2. Plan the leaf directories
//! 3. Replace the remote target with an empty directory
//! 4. Create the leaf directories
//! 5. Upload every staged file
//! 6. Close the session and remove the staging directory
//!
//! Caller hooks run before directory creation, before upload and before
//! the connection closes. Teardown runs whatever happened before it.

use std::path::Path;

use tempfile::TempDir;

use crate::config::DeploymentConfig;
use crate::domain::ports::{
    ConnectionSettings, DeployHooks, DeployStatus, PackagedProject, Packager, Transport,
};
use crate::domain::services::leaf_directories;
use crate::domain::value_objects::{RelativePath, RemoteTarget};
use crate::error::{DeployError, DeployResult};

use super::cancel::CancelToken;
use super::result::{DeployReport, DeployStage};

/// Prefix of the temporary staging directory
const STAGING_PREFIX: &str = "ftp-deploy-";

/// Deploy use case - orchestrates the deployment flow
///
/// Parameterized by its ports so tests can pair a fake packager with
/// `MemoryTransport`.
pub struct DeployUseCase<P, T>
where
    P: Packager,
    T: Transport,
{
    packager: P,
    transport: T,
}

impl<P, T> DeployUseCase<P, T>
where
    P: Packager,
    T: Transport,
{
    pub fn new(packager: P, transport: T) -> Self {
        Self {
            packager,
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Deploy `project` to the configured remote target
    ///
    /// Returns the first error of stages 1 through 7. The connection is
    /// closed and the staging directory removed in every case.
    pub fn execute(
        &mut self,
        project: &Path,
        config: &DeploymentConfig,
        hooks: &mut dyn DeployHooks,
        cancel: &CancelToken,
    ) -> DeployResult<DeployReport> {
        hooks.on_status_update(&DeployStatus::Started {
            project: project.to_path_buf(),
        });

        let staging = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir()?;
        log::debug!("staging directory {}", staging.path().display());
        hooks.on_status_update(&DeployStatus::StagingCreated {
            directory: staging.path().to_path_buf(),
        });

        let mut report = DeployReport::new();
        let outcome = self.run(project, staging.path(), config, hooks, cancel, &mut report);

        self.teardown(staging);
        outcome?;

        hooks.on_status_update(&DeployStatus::Completed);
        log::info!(
            "deployed {} files ({} bytes) to {}",
            report.file_count(),
            report.bytes_sent,
            config.display_destination()
        );
        Ok(report)
    }

    fn run(
        &mut self,
        project: &Path,
        staging: &Path,
        config: &DeploymentConfig,
        hooks: &mut dyn DeployHooks,
        cancel: &CancelToken,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        enter(DeployStage::Stage, cancel)?;
        let packaged = self.stage(project, staging, &config.connection, hooks)?;
        hooks.on_status_update(&DeployStatus::ConnectionEstablished {
            host: config.connection.host.clone(),
        });

        enter(DeployStage::Plan, cancel)?;
        let leaves = leaf_directories(&packaged.files);
        log::debug!(
            "{} files, {} leaf directories",
            packaged.files.len(),
            leaves.len()
        );

        enter(DeployStage::ResetRemote, cancel)?;
        hooks.on_status_update(&DeployStatus::PreparingRemote {
            target: config.remote_target.to_string(),
        });
        self.reset_remote(&config.remote_target)?;

        enter(DeployStage::BeforeDirectoriesCreation, cancel)?;
        hooks
            .before_directories_creation(&mut self.transport, &leaves)
            .map_err(|source| DeployError::Hook {
                hook: "before_directories_creation",
                source,
            })?;

        enter(DeployStage::CreateDirectories, cancel)?;
        for directory in &leaves {
            check(cancel)?;
            self.transport
                .make_directory(directory.as_str(), true)
                .map_err(|e| DeployError::remote("mkdir", directory.as_str(), e))?;
            hooks.on_directory_created(directory);
            report.directories_created.push(directory.clone());
        }

        enter(DeployStage::BeforeUpload, cancel)?;
        hooks
            .before_upload(&mut self.transport, &packaged.files)
            .map_err(|source| DeployError::Hook {
                hook: "before_upload",
                source,
            })?;

        enter(DeployStage::Upload, cancel)?;
        hooks.on_status_update(&DeployStatus::Uploading {
            files: packaged.files.len(),
        });
        for file in &packaged.files {
            check(cancel)?;
            report.bytes_sent += self.upload(&packaged, file)?;
            hooks.on_file_uploaded(file);
            report.files_uploaded.push(file.clone());
        }

        enter(DeployStage::BeforeClosingConnection, cancel)?;
        if let Err(e) = hooks.before_closing_connection(&mut self.transport) {
            let message = format!("{:#}", e);
            log::error!("before closing connection hook failed: {}", message);
            hooks.on_status_update(&DeployStatus::Error {
                message: message.clone(),
            });
            report.pre_close_error = Some(message);
        }

        Ok(())
    }

    /// Package on this thread while the transport connects on another
    fn stage(
        &mut self,
        project: &Path,
        staging: &Path,
        settings: &ConnectionSettings,
        hooks: &mut dyn DeployHooks,
    ) -> DeployResult<PackagedProject> {
        let packager = &self.packager;
        let transport = &mut self.transport;

        let (packaged, connected) = std::thread::scope(|scope| {
            let connecting = scope.spawn(move || connect(transport, settings));
            let packaged = packager.package(project, staging, &mut |status| {
                hooks.on_status_update(&status)
            });
            let connected = connecting
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (packaged, connected)
        });

        let packaged = packaged?;
        connected?;
        Ok(packaged)
    }

    /// Leave the session inside an empty remote target
    fn reset_remote(&mut self, target: &RemoteTarget) -> DeployResult<()> {
        let transport = &mut self.transport;

        transport
            .change_directory(target.parent())
            .map_err(|e| DeployError::remote("cwd", target.parent(), e))?;

        let entries = transport
            .list()
            .map_err(|e| DeployError::remote("list", target.parent(), e))?;

        if entries.iter().any(|entry| entry.name == target.name()) {
            log::info!("removing existing remote directory {}", target);
            transport
                .remove_directory(target.name(), true)
                .map_err(|e| DeployError::remote("rmdir", target.to_string(), e))?;
        }

        transport
            .make_directory(target.name(), false)
            .map_err(|e| DeployError::remote("mkdir", target.to_string(), e))?;
        transport
            .change_directory(target.name())
            .map_err(|e| DeployError::remote("cwd", target.to_string(), e))?;
        Ok(())
    }

    fn upload(&mut self, packaged: &PackagedProject, file: &RelativePath) -> DeployResult<u64> {
        let local = packaged.local_path(file);
        let bytes = self
            .transport
            .upload_file(&local, file.as_str())
            .map_err(|e| DeployError::remote("upload", file.as_str(), e))?;
        log::debug!("uploaded {} ({} bytes)", file, bytes);
        Ok(bytes)
    }

    /// Close the session and remove the staging directory; failures are only logged
    fn teardown(&mut self, staging: TempDir) {
        log::debug!("entering {} stage", DeployStage::Teardown);

        if let Err(e) = self.transport.close() {
            log::warn!("failed to close connection: {}", e);
        }

        let directory = staging.path().to_path_buf();
        if let Err(e) = staging.close() {
            log::warn!(
                "failed to remove staging directory {}: {}",
                directory.display(),
                e
            );
        }
    }
}

fn connect<T: Transport>(transport: &mut T, settings: &ConnectionSettings) -> DeployResult<()> {
    log::info!("connecting to {}:{}", settings.host, settings.port);
    transport
        .connect(settings)
        .and_then(|()| transport.await_ready())
        .map_err(|source| DeployError::Connect {
            host: settings.host.clone(),
            source,
        })
}

fn enter(stage: DeployStage, cancel: &CancelToken) -> DeployResult<()> {
    check(cancel)?;
    log::debug!("entering {} stage", stage);
    Ok(())
}

fn check(cancel: &CancelToken) -> DeployResult<()> {
    if cancel.is_cancelled() {
        Err(DeployError::Cancelled)
    } else {
        Ok(())
    }
}
