//! Packaging Implementations
//!
//! Stages a Node.js project for upload:
//! 1. copy the package's own files (manifest or packed archive strategy)
//! 2. install production dependencies into the staging directory
//! 3. keep the runtime-relevant part of `node_modules/`

mod archive;
mod installer;
mod manifest;
mod runtime;

use std::collections::BTreeSet;
use std::path::Path;

pub use archive::{extract_package, PackedArchive};
pub use installer::{install_dependencies, run_command};
pub use manifest::{Manifest, ManifestFiles, MANIFEST_FILE};
pub use runtime::{collect_runtime_files, RuntimeFilter, DEPENDENCY_DIR};

use crate::config::{InstallerConfig, PackagingConfig, SourceStrategyKind};
use crate::domain::ports::{
    DeployStatus, PackagedProject, Packager, PackagingError, PackagingResult,
};
use crate::domain::value_objects::RelativePath;

/// Puts the package's own files into the staging directory
pub trait SourceStrategy {
    /// Copy source files of `project` into `staging`, returning what was written
    fn stage(&self, project: &Path, staging: &Path) -> PackagingResult<Vec<RelativePath>>;
}

/// npm-flavoured packager: source strategy + installer + runtime filter
pub struct NpmPackager {
    strategy: Box<dyn SourceStrategy + Send + Sync>,
    installer: InstallerConfig,
    filter: RuntimeFilter,
}

impl NpmPackager {
    pub fn new(
        strategy: Box<dyn SourceStrategy + Send + Sync>,
        installer: InstallerConfig,
        filter: RuntimeFilter,
    ) -> Self {
        Self {
            strategy,
            installer,
            filter,
        }
    }

    pub fn from_config(config: &PackagingConfig) -> Self {
        let strategy: Box<dyn SourceStrategy + Send + Sync> = match config.strategy {
            SourceStrategyKind::Manifest => Box::new(ManifestFiles::new()),
            SourceStrategyKind::Archive => {
                Box::new(PackedArchive::new(config.installer.program.clone()))
            }
        };
        Self::new(
            strategy,
            config.installer.clone(),
            RuntimeFilter::from_config(config),
        )
    }
}

impl std::fmt::Debug for NpmPackager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpmPackager")
            .field("installer", &self.installer)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl Packager for NpmPackager {
    fn package(
        &self,
        project: &Path,
        staging: &Path,
        report: &mut dyn FnMut(DeployStatus),
    ) -> PackagingResult<PackagedProject> {
        if !project.is_dir() {
            return Err(PackagingError::io(
                project,
                std::io::Error::new(std::io::ErrorKind::NotFound, "project directory not found"),
            ));
        }

        let sources = self.strategy.stage(project, staging)?;

        report(DeployStatus::InstallingDependencies);
        install_dependencies(&self.installer, staging)?;

        let dependencies = collect_runtime_files(staging, &self.filter)?;
        log::info!(
            "packaged {} source files and {} dependency files",
            sources.len(),
            dependencies.len()
        );

        let mut seen = BTreeSet::new();
        let files = sources
            .into_iter()
            .chain(dependencies)
            .filter(|f| seen.insert(f.clone()))
            .collect();

        Ok(PackagedProject {
            directory: staging.to_path_buf(),
            files,
        })
    }
}
