//! Packed archive source strategy
//!
//! Lets the package manager decide the published file set: `npm pack`
//! writes a gzip tarball whose entries live under `package/`, which is
//! stripped while extracting into the staging directory.

use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use serde::Deserialize;
use tar::Archive;

use super::installer::run_command;
use super::SourceStrategy;
use crate::domain::ports::{PackagingError, PackagingResult};
use crate::domain::value_objects::RelativePath;

/// Top-level directory of every `npm pack` tarball
const ARCHIVE_ROOT: &str = "package";

/// One element of `npm pack --json` output
#[derive(Debug, Deserialize)]
struct PackResult {
    filename: String,
}

/// Extract the tarball produced by `<program> pack`
#[derive(Debug, Clone)]
pub struct PackedArchive {
    program: String,
}

impl PackedArchive {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run `pack` into `destination` and return the tarball path
    fn pack(&self, project: &Path, destination: &Path) -> PackagingResult<PathBuf> {
        let args = vec![
            "pack".to_string(),
            "--json".to_string(),
            "--pack-destination".to_string(),
            destination.to_string_lossy().into_owned(),
        ];
        let output = run_command(&self.program, &args, project)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Ok(results) = serde_json::from_str::<Vec<PackResult>>(&stdout) {
            if let Some(result) = results.first() {
                return Ok(destination.join(&result.filename));
            }
        }

        // Older package managers print only the file name
        find_tarball(destination)
    }
}

impl Default for PackedArchive {
    fn default() -> Self {
        Self::new("npm")
    }
}

impl SourceStrategy for PackedArchive {
    fn stage(&self, project: &Path, staging: &Path) -> PackagingResult<Vec<RelativePath>> {
        let pack_dir = tempfile::Builder::new()
            .prefix("ftp-deploy-pack-")
            .tempdir()
            .map_err(|e| PackagingError::io(std::env::temp_dir(), e))?;

        let tarball = self.pack(project, pack_dir.path())?;
        let files = extract_package(&tarball, staging)?;
        log::info!("extracted {} source files from {}", files.len(), tarball.display());
        Ok(files)
    }
}

fn find_tarball(directory: &Path) -> PackagingResult<PathBuf> {
    let entries = fs::read_dir(directory).map_err(|e| PackagingError::io(directory, e))?;
    for entry in entries {
        let path = entry.map_err(|e| PackagingError::io(directory, e))?.path();
        if path.extension().is_some_and(|ext| ext == "tgz") {
            return Ok(path);
        }
    }
    Err(PackagingError::Archive(format!(
        "no tarball produced in {}",
        directory.display()
    )))
}

/// Extract regular files of a `package/`-rooted gzip tarball into `staging`
pub fn extract_package(tarball: &Path, staging: &Path) -> PackagingResult<Vec<RelativePath>> {
    let file = File::open(tarball).map_err(|e| PackagingError::io(tarball, e))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    let archive_error = |e: std::io::Error| PackagingError::Archive(e.to_string());

    let mut files = Vec::new();
    for entry in archive.entries().map_err(archive_error)? {
        let mut entry = entry.map_err(archive_error)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path().map_err(archive_error)?.into_owned();
        let relative = match strip_archive_root(&path) {
            Some(rel) => rel,
            None => {
                return Err(PackagingError::Archive(format!(
                    "unexpected entry {} in {}",
                    path.display(),
                    tarball.display()
                )))
            }
        };

        let destination = staging.join(&relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| PackagingError::io(parent, e))?;
        }
        entry
            .unpack(&destination)
            .map_err(|e| PackagingError::io(&destination, e))?;
        files.push(RelativePath::from_path(&relative));
    }

    files.sort();
    Ok(files)
}

/// `package/lib/a.js` -> `lib/a.js`; rejects anything escaping the root
fn strip_archive_root(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == ARCHIVE_ROOT => {}
        _ => return None,
    }

    let mut relative = PathBuf::new();
    for component in components {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!relative.as_os_str().is_empty()).then_some(relative)
}
