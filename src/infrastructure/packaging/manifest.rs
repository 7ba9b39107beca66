//! Manifest source strategy
//!
//! Copies the files `package.json` declares as the package's public surface:
//! - `package.json`, README, LICENSE, CHANGELOG and the `main` entry always
//! - entries of `files` (file, directory or glob, anchored at the project root)
//! - without `files`, everything not ignored by `.npmignore`/`.gitignore`

use std::fs;
use std::path::Path;

use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use serde::Deserialize;

use super::runtime::DEPENDENCY_DIR;
use super::SourceStrategy;
use crate::config::CONFIG_FILE_NAME;
use crate::domain::ports::{PackagingError, PackagingResult};
use crate::domain::value_objects::RelativePath;

pub const MANIFEST_FILE: &str = "package.json";

/// Prefixes of top-level files npm always publishes (case-insensitive)
const ALWAYS_INCLUDED_PREFIXES: &[&str] = &["readme", "license", "licence", "changelog"];

/// The parts of `package.json` that decide what gets published
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

impl Manifest {
    pub fn load(project: &Path) -> PackagingResult<Self> {
        let path = project.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path).map_err(|e| PackagingError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| PackagingError::Manifest {
            path,
            message: e.to_string(),
        })
    }
}

/// Copy the files declared by `package.json`
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestFiles;

impl ManifestFiles {
    pub fn new() -> Self {
        Self
    }

    /// Files of `project` that would be published, sorted
    pub fn resolve(&self, project: &Path) -> PackagingResult<Vec<RelativePath>> {
        let manifest = Manifest::load(project)?;
        let declared = match &manifest.files {
            Some(entries) => Some(build_overrides(project, entries)?),
            None => None,
        };
        let main = manifest.main.as_deref().map(RelativePath::new);

        let mut builder = WalkBuilder::new(project);
        builder
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir && matches!(entry.file_name().to_str(), Some(DEPENDENCY_DIR) | Some(".git")))
            });
        if declared.is_none() {
            builder
                .git_ignore(true)
                .require_git(false)
                .add_custom_ignore_filename(".npmignore");
        }

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry.map_err(|e| PackagingError::Walk {
                path: project.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let relative = match entry.path().strip_prefix(project) {
                Ok(rel) => RelativePath::from_path(rel),
                Err(_) => continue,
            };

            let include = is_always_included(&relative)
                || main.as_ref() == Some(&relative)
                || match &declared {
                    Some(overrides) => overrides.matched(entry.path(), false).is_whitelist(),
                    None => relative.as_str() != CONFIG_FILE_NAME,
                };

            if include {
                files.push(relative);
            }
        }

        files.sort();
        Ok(files)
    }
}

impl SourceStrategy for ManifestFiles {
    fn stage(&self, project: &Path, staging: &Path) -> PackagingResult<Vec<RelativePath>> {
        let files = self.resolve(project)?;
        for file in &files {
            let from = project.join(file.as_str());
            let to = staging.join(file.as_str());
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent).map_err(|e| PackagingError::io(parent, e))?;
            }
            fs::copy(&from, &to).map_err(|e| PackagingError::io(&from, e))?;
        }
        log::info!("staged {} source files", files.len());
        Ok(files)
    }
}

fn is_always_included(path: &RelativePath) -> bool {
    if path.parent().is_some_and(|p| !p.is_root()) {
        return false;
    }
    let name = path.as_str().to_lowercase();
    name == MANIFEST_FILE || ALWAYS_INCLUDED_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Turn `files` entries into anchored whitelist globs (`!entry` excludes)
fn build_overrides(project: &Path, entries: &[String]) -> PackagingResult<Override> {
    let manifest_error = |message: String| PackagingError::Manifest {
        path: project.join(MANIFEST_FILE),
        message,
    };

    let mut builder = OverrideBuilder::new(project);
    for raw in entries {
        let (negated, entry) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw.as_str()),
        };
        let entry = entry
            .trim_start_matches("./")
            .trim_start_matches('/')
            .trim_end_matches('/');
        if entry.is_empty() {
            continue;
        }

        let bang = if negated { "!" } else { "" };
        for glob in [format!("{}/{}", bang, entry), format!("{}/{}/**", bang, entry)] {
            builder
                .add(&glob)
                .map_err(|e| manifest_error(format!("invalid files entry '{}': {}", raw, e)))?;
        }
    }

    builder
        .build()
        .map_err(|e| manifest_error(e.to_string()))
}
