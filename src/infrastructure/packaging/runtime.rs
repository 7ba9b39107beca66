//! Runtime dependency selection
//!
//! After installation only part of `node_modules/` matters on the server:
//! regular files, outside test fixtures, with a runtime extension.

use std::path::Path;

use ignore::WalkBuilder;

use crate::config::PackagingConfig;
use crate::domain::ports::{PackagingError, PackagingResult};
use crate::domain::value_objects::RelativePath;

/// Directory the installer populates
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Which installed files are worth shipping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeFilter {
    extensions: Vec<String>,
    excluded_segments: Vec<String>,
}

impl RuntimeFilter {
    pub fn new(
        extensions: impl IntoIterator<Item = impl Into<String>>,
        excluded_segments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.into().trim_start_matches('.').to_lowercase())
                .collect(),
            excluded_segments: excluded_segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &PackagingConfig) -> Self {
        Self::new(
            config.runtime_extensions.iter().cloned(),
            config.excluded_segments.iter().cloned(),
        )
    }

    /// True if the file should be uploaded
    pub fn accepts(&self, path: &RelativePath) -> bool {
        let in_excluded_dir = path
            .parent()
            .map(|dir| {
                dir.segments()
                    .any(|s| self.excluded_segments.iter().any(|x| x == s))
            })
            .unwrap_or(false);
        if in_excluded_dir {
            return false;
        }

        match path.file_name().rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            }
            _ => false,
        }
    }
}

/// Enumerate `node_modules/` below `staging`, creating it if the installer did not
pub fn collect_runtime_files(
    staging: &Path,
    filter: &RuntimeFilter,
) -> PackagingResult<Vec<RelativePath>> {
    let dependency_dir = staging.join(DEPENDENCY_DIR);
    std::fs::create_dir_all(&dependency_dir)
        .map_err(|e| PackagingError::io(&dependency_dir, e))?;

    let walker = WalkBuilder::new(&dependency_dir)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| PackagingError::Walk {
            path: dependency_dir.clone(),
            message: e.to_string(),
        })?;

        // lstat semantics: symlinks are neither followed nor shipped
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let relative = match entry.path().strip_prefix(staging) {
            Ok(rel) => RelativePath::from_path(rel),
            Err(_) => continue,
        };

        if filter.accepts(&relative) {
            files.push(relative);
        }
    }

    files.sort();
    Ok(files)
}
