//! Deploy Report
//!
//! Summary of a finished deployment.

use serde::Serialize;

use crate::domain::value_objects::RelativePath;

/// Named stages of the deploy pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    /// Package the project while connecting to the server
    Stage,
    /// Compute the leaf directories to create
    Plan,
    /// Replace the remote target directory with an empty one
    ResetRemote,
    BeforeDirectoriesCreation,
    CreateDirectories,
    BeforeUpload,
    Upload,
    BeforeClosingConnection,
    /// Close the session and remove the staging directory
    Teardown,
}

impl std::fmt::Display for DeployStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeployStage::Stage => "stage",
            DeployStage::Plan => "plan",
            DeployStage::ResetRemote => "reset remote",
            DeployStage::BeforeDirectoriesCreation => "before directories creation",
            DeployStage::CreateDirectories => "create directories",
            DeployStage::BeforeUpload => "before upload",
            DeployStage::Upload => "upload",
            DeployStage::BeforeClosingConnection => "before closing connection",
            DeployStage::Teardown => "teardown",
        };
        f.write_str(name)
    }
}

/// Result of a successful deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    /// Leaf directories created below the remote target
    pub directories_created: Vec<RelativePath>,
    /// Files uploaded, in upload order
    pub files_uploaded: Vec<RelativePath>,
    /// Bytes sent over the data connection
    pub bytes_sent: u64,
    /// Message of the failed pre-close hook, if it failed
    pub pre_close_error: Option<String>,
}

impl DeployReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pre_close_hook_failed(&self) -> bool {
        self.pre_close_error.is_some()
    }

    pub fn file_count(&self) -> usize {
        self.files_uploaded.len()
    }
}
