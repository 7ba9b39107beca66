use ftp_deploy::domain::ports::Transport;
use ftp_deploy::{DeployHooks, DeployStatus, RelativePath};

/// Hooks that record every callback for later assertions
#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub statuses: Vec<DeployStatus>,
    pub leaves_seen: Vec<RelativePath>,
    pub directories: Vec<RelativePath>,
    pub uploaded: Vec<RelativePath>,
    pub fail_before_close: Option<String>,
}

impl DeployHooks for RecordingHooks {
    fn before_directories_creation(
        &mut self,
        _transport: &mut dyn Transport,
        directories: &[RelativePath],
    ) -> anyhow::Result<()> {
        self.leaves_seen = directories.to_vec();
        Ok(())
    }

    fn before_closing_connection(&mut self, _transport: &mut dyn Transport) -> anyhow::Result<()> {
        match &self.fail_before_close {
            Some(message) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(()),
        }
    }

    fn on_directory_created(&mut self, path: &RelativePath) {
        self.directories.push(path.clone());
    }

    fn on_file_uploaded(&mut self, path: &RelativePath) {
        self.uploaded.push(path.clone());
    }

    fn on_status_update(&mut self, status: &DeployStatus) {
        self.statuses.push(status.clone());
    }
}

impl RecordingHooks {
    /// Staging directory announced by the pipeline
    pub fn staging_directory(&self) -> Option<std::path::PathBuf> {
        self.statuses.iter().find_map(|s| match s {
            DeployStatus::StagingCreated { directory } => Some(directory.clone()),
            _ => None,
        })
    }
}
