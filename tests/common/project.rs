//! Test project builder
//!
//! Creates an npm project in a temp directory and an `ftp-deploy.toml` whose
//! installer is a shell script, so tests never touch the npm registry.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ftp_deploy::config::{InstallerConfig, PackagingConfig};
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new(manifest: &str) -> Self {
        let project = Self {
            root: tempfile::tempdir().unwrap(),
        };
        project.write("package.json", manifest);
        project
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Packaging configuration using `sh -c <script>` as installer
    pub fn packaging(script: &str) -> PackagingConfig {
        PackagingConfig {
            installer: InstallerConfig {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), script.to_string()],
            },
            ..PackagingConfig::default()
        }
    }

    /// Write `ftp-deploy.toml` with connection settings and a fake installer
    pub fn write_config(&self, remote_path: &str, script: &str) {
        let escaped = script.replace('\\', "\\\\").replace('"', "\\\"");
        self.write(
            "ftp-deploy.toml",
            &format!(
                "[ftp]\nhost = \"ftp.example.com\"\nuser = \"deploy\"\npath = \"{}\"\n\n\
                 [packaging.installer]\nprogram = \"sh\"\nargs = [\"-c\", \"{}\"]\n",
                remote_path, escaped
            ),
        );
    }

    /// Run the binary with the project as working directory and a clean environment
    pub fn run_cli(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_ftp-deploy"))
            .current_dir(self.path())
            .env_remove("FTP_DEPLOY_HOST")
            .env_remove("FTP_DEPLOY_PORT")
            .env_remove("FTP_DEPLOY_USER")
            .env_remove("FTP_DEPLOY_PATH")
            .env_remove("FTP_DEPLOY_PASSWORD")
            .env_remove("FTP_DEPLOY_TIMEOUT")
            .env_remove("FTP_DEPLOY_STRATEGY")
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .unwrap()
    }
}
