use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ftp_deploy::config::{Config, SourceStrategyKind};

/// ftp-deploy - deploy a Node.js project to an FTP server
#[derive(Parser, Debug)]
#[command(name = "ftp-deploy")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "The password is read from FTP_DEPLOY_PASSWORD or prompted for interactively."
)]
pub struct Cli {
    /// Project directory containing package.json
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file (default: <project>/ftp-deploy.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// FTP server host name
    #[arg(long)]
    pub host: Option<String>,

    /// FTP control port
    #[arg(long)]
    pub port: Option<u16>,

    /// FTP user name
    #[arg(long)]
    pub user: Option<String>,

    /// Remote directory replaced by the deployment (e.g. /www/app)
    #[arg(long)]
    pub path: Option<String>,

    /// How the package's own files are selected
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Socket timeout in seconds (0 disables it)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Package and deploy to an in-memory server, printing the plan
    #[arg(long)]
    pub dry_run: bool,

    /// Output NDJSON events
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log every remote operation
    #[arg(long)]
    pub debug: bool,

    /// Not supported: passwords on the command line leak into shell history
    #[arg(long, hide = true)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Files declared by package.json
    Manifest,
    /// Contents of the `npm pack` tarball
    Archive,
}

impl From<StrategyArg> for SourceStrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Manifest => SourceStrategyKind::Manifest,
            StrategyArg::Archive => SourceStrategyKind::Archive,
        }
    }
}

impl Cli {
    /// Apply flags on top of file and environment configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.ftp.host = Some(host.clone());
        }
        if let Some(port) = self.port {
            config.ftp.port = port;
        }
        if let Some(user) = &self.user {
            config.ftp.user = Some(user.clone());
        }
        if let Some(path) = &self.path {
            config.ftp.path = Some(path.clone());
        }
        if let Some(strategy) = self.strategy {
            config.packaging.strategy = strategy.into();
        }
        if let Some(timeout) = self.timeout {
            config.transport.timeout_secs = timeout;
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match (self.debug, self.verbose) {
            (_, v) if v >= 3 => log::LevelFilter::Trace,
            (true, _) | (_, 2) => log::LevelFilter::Debug,
            (_, 1) => log::LevelFilter::Info,
            _ => log::LevelFilter::Warn,
        }
    }
}
