//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeployError, DeployResult};

use super::types::{Config, SourceStrategyKind};

/// File name looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "ftp-deploy.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| DeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_with_warnings(&content, path)
}

/// Parse TOML content; `path` is only used for messages
pub fn parse_with_warnings(content: &str, path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load `ftp-deploy.toml` from the project directory, falling back to defaults,
/// then apply `FTP_DEPLOY_*` environment overrides
pub fn load_or_default(project_dir: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let (config, warnings) = if config_path.is_file() {
        load_with_warnings(&config_path)?
    } else {
        (Config::default(), Vec::new())
    };

    Ok((with_env_overrides(config, |key| std::env::var(key).ok()), warnings))
}

/// Apply environment variable overrides (FTP_DEPLOY_* prefix)
pub fn with_env_overrides(mut config: Config, get_env: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(host) = get_env("FTP_DEPLOY_HOST") {
        config.ftp.host = Some(host);
    }

    if let Some(port) = get_env("FTP_DEPLOY_PORT") {
        match port.trim().parse() {
            Ok(port) => config.ftp.port = port,
            Err(_) => log::warn!("ignoring FTP_DEPLOY_PORT={:?}: not a port number", port),
        }
    }

    if let Some(user) = get_env("FTP_DEPLOY_USER") {
        config.ftp.user = Some(user);
    }

    if let Some(path) = get_env("FTP_DEPLOY_PATH") {
        config.ftp.path = Some(path);
    }

    if let Some(timeout) = get_env("FTP_DEPLOY_TIMEOUT") {
        match timeout.trim().parse() {
            Ok(secs) => config.transport.timeout_secs = secs,
            Err(_) => log::warn!("ignoring FTP_DEPLOY_TIMEOUT={:?}: not a number", timeout),
        }
    }

    if let Some(strategy) = get_env("FTP_DEPLOY_STRATEGY") {
        match strategy.trim().to_lowercase().as_str() {
            "manifest" => config.packaging.strategy = SourceStrategyKind::Manifest,
            "archive" => config.packaging.strategy = SourceStrategyKind::Archive,
            other => log::warn!("ignoring FTP_DEPLOY_STRATEGY={:?}", other),
        }
    }

    config
}

/// Password from `FTP_DEPLOY_PASSWORD`, if set
pub fn password_from_env(get_env: impl Fn(&str) -> Option<String>) -> Option<String> {
    get_env("FTP_DEPLOY_PASSWORD").filter(|p| !p.is_empty())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "ftp",
        "host",
        "port",
        "user",
        "path",
        "transport",
        "timeout_secs",
        "packaging",
        "strategy",
        "runtime_extensions",
        "excluded_segments",
        "installer",
        "program",
        "args",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
