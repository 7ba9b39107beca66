//! External command execution (dependency installer, `npm pack`)

use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::config::InstallerConfig;
use crate::domain::ports::{PackagingError, PackagingResult};

/// Lines of stderr kept in error messages
const STDERR_TAIL_LINES: usize = 20;

/// Run `program args...` in `dir`, failing on a non-zero exit
pub fn run_command(program: &str, args: &[String], dir: &Path) -> PackagingResult<Output> {
    log::info!("running {} {} in {}", program, args.join(" "), dir.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| PackagingError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        log::debug!("[{}] {}", program, line);
    }

    if !output.status.success() {
        return Err(PackagingError::Install {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: stderr_tail(&output.stderr),
        });
    }

    Ok(output)
}

/// Install production dependencies into `staging`
pub fn install_dependencies(installer: &InstallerConfig, staging: &Path) -> PackagingResult<()> {
    run_command(&installer.program, &installer.args, staging).map(|_| ())
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n").trim().to_string()
}
