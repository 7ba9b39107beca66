//! NDJSON event output (`--json`)
//!
//! One JSON object per line on stdout, each tagged with `event`.

use std::io::{self, Write};

use serde::Serialize;

use ftp_deploy::application::DeployReport;
use ftp_deploy::domain::ports::{DeployHooks, DeployStatus};
use ftp_deploy::domain::value_objects::RelativePath;

/// Write a typed event as a single NDJSON line
pub fn write_typed_event<T: Serialize, W: Write>(out: &mut W, event: &T) -> io::Result<()> {
    let json =
        serde_json::to_string(event).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    out.write_all(json.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

#[derive(Debug, Serialize)]
struct StatusEvent<'a> {
    event: &'static str,
    #[serde(flatten)]
    status: &'a DeployStatus,
}

#[derive(Debug, Serialize)]
struct PathEvent<'a> {
    event: &'static str,
    path: &'a RelativePath,
}

/// Emitted once when the deployment succeeded
#[derive(Debug, Serialize)]
pub struct CompleteEvent<'a> {
    pub event: &'static str,
    pub success: bool,
    pub destination: &'a str,
    pub dry_run: bool,
    #[serde(flatten)]
    pub report: &'a DeployReport,
}

impl<'a> CompleteEvent<'a> {
    pub fn new(report: &'a DeployReport, destination: &'a str, dry_run: bool) -> Self {
        Self {
            event: "complete",
            success: true,
            destination,
            dry_run,
            report,
        }
    }
}

/// Emitted when the deployment failed
#[derive(Debug, Serialize)]
pub struct ErrorEvent<'a> {
    pub event: &'static str,
    pub code: &'a str,
    pub message: String,
}

impl<'a> ErrorEvent<'a> {
    pub fn new(code: &'a str, message: impl Into<String>) -> Self {
        Self {
            event: "error",
            code,
            message: message.into(),
        }
    }
}

/// Streams every hook callback as an event
pub struct JsonHooks<W: Write> {
    out: W,
}

impl<W: Write> JsonHooks<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize>(&mut self, event: &T) {
        if let Err(e) = write_typed_event(&mut self.out, event) {
            log::warn!("failed to write JSON event: {}", e);
        }
    }
}

impl<W: Write> DeployHooks for JsonHooks<W> {
    fn on_status_update(&mut self, status: &DeployStatus) {
        self.emit(&StatusEvent {
            event: "status",
            status,
        });
    }

    fn on_directory_created(&mut self, path: &RelativePath) {
        self.emit(&PathEvent {
            event: "directory_created",
            path,
        });
    }

    fn on_file_uploaded(&mut self, path: &RelativePath) {
        self.emit(&PathEvent {
            event: "file_uploaded",
            path,
        });
    }
}
