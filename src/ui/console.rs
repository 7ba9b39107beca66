//! Human-readable deploy output

use std::io::{self, Write};

use crossterm::style::Stylize;
use crossterm::{cursor, terminal, QueueableCommand};

use ftp_deploy::application::DeployReport;
use ftp_deploy::domain::ports::{DeployHooks, DeployStatus, Transport};
use ftp_deploy::domain::value_objects::RelativePath;

use super::progress::ProgressBar;
use super::terminal::TerminalCapabilities;

/// One terminal line redrawn in place
#[derive(Debug, Default)]
struct LiveLine {
    active: bool,
}

impl LiveLine {
    fn update(&mut self, out: &mut impl Write, content: &str) -> io::Result<()> {
        out.queue(cursor::MoveToColumn(0))?;
        out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        out.write_all(content.as_bytes())?;
        out.flush()?;
        self.active = true;
        Ok(())
    }

    fn finish(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.active {
            out.write_all(b"\n")?;
            self.active = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Mark {
    Step,
    Success,
    Failure,
    Detail,
}

/// Prints statuses as they happen, with a progress bar for directory
/// creation and for upload on a tty
pub struct ConsoleHooks<W: Write> {
    out: W,
    caps: TerminalCapabilities,
    verbose: bool,
    destination: Option<String>,
    progress: Option<ProgressBar>,
    live: LiveLine,
}

impl<W: Write> ConsoleHooks<W> {
    pub fn new(out: W, caps: TerminalCapabilities, verbose: bool) -> Self {
        Self {
            out,
            caps,
            verbose,
            destination: None,
            progress: None,
            live: LiveLine::default(),
        }
    }

    /// Announce `user@host:path` when the deployment starts
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Size a bar for the next phase; per-item lines replace it in verbose mode
    fn start_phase(&mut self, total: usize, label: &str) {
        self.progress = None;
        if self.caps.animate() && !self.verbose && total > 0 {
            let mut bar = ProgressBar::new(total as u64, label);
            bar.set_width(self.caps.width.saturating_sub(40).clamp(10, 40));
            self.progress = Some(bar);
        }
    }

    /// Advance the bar; returns false when there is none
    fn advance(&mut self) -> bool {
        let Some(bar) = self.progress.as_mut() else {
            return false;
        };
        bar.inc(1);
        let rendered = bar.render(self.caps.supports_unicode);
        let _ = self.live.update(&mut self.out, &rendered);
        true
    }

    fn mark(&self, mark: Mark) -> String {
        let unicode = self.caps.supports_unicode;
        let symbol = match (mark, unicode) {
            (Mark::Step, true) => "→",
            (Mark::Step, false) => "->",
            (Mark::Success, true) => "✓",
            (Mark::Success, false) => "[OK]",
            (Mark::Failure, true) => "✗",
            (Mark::Failure, false) => "[ERROR]",
            (Mark::Detail, _) => " ",
        };
        if !self.caps.supports_color {
            return symbol.to_string();
        }
        match mark {
            Mark::Step => symbol.cyan().to_string(),
            Mark::Success => symbol.green().to_string(),
            Mark::Failure => symbol.red().to_string(),
            Mark::Detail => symbol.to_string(),
        }
    }

    fn line(&mut self, mark: Mark, text: &str) {
        let mark = self.mark(mark);
        // Console output is best effort; a closed stdout must not fail the deploy
        let _ = self
            .live
            .finish(&mut self.out)
            .and_then(|()| writeln!(self.out, "{} {}", mark, text));
    }
}

impl<W: Write> DeployHooks for ConsoleHooks<W> {
    fn before_directories_creation(
        &mut self,
        _transport: &mut dyn Transport,
        directories: &[RelativePath],
    ) -> anyhow::Result<()> {
        self.line(
            Mark::Step,
            &format!("creating {} directories", directories.len()),
        );
        self.start_phase(directories.len(), "  directories");
        Ok(())
    }

    fn before_upload(
        &mut self,
        _transport: &mut dyn Transport,
        files: &[RelativePath],
    ) -> anyhow::Result<()> {
        self.start_phase(files.len(), "  files      ");
        Ok(())
    }

    fn on_status_update(&mut self, status: &DeployStatus) {
        match status {
            DeployStatus::Started { .. } => {
                if let Some(destination) = self.destination.clone() {
                    self.line(Mark::Step, &format!("deploying to {}", destination));
                }
                self.line(Mark::Step, &status.to_string());
            }
            DeployStatus::Error { .. } => self.line(Mark::Failure, &status.to_string()),
            DeployStatus::Completed => {
                self.progress = None;
                self.line(Mark::Success, &status.to_string());
            }
            other => self.line(Mark::Step, &other.to_string()),
        }
    }

    fn on_directory_created(&mut self, path: &RelativePath) {
        if !self.advance() && self.verbose {
            self.line(Mark::Detail, &format!("+ {}/", path));
        }
    }

    fn on_file_uploaded(&mut self, path: &RelativePath) {
        if !self.advance() && self.verbose {
            self.line(Mark::Detail, &format!("↑ {}", path));
        }
    }
}

/// Final summary block
pub fn render_summary(report: &DeployReport, destination: &str, dry_run: bool) -> String {
    let mut out = String::new();
    let title = if dry_run {
        "Dry run complete"
    } else {
        "Deploy complete"
    };
    out.push_str(&format!("\n{} ({})\n", title, destination));
    out.push_str(&format!(
        "  {} directories created\n",
        report.directories_created.len()
    ));
    out.push_str(&format!(
        "  {} files uploaded ({})\n",
        report.file_count(),
        format_bytes(report.bytes_sent)
    ));
    if let Some(message) = &report.pre_close_error {
        out.push_str(&format!("  warning: pre-close hook failed: {}\n", message));
    }
    out
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
