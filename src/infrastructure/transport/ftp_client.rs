//! FTP Transport
//!
//! Implements the Transport port on top of `ftp::FtpStream`.
//! `MKD` and `RMD` are single-level in the protocol; the recursive variants
//! are built here from `CWD`/`LIST`/`DELE`.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use ftp::types::FileType;
use ftp::FtpStream;

use super::listing::parse_listing;
use crate::domain::ports::{
    ConnectionSettings, RemoteEntry, Transport, TransportError, TransportResult,
};

/// FTP session
#[derive(Default)]
pub struct FtpTransport {
    stream: Option<FtpStream>,
    /// Credentials kept between `connect` and `await_ready`
    pending_login: Option<(String, String)>,
    /// Cached result of the last `PWD`
    cwd: String,
}

impl FtpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn stream(&mut self) -> TransportResult<&mut FtpStream> {
        self.stream.as_mut().ok_or(TransportError::NotConnected)
    }

    fn refresh_cwd(&mut self) -> TransportResult<()> {
        let pwd = self
            .stream()?
            .pwd()
            .map_err(|e| TransportError::protocol("PWD", e))?;
        self.cwd = pwd;
        Ok(())
    }

    /// `CWD` without refreshing the cached directory
    fn cwd_raw(&mut self, path: &str) -> TransportResult<()> {
        log::debug!("CWD {}", path);
        self.stream()?
            .cwd(path)
            .map_err(|e| TransportError::protocol("CWD", e))
    }

    fn list_raw(&mut self, path: Option<&str>) -> TransportResult<Vec<RemoteEntry>> {
        log::debug!("LIST {}", path.unwrap_or("."));
        let lines = self
            .stream()?
            .list(path)
            .map_err(|e| TransportError::protocol("LIST", e))?;
        parse_listing(&lines)
    }

    fn mkdir_raw(&mut self, path: &str) -> TransportResult<()> {
        log::debug!("MKD {}", path);
        self.stream()?
            .mkdir(path)
            .map_err(|e| TransportError::protocol("MKD", e))
    }

    /// Create each missing segment of `path`, then return to the starting directory
    fn mkdir_recursive(&mut self, path: &str) -> TransportResult<()> {
        let origin = self.cwd.clone();
        if path.starts_with('/') {
            self.cwd_raw("/")?;
        }

        let result = path
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .try_for_each(|segment| {
                if self.cwd_raw(segment).is_ok() {
                    return Ok(());
                }
                self.mkdir_raw(segment)?;
                self.cwd_raw(segment)
            });

        let restored = self.cwd_raw(&origin);
        result.and(restored)
    }

    fn rmdir_recursive(&mut self, path: &str) -> TransportResult<()> {
        for entry in self.list_raw(Some(path))? {
            let child = format!("{}/{}", path.trim_end_matches('/'), entry.name);
            if entry.is_directory() {
                self.rmdir_recursive(&child)?;
            } else {
                log::debug!("DELE {}", child);
                self.stream()?
                    .rm(&child)
                    .map_err(|e| TransportError::protocol("DELE", e))?;
            }
        }

        log::debug!("RMD {}", path);
        self.stream()?
            .rmdir(path)
            .map_err(|e| TransportError::protocol("RMD", e))
    }
}

impl Transport for FtpTransport {
    fn connect(&mut self, settings: &ConnectionSettings) -> TransportResult<()> {
        log::debug!("connecting to {}:{}", settings.host, settings.port);
        let stream = FtpStream::connect((settings.host.as_str(), settings.port))
            .map_err(|e| TransportError::protocol("connect", e))?;

        if let Some(timeout) = settings.timeout {
            let socket = stream.get_ref();
            socket.set_read_timeout(Some(timeout))?;
            socket.set_write_timeout(Some(timeout))?;
        }

        self.stream = Some(stream);
        self.pending_login = Some((settings.user.clone(), settings.password.clone()));
        Ok(())
    }

    fn await_ready(&mut self) -> TransportResult<()> {
        let (user, password) = self
            .pending_login
            .take()
            .ok_or(TransportError::NotConnected)?;

        log::debug!("USER {}", user);
        let stream = self.stream()?;
        stream
            .login(&user, &password)
            .map_err(|e| TransportError::protocol("login", e))?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| TransportError::protocol("TYPE", e))?;

        self.refresh_cwd()
    }

    fn current_directory(&self) -> &str {
        &self.cwd
    }

    fn change_directory(&mut self, path: &str) -> TransportResult<()> {
        self.cwd_raw(path)?;
        self.refresh_cwd()
    }

    fn list(&mut self) -> TransportResult<Vec<RemoteEntry>> {
        self.list_raw(None)
    }

    fn make_directory(&mut self, path: &str, recursive: bool) -> TransportResult<()> {
        if recursive {
            self.mkdir_recursive(path)
        } else {
            self.mkdir_raw(path)
        }
    }

    fn remove_directory(&mut self, path: &str, recursive: bool) -> TransportResult<()> {
        if recursive {
            self.rmdir_recursive(path)
        } else {
            log::debug!("RMD {}", path);
            self.stream()?
                .rmdir(path)
                .map_err(|e| TransportError::protocol("RMD", e))
        }
    }

    fn upload_file(&mut self, local: &Path, remote: &str) -> TransportResult<u64> {
        let file = File::open(local)?;
        let size = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        log::debug!("STOR {} ({} bytes)", remote, size);
        self.stream()?
            .put(remote, &mut reader)
            .map_err(|e| TransportError::protocol("STOR", e))?;
        Ok(size)
    }

    fn retrieve_file(&mut self, remote: &str) -> TransportResult<Cursor<Vec<u8>>> {
        log::debug!("RETR {}", remote);
        self.stream()?
            .simple_retr(remote)
            .map_err(|e| TransportError::protocol("RETR", e))
    }

    fn close(&mut self) -> TransportResult<()> {
        self.pending_login = None;
        match self.stream.take() {
            Some(mut stream) => {
                log::debug!("QUIT");
                stream
                    .quit()
                    .map_err(|e| TransportError::protocol("QUIT", e))
            }
            None => Ok(()),
        }
    }
}
