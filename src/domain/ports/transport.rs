//! Transport Port
//!
//! One uniform interface over a remote file system session. Implementations:
//! - `FtpTransport` - FTP over the `ftp` crate
//! - `MemoryTransport` - in-memory tree for dry runs and tests
//!
//! # Working directory
//!
//! The session has a current remote directory, exactly like the FTP protocol.
//! Relative paths given to `list`, `make_directory`, `remove_directory`,
//! `upload_file` and `retrieve_file` resolve against it, so callers must
//! issue `change_directory` before the operations that depend on it.

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed protocol error from the underlying client
pub type ProtocolError = Box<dyn std::error::Error + Send + Sync>;

/// Transport operation errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// Operation attempted before `connect`/`await_ready` or after `close`
    #[error("not connected")]
    NotConnected,

    /// The remote server rejected or failed a command
    #[error("{operation} failed: {source}")]
    Protocol {
        operation: &'static str,
        #[source]
        source: ProtocolError,
    },

    /// Local I/O error (reading a staged file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote path does not exist
    #[error("no such file or directory: {0}")]
    NotFound(String),

    /// Remote path already exists
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A `LIST` line could not be understood
    #[error("unparseable directory listing line: {0:?}")]
    MalformedListing(String),

    /// Failure injected by a test double
    #[error("injected failure during {0}")]
    Injected(String),
}

impl TransportError {
    pub fn protocol(operation: &'static str, source: impl Into<ProtocolError>) -> Self {
        TransportError::Protocol {
            operation,
            source: source.into(),
        }
    }
}

/// Where and as whom to connect
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Socket read/write timeout; `None` waits forever
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Kind of a remote directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Pipe, socket or device node; only its name is of interest
    Other,
}

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: Option<u64>,
}

impl RemoteEntry {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size: Some(size),
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            size: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Remote file system session
///
/// Every operation completes with success or a `TransportError`; nothing is
/// retried. A session is used by one caller at a time.
pub trait Transport: Send {
    /// Open the connection to the server
    fn connect(&mut self, settings: &ConnectionSettings) -> TransportResult<()>;

    /// Block until the session accepts commands (authenticated, binary mode)
    fn await_ready(&mut self) -> TransportResult<()>;

    /// Current remote working directory
    fn current_directory(&self) -> &str;

    /// Change the remote working directory
    fn change_directory(&mut self, path: &str) -> TransportResult<()>;

    /// List the current remote working directory (without `.` and `..`)
    fn list(&mut self) -> TransportResult<Vec<RemoteEntry>>;

    /// Create a directory; `recursive` also creates missing parents
    fn make_directory(&mut self, path: &str, recursive: bool) -> TransportResult<()>;

    /// Remove a directory; `recursive` also removes its contents
    fn remove_directory(&mut self, path: &str, recursive: bool) -> TransportResult<()>;

    /// Store a local file at `remote`, returning the number of bytes sent
    fn upload_file(&mut self, local: &Path, remote: &str) -> TransportResult<u64>;

    /// Read a remote file back into memory
    fn retrieve_file(&mut self, remote: &str) -> TransportResult<Cursor<Vec<u8>>>;

    /// Close the session; closing an unconnected session is a no-op
    fn close(&mut self) -> TransportResult<()>;
}
