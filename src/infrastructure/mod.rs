//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `packaging/` - npm project staging (manifest copy, archive extraction, installer)
//! - `transport/` - Transport implementations (FTP, in-memory)

pub mod packaging;
pub mod transport;

// Re-export for convenience
pub use packaging::NpmPackager;
pub use transport::{FtpTransport, MemoryTransport};
