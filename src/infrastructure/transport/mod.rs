//! Transport Implementations
//!
//! Concrete implementations of the Transport port.

mod ftp_client;
mod listing;
mod memory;
#[cfg(test)]
mod test_server;

pub use ftp_client::FtpTransport;
pub use listing::{parse_line, parse_listing};
pub use memory::MemoryTransport;
