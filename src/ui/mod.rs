//! Terminal and JSON presentation for the `ftp-deploy` binary

pub mod console;
pub mod json;
pub mod progress;
pub mod terminal;
