//! Domain Services
//!
//! Pure business logic with no I/O dependencies.

mod leaf_directories;

pub use leaf_directories::leaf_directories;
