//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod relative_path;
mod remote_target;

pub use relative_path::{RelativePath, ROOT};
pub use remote_target::{RemoteTarget, RemoteTargetError};
