//! Domain Layer
//!
//! Pure deployment logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (RelativePath, RemoteTarget)
//! - `services/` - Domain services (leaf directory reduction)
//! - `ports/` - Interface definitions for infrastructure (Transport, Packager, DeployHooks)

pub mod ports;
pub mod services;
pub mod value_objects;
