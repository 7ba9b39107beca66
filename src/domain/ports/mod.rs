//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod deploy_hooks;
pub mod packager;
pub mod transport;

pub use deploy_hooks::{DeployHooks, DeployStatus, NoopHooks};
pub use packager::{PackagedProject, Packager, PackagingError, PackagingResult};
pub use transport::{
    ConnectionSettings, EntryKind, ProtocolError, RemoteEntry, Transport, TransportError,
    TransportResult,
};
