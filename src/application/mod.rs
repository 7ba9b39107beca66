//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (services, ports, value objects)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - Package, connect, reset the remote target, create directories, upload

pub mod deploy;

pub use deploy::{CancelToken, DeployReport, DeployStage, DeployUseCase, Interrupt};
