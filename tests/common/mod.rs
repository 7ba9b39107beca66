#![allow(dead_code)]

//! Common test utilities for ftp-deploy scenario and CLI tests.
//!
//! This module provides:
//! - `TestProject`: an npm project in a temp directory with a fake installer
//! - `RecordingHooks`: hooks that remember every callback
//! - Fixtures: reusable file contents

pub mod fixtures;
pub mod hooks;
pub mod project;

pub use fixtures::*;
pub use hooks::*;
pub use project::*;
