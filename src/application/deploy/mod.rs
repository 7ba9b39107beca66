//! Deploy Module
//!
//! Orchestrates one deployment of a project directory to an FTP server.
//!
//! ## Structure
//!
//! - `cancel` - Cooperative cancellation (`CancelToken`)
//! - `result` - Report and stage types (`DeployReport`, `DeployStage`)
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use ftp_deploy::application::deploy::{CancelToken, DeployUseCase};
//!
//! let mut use_case = DeployUseCase::new(packager, transport);
//! let report = use_case.execute(&project, &config, &mut hooks, &CancelToken::new())?;
//! ```

mod cancel;
mod result;
mod use_case;

pub use cancel::{CancelToken, Interrupt};
pub use result::{DeployReport, DeployStage};
pub use use_case::DeployUseCase;
