//! Scenario: failures always clean up

use ftp_deploy::{CancelToken, DeployError, DeployStatus, DeployUseCase, MemoryTransport, NpmPackager};

use super::first_deploy::{deployment, sample_project};
use crate::common::*;

#[test]
fn installer_failure_aborts_before_touching_the_server() {
    let project = sample_project();
    let packager = NpmPackager::from_config(&TestProject::packaging(
        "echo 'npm ERR! 404 left-pad' >&2; exit 1",
    ));
    let server = MemoryTransport::new().with_file("/www/app/index.js", b"live");
    let mut use_case = DeployUseCase::new(packager, server);
    let mut hooks = RecordingHooks::default();

    let err = use_case
        .execute(
            project.path(),
            &deployment("/www/app"),
            &mut hooks,
            &CancelToken::new(),
        )
        .unwrap_err();

    assert!(matches!(err, DeployError::Packaging(_)));
    assert!(err.to_string().contains("404 left-pad"));
    let server = use_case.transport();
    assert_eq!(server.file("/www/app/index.js"), Some(&b"live"[..]));
    assert_eq!(server.close_count(), 1);
    assert!(!hooks.staging_directory().unwrap().exists());
}

#[test]
fn pre_close_failure_keeps_the_deployment() {
    let project = sample_project();
    let packager = NpmPackager::from_config(&TestProject::packaging("true"));
    let mut use_case = DeployUseCase::new(packager, MemoryTransport::new().with_directory("/www"));
    let mut hooks = RecordingHooks {
        fail_before_close: Some("smoke test failed".to_string()),
        ..Default::default()
    };

    let report = use_case
        .execute(
            project.path(),
            &deployment("/www/app"),
            &mut hooks,
            &CancelToken::new(),
        )
        .unwrap();

    assert!(report.pre_close_hook_failed());
    assert!(hooks.statuses.contains(&DeployStatus::Error {
        message: "smoke test failed".to_string()
    }));
    let server = use_case.transport();
    assert!(server.file("/www/app/server.js").is_some());
    assert_eq!(server.close_count(), 1);
    assert!(!hooks.staging_directory().unwrap().exists());
}

#[test]
fn remote_failure_mid_upload_still_closes_connection() {
    let project = sample_project();
    let packager = NpmPackager::from_config(&TestProject::packaging("true"));
    let server = MemoryTransport::new()
        .with_directory("/www")
        .fail_on("STOR", "server.js");
    let mut use_case = DeployUseCase::new(packager, server);
    let mut hooks = RecordingHooks::default();

    let err = use_case
        .execute(
            project.path(),
            &deployment("/www/app"),
            &mut hooks,
            &CancelToken::new(),
        )
        .unwrap_err();

    assert!(matches!(err, DeployError::Remote { operation: "upload", .. }));
    assert_eq!(use_case.transport().close_count(), 1);
    assert!(!hooks.staging_directory().unwrap().exists());
}
