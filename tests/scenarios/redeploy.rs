//! Scenario: deploying again fully replaces the remote target

use ftp_deploy::{CancelToken, DeployUseCase, MemoryTransport, NpmPackager};

use super::first_deploy::{deployment, sample_project};
use crate::common::*;

#[test]
fn second_deploy_replaces_previous_content() {
    let project = sample_project();
    let server = MemoryTransport::new()
        .with_directory("/www")
        .with_file("/www/other-site/index.html", b"keep me");

    let packager = NpmPackager::from_config(&TestProject::packaging(INSTALL_SCRIPT));
    let mut first = DeployUseCase::new(packager, server);
    first
        .execute(
            project.path(),
            &deployment("/www/app"),
            &mut RecordingHooks::default(),
            &CancelToken::new(),
        )
        .unwrap();
    let server = first.into_transport();

    // Rename a module and drop the dependency between deploys
    std::fs::remove_file(project.path().join("lib/routes.js")).unwrap();
    project.write("lib/routes-v2.js", ROUTES_JS);

    let packager = NpmPackager::from_config(&TestProject::packaging("true"));
    let mut second = DeployUseCase::new(packager, server);
    second
        .execute(
            project.path(),
            &deployment("/www/app"),
            &mut RecordingHooks::default(),
            &CancelToken::new(),
        )
        .unwrap();

    let server = second.transport();
    assert_eq!(
        server.files_under("/www/app"),
        vec!["README.md", "lib/routes-v2.js", "package.json", "server.js"]
    );
    assert_eq!(
        server.file("/www/other-site/index.html"),
        Some(&b"keep me"[..])
    );
    assert_eq!(server.close_count(), 2);
}

#[test]
fn deploying_identical_content_twice_is_stable() {
    let project = sample_project();
    let mut server = MemoryTransport::new().with_directory("/www");
    let mut listings = Vec::new();

    for _ in 0..2 {
        let packager = NpmPackager::from_config(&TestProject::packaging(INSTALL_SCRIPT));
        let mut use_case = DeployUseCase::new(packager, server);
        use_case
            .execute(
                project.path(),
                &deployment("/www/app"),
                &mut RecordingHooks::default(),
                &CancelToken::new(),
            )
            .unwrap();
        server = use_case.into_transport();
        listings.push(server.files_under("/www/app"));
    }

    assert_eq!(listings[0], listings[1]);
}
