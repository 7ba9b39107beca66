//! Scenario: first deployment of an npm project to an empty target

use ftp_deploy::config::Config;
use ftp_deploy::{
    CancelToken, DeploymentConfig, DeployStatus, DeployUseCase, MemoryTransport, NpmPackager,
    RelativePath,
};

use crate::common::*;

pub fn deployment(path: &str) -> DeploymentConfig {
    let mut config = Config::default();
    config.ftp.host = Some("ftp.example.com".to_string());
    config.ftp.user = Some("deploy".to_string());
    config.ftp.path = Some(path.to_string());
    config.resolve("secret").unwrap()
}

pub fn sample_project() -> TestProject {
    let project = TestProject::new(MANIFEST_WITH_FILES);
    project.write("server.js", SERVER_JS);
    project.write("lib/routes.js", ROUTES_JS);
    project.write("README.md", "# demo\n");
    project.write("notes.txt", "not published\n");
    project.write("test/app.test.js", "");
    project
}

#[test]
fn deploys_sources_and_runtime_dependencies() {
    let project = sample_project();
    let packager = NpmPackager::from_config(&TestProject::packaging(INSTALL_SCRIPT));
    let server = MemoryTransport::new().with_directory("/www");
    let mut use_case = DeployUseCase::new(packager, server);
    let mut hooks = RecordingHooks::default();

    let report = use_case
        .execute(
            project.path(),
            &deployment("/www/app"),
            &mut hooks,
            &CancelToken::new(),
        )
        .unwrap();

    let server = use_case.transport();
    assert_eq!(
        server.files_under("/www/app"),
        vec![
            "README.md",
            "lib/routes.js",
            "node_modules/express/index.js",
            "node_modules/express/lib/router/index.js",
            "node_modules/express/package.json",
            "package.json",
            "server.js",
        ]
    );
    assert_eq!(server.file("/www/app/server.js"), Some(SERVER_JS.as_bytes()));
    assert_eq!(
        hooks.leaves_seen,
        vec![
            RelativePath::new("lib"),
            RelativePath::new("node_modules/express/lib/router"),
        ]
    );
    assert_eq!(report.directories_created, hooks.leaves_seen);
    assert_eq!(report.file_count(), 7);
    assert!(server.close_count() == 1 && !server.is_connected());
}

#[test]
fn staging_directory_is_removed_after_success() {
    let project = sample_project();
    let packager = NpmPackager::from_config(&TestProject::packaging(INSTALL_SCRIPT));
    let mut use_case = DeployUseCase::new(packager, MemoryTransport::new().with_directory("/www"));
    let mut hooks = RecordingHooks::default();

    use_case
        .execute(
            project.path(),
            &deployment("/www/app"),
            &mut hooks,
            &CancelToken::new(),
        )
        .unwrap();

    let staging = hooks.staging_directory().unwrap();
    assert!(!staging.exists());
    assert!(hooks.statuses.contains(&DeployStatus::InstallingDependencies));
    assert_eq!(hooks.statuses.last(), Some(&DeployStatus::Completed));
}

#[test]
fn project_without_dependencies_deploys_sources_only() {
    let project = TestProject::new(MANIFEST_WITHOUT_FILES);
    project.write("index.js", "");
    project.write(".gitignore", "coverage/\n");
    project.write("coverage/lcov.info", "");

    let packager = NpmPackager::from_config(&TestProject::packaging("true"));
    let mut use_case = DeployUseCase::new(packager, MemoryTransport::new());
    let mut hooks = RecordingHooks::default();

    let report = use_case
        .execute(
            project.path(),
            &deployment("site"),
            &mut hooks,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(
        use_case.transport().files_under("/site"),
        vec![".gitignore", "index.js", "package.json"]
    );
    assert!(report.directories_created.is_empty());
}
