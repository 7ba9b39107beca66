//! ftp-deploy CLI - deploy a Node.js project to an FTP server
//!
//! Usage: ftp-deploy [OPTIONS]
//!
//! Packages the project (own files plus production dependencies), replaces
//! the remote target directory and uploads everything.

mod cli;
mod ui;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;

use ftp_deploy::application::{CancelToken, DeployReport, DeployUseCase, Interrupt};
use ftp_deploy::config::{password_from_env, with_env_overrides, Config, DeploymentConfig};
use ftp_deploy::domain::ports::{DeployHooks, Packager, Transport};
use ftp_deploy::infrastructure::{FtpTransport, MemoryTransport, NpmPackager};
use ftp_deploy::DeployError;

use cli::Cli;
use ui::console::{render_summary, ConsoleHooks};
use ui::json::{write_typed_event, CompleteEvent, ErrorEvent, JsonHooks};
use ui::terminal::detect_capabilities;

/// Exit status after a forced abort (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, cli.json);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if cli.password.is_some() {
        bail!(
            "--password is not supported: set FTP_DEPLOY_PASSWORD or enter the password at the prompt"
        );
    }

    let project = cli
        .project
        .canonicalize()
        .with_context(|| format!("project directory {} not found", cli.project.display()))?;

    let config = load_config(cli, &project)?;
    let password = if cli.dry_run {
        String::new()
    } else {
        obtain_password(&config, cli.json)?
    };
    let deployment = config.resolve(password)?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || match handler_token.interrupt() {
        Interrupt::Cancel => {
            log::warn!("cancellation requested, finishing current operation");
            log::warn!("press Ctrl+C again to abort immediately");
        }
        Interrupt::ForceExit => {
            log::error!("aborted; remote target and staging directory may be left behind");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    })
    .context("failed to install Ctrl+C handler")?;

    let packager = NpmPackager::from_config(&config.packaging);
    let mut hooks: Box<dyn DeployHooks> = if cli.json {
        Box::new(JsonHooks::new(io::stdout()))
    } else {
        let verbose = cli.verbose > 0 || cli.dry_run;
        Box::new(
            ConsoleHooks::new(io::stdout(), detect_capabilities(), verbose)
                .with_destination(deployment.display_destination()),
        )
    };

    let report = if cli.dry_run {
        let server = MemoryTransport::new().with_directory(deployment.remote_target.parent());
        deploy(packager, server, &project, &deployment, hooks.as_mut(), &cancel)?
    } else {
        deploy(
            packager,
            FtpTransport::new(),
            &project,
            &deployment,
            hooks.as_mut(),
            &cancel,
        )?
    };

    let destination = deployment.display_destination();
    if cli.json {
        write_typed_event(
            &mut io::stdout(),
            &CompleteEvent::new(&report, &destination, cli.dry_run),
        )?;
    } else {
        print!("{}", render_summary(&report, &destination, cli.dry_run));
    }
    Ok(())
}

fn deploy<P: Packager, T: Transport>(
    packager: P,
    transport: T,
    project: &Path,
    deployment: &DeploymentConfig,
    hooks: &mut dyn DeployHooks,
    cancel: &CancelToken,
) -> Result<DeployReport> {
    let mut use_case = DeployUseCase::new(packager, transport);
    Ok(use_case.execute(project, deployment, hooks, cancel)?)
}

/// Project file (or `--config`), then environment, then flags
fn load_config(cli: &Cli, project: &Path) -> Result<Config> {
    let (mut config, warnings) = match &cli.config {
        Some(path) => {
            let (config, warnings) = Config::load_with_warnings(path)?;
            (with_env_overrides(config, |key| std::env::var(key).ok()), warnings)
        }
        None => Config::load_or_default(project)?,
    };

    for warning in &warnings {
        if cli.json {
            log::warn!("{}", warning);
        } else {
            eprintln!("warning: {}", warning);
        }
    }

    cli.apply_overrides(&mut config);
    Ok(config)
}

fn obtain_password(config: &Config, json: bool) -> Result<String> {
    if let Some(password) = password_from_env(|key| std::env::var(key).ok()) {
        return Ok(password);
    }

    if json || !io::stdin().is_terminal() {
        bail!("no password available: set FTP_DEPLOY_PASSWORD");
    }

    let user = config.ftp.user.as_deref().unwrap_or("ftp user");
    dialoguer::Password::new()
        .with_prompt(format!("Password for {}", user))
        .allow_empty_password(true)
        .interact()
        .context("failed to read password")
}

fn report_error(err: &anyhow::Error, json: bool) {
    let deploy_error = err.downcast_ref::<DeployError>();

    if json {
        let code = deploy_error.map(DeployError::code).unwrap_or("error");
        let _ = write_typed_event(&mut io::stdout(), &ErrorEvent::new(code, format!("{:#}", err)));
        return;
    }

    eprintln!("error: {:#}", err);
    if let Some(hint) = deploy_error.and_then(hint_for) {
        eprintln!("hint: {}", hint);
    }
}

fn hint_for(err: &DeployError) -> Option<String> {
    match err {
        DeployError::MissingSetting(key) => Some(format!(
            "set `{key}` under [ftp] in ftp-deploy.toml, FTP_DEPLOY_{} or --{key}",
            key.to_uppercase()
        )),
        DeployError::Connect { .. } => {
            Some("check host, port and credentials; --debug logs every command".to_string())
        }
        DeployError::Cancelled => Some("the remote target may be incomplete".to_string()),
        _ => None,
    }
}
