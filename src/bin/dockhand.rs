// src/bin/dockhand.rs

use anyhow::Result;
use dockhand::{
    CancellationToken,
    cli::{self, Cli, handlers::commons::Session, registry::Registry},
    constants::{BINARY_NAME, COMPOSE_FILE_ENV},
    core::{config_loader, gate::TerminalPrompter, style::Style},
    models::Outcome,
    system::{
        executor::{self, ExecutionError, SystemRunner},
        runtime::Runtime,
    },
};
use clap::Parser;
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The entry point of every verb. Sets up logging and the interrupt handler,
/// routes the invocation, and performs centralized error handling.
fn main() {
    env_logger::init();
    let cancellation_token = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(cancellation_token.clone());

    let invoked_as = env::args_os()
        .next()
        .and_then(|argv0| {
            Path::new(&argv0)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| BINARY_NAME.to_string());
    let colors_allowed = colored::control::SHOULD_COLORIZE.should_colorize();

    match run_cli(&invoked_as, Cli::parse(), cancellation_token, colors_allowed) {
        Ok(_) => {}
        Err(e) => {
            let exec_err = e.downcast_ref::<ExecutionError>();
            // The user pressed Ctrl+C; the shell already shows it.
            if let Some(ExecutionError::Interrupted(_)) = exec_err {
                std::process::exit(130);
            }
            let style = Style::new(colors_allowed, None);
            eprintln!("{}", style.error(&format!("{:#}", e)));
            // A failed runtime call keeps the runtime's own status.
            match exec_err {
                Some(ExecutionError::RuntimeInvocation { code: Some(code), .. }) => {
                    std::process::exit(*code)
                }
                _ => std::process::exit(1),
            }
        }
    }
}

/// Assembles the session from configuration and the environment, then runs.
fn run_cli(
    invoked_as: &str,
    cli: Cli,
    cancellation_token: CancellationToken,
    colors_allowed: bool,
) -> Result<Outcome> {
    log::debug!("Invoked as '{}' with {:?}", invoked_as, cli.args);
    let registry = Registry::new();
    let route = cli::route(invoked_as, cli.args, &registry);

    let config = config_loader::load_config()?;
    if !config.color {
        colored::control::set_override(false);
    }
    let cwd = env::current_dir()?;
    let runner = SystemRunner::new(cancellation_token);
    let prompter = TerminalPrompter;

    let session = Session {
        style: cli::build_style(&config, colors_allowed),
        runtime: Runtime::from_config(&config, &cwd)?,
        env_compose_file: env::var(COMPOSE_FILE_ENV).ok().filter(|v| !v.is_empty()),
        cwd,
        config,
        runner: &runner,
        prompter: &prompter,
    };
    cli::run(&registry, &session, route)
}

/// Listens for Ctrl+C on a helper thread. While a child process runs, the
/// signal only flags the cancellation token so the executor can reap the child;
/// otherwise (e.g. at the confirmation prompt) the process exits right away.
fn install_interrupt_handler(cancellation_token: CancellationToken) {
    let spawned = std::thread::Builder::new()
        .name("interrupt".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    log::warn!("Could not start the signal listener: {}", e);
                    return;
                }
            };
            runtime.block_on(async {
                while tokio::signal::ctrl_c().await.is_ok() {
                    if !executor::child_active() {
                        std::process::exit(130);
                    }
                    log::debug!("Interrupt received, cancelling the running command.");
                    cancellation_token.store(true, Ordering::SeqCst);
                }
            });
        });
    if let Err(e) = spawned {
        log::warn!("Could not spawn the signal listener thread: {}", e);
    }
}
