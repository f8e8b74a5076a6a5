// src/cli/mod.rs

use crate::{
    cli::{
        args::{CompleteArgs, InitArgs},
        completion::Completer,
        handlers::commons::Session,
        registry::Registry,
    },
    constants::BINARY_NAME,
    core::style::Style,
    models::{Config, Outcome},
    system::executor::{self, Invocation},
};
use anyhow::Result;
use clap::Parser;

pub mod args;
/// Candidates for the shell completion hook.
pub mod completion;
/// Verb and subcommand routing.
pub mod dispatcher;
pub mod handlers;
/// The static verb table.
pub mod registry;

/// dockhand: short verbs for Docker and Docker Compose.
///
/// Arguments are captured raw; verbs classify their own flags.
#[derive(Parser, Debug)]
#[command(
    name = BINARY_NAME,
    version,
    about,
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// The verb (or front-end command) followed by its words.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `dockhand`, `dockhand help`, `-h`.
    Help,
    /// `--version` / `-V`.
    Version,
    /// `dockhand complete <verb> [words...]`
    Complete(Vec<String>),
    /// `dockhand init <shell>`
    Init(Vec<String>),
    /// A verb and the words after it.
    Verb(String, Vec<String>),
}

/// Decides the route from the program name and its arguments.
///
/// Invoked through a link named like a verb (`dc`, `dcup`...), the program name
/// is the verb and every argument belongs to it. Otherwise the first argument
/// selects the verb or a front-end command.
pub fn route(invoked_as: &str, args: Vec<String>, registry: &Registry) -> Route {
    if registry.find_verb(invoked_as).is_some() {
        return Route::Verb(invoked_as.to_string(), args);
    }
    let mut words = args.into_iter();
    match words.next().as_deref() {
        None | Some("help") | Some("-h") | Some("--help") => Route::Help,
        Some("-V") | Some("--version") => Route::Version,
        Some("complete") => Route::Complete(words.collect()),
        Some("init") => Route::Init(words.collect()),
        Some(verb) => Route::Verb(verb.to_string(), words.collect()),
    }
}

/// Presentation settings from configuration. The formatter is only used when
/// its program can actually be found.
pub fn build_style(config: &Config, colors_allowed: bool) -> Style {
    let formatter = config.formatter.as_deref().and_then(|command| {
        match Invocation::parse(command) {
            Ok(invocation) if executor::is_executable_in_path(&invocation.program) => {
                Some(invocation)
            }
            Ok(invocation) => {
                log::debug!(
                    "Formatter '{}' not found in PATH, output stays plain.",
                    invocation.program
                );
                None
            }
            Err(e) => {
                log::warn!("Ignoring formatter '{}': {}", command, e);
                None
            }
        }
    });
    Style::new(config.color && colors_allowed, formatter)
}

/// Executes a route against an assembled session.
pub fn run(registry: &Registry, session: &Session<'_>, route: Route) -> Result<Outcome> {
    match route {
        Route::Help => print!("{}", registry.render_help(&session.style)),
        Route::Version => println!("{} {}", BINARY_NAME, env!("CARGO_PKG_VERSION")),
        Route::Complete(words) => {
            let args = CompleteArgs::try_parse_from(words)?;
            for candidate in Completer::new(registry, session).complete(&args.verb, &args.words) {
                println!("{}", candidate);
            }
        }
        Route::Init(words) => {
            let args = InitArgs::try_parse_from(words)?;
            print!("{}", handlers::init::render(args.shell, &registry.verb_names()));
        }
        Route::Verb(verb, words) => {
            let outcome = dispatcher::dispatch(registry, session, &verb, &words)?;
            if outcome == Outcome::Cancelled {
                println!("{}", session.style.notice("Operation cancelled. Nothing was changed."));
            }
            return Ok(outcome);
        }
    }
    Ok(Outcome::Completed)
}
