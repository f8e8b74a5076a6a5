// src/cli/args.rs

//! Argument structs of the front-end commands. Verb arguments go through the
//! flag classifier instead.

use crate::cli::handlers::init::ShellKind;
use clap::Parser;

/// Arguments of `dockhand init`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct InitArgs {
    /// Shell to generate the aliases and completion hook for.
    #[arg(value_enum)]
    pub shell: ShellKind,
}

/// Arguments of `dockhand complete`, called by the shell hook on every Tab.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true)]
pub struct CompleteArgs {
    /// The verb being completed (`d`, `dc`, `dcup`...).
    pub verb: String,

    /// Words typed after the verb; the last one is the partial word.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}
