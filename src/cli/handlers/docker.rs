// src/cli/handlers/docker.rs

//! Handlers for the `d` verb: the plain container runtime.

use super::commons::{
    Session, UsageError, approve, command_label, distinct_targets, exec_parts, single_target,
};
use crate::{
    cli::registry::Subcommand,
    models::{Outcome, ParsedInvocation},
};
use anyhow::Result;

/// `d ps [-a]`, `d images`
pub fn list(session: &Session<'_>, sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let mut args = vec![sub.name];
    if parsed.has("all") {
        args.push("-a");
    }
    session.list(&session.runtime.docker(args))?;
    Ok(Outcome::Completed)
}

/// `d logs <container>`: follows one container from the recent tail.
pub fn logs(session: &Session<'_>, sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let container = single_target(&parsed, sub)?;
    let tail = session.config.log_tail.to_string();
    session.stream(&session.runtime.docker(["logs", "-f", "--tail", tail.as_str(), container]))?;
    Ok(Outcome::Completed)
}

/// `d exec <container> [cmd...]`
pub fn exec(session: &Session<'_>, sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let (container, command) = exec_parts(session, &parsed, sub)?;
    let invocation = session
        .runtime
        .docker(["exec", "-it", container])
        .args(command)
        .interactive();
    session.stream(&invocation)?;
    Ok(Outcome::Completed)
}

/// `d inspect <containers...>`
pub fn inspect(
    session: &Session<'_>,
    sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    if parsed.targets.is_empty() {
        return Err(UsageError::MissingTarget { command: command_label(&parsed, sub) }.into());
    }
    let containers = distinct_targets(&parsed);
    session.stream(&session.runtime.docker(["inspect"]).args(containers))?;
    Ok(Outcome::Completed)
}

/// `d stats [containers...]`. Without names the runtime streams every running container.
pub fn stats(
    session: &Session<'_>,
    _sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let containers = distinct_targets(&parsed);
    session.stream(&session.runtime.docker(["stats"]).args(containers))?;
    Ok(Outcome::Completed)
}

/// `d start|stop|restart|rm [containers...]`: gated, empty means every candidate.
pub fn lifecycle(
    session: &Session<'_>,
    sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let set = session.targets(sub.targets, &parsed, None)?;
    if set.resolved.is_empty() {
        println!("{}", session.style.notice(&format!("No containers to {}.", sub.name)));
        return Ok(Outcome::Completed);
    }

    let description = match (sub.name, parsed.has("force")) {
        ("rm", true) => "Force-remove containers (running ones are killed)".to_string(),
        ("rm", false) => "Remove containers".to_string(),
        (name, _) => format!("{} containers", capitalize(name)),
    };
    if !approve(session, sub, description, &set.resolved)? {
        return Ok(Outcome::Cancelled);
    }

    let mut args = vec![sub.name.to_string()];
    if parsed.has("force") {
        args.push("-f".to_string());
    }
    args.extend(set.resolved);
    session.stream(&session.runtime.docker(args))?;
    Ok(Outcome::Completed)
}

/// `d prune [-a] [--volumes]`
pub fn prune(session: &Session<'_>, sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let mut description =
        String::from("Remove stopped containers, unused networks and dangling images");
    let mut args = vec!["system", "prune", "-f"];
    if parsed.has("all") {
        description.push_str(", plus every unused image");
        args.push("-a");
    }
    if parsed.has("volumes") {
        description.push_str(", plus unused volumes");
        args.push("--volumes");
    }
    if !approve(session, sub, description, &[])? {
        return Ok(Outcome::Cancelled);
    }
    session.stream(&session.runtime.docker(args))?;
    Ok(Outcome::Completed)
}

pub(super) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
