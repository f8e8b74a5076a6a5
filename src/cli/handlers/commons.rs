// src/cli/handlers/commons.rs

//! Shared plumbing for the handlers: the session context, manifest and target
//! lookups, and the gate checkpoint.

use crate::{
    cli::registry::Subcommand,
    core::{
        compose_file::{self, ComposeManifest},
        gate::{Gate, Prompter},
        style::Style,
        targets,
    },
    models::{Config, MutatingOperation, ParsedInvocation, TargetKind, TargetSet},
    system::{
        executor::{Invocation, ProcessRunner},
        runtime::Runtime,
    },
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Wrong number of targets for a subcommand.
#[derive(Error, Debug)]
pub enum UsageError {
    /// At least one target is required.
    #[error("'{command}' needs a target. Try: {command} <name>")]
    MissingTarget {
        /// `verb sub` as typed.
        command: String,
    },
    /// Exactly one target is allowed.
    #[error("'{command}' takes a single target, got {count}.")]
    TooManyTargets {
        /// `verb sub` as typed.
        command: String,
        /// How many were given.
        count: usize,
    },
}

/// Everything a handler needs, assembled once per process.
#[derive(Debug)]
pub struct Session<'a> {
    /// Working directory; manifests and the `.env` default are looked up here.
    pub cwd: PathBuf,
    /// Loaded user configuration.
    pub config: Config,
    /// Shared presentation settings.
    pub style: Style,
    /// Builds `docker` / `docker compose` invocations.
    pub runtime: Runtime,
    /// Runs every external command.
    pub runner: &'a dyn ProcessRunner,
    /// Answers the confirmation gate.
    pub prompter: &'a dyn Prompter,
    /// Value of the manifest environment override, read at startup.
    pub env_compose_file: Option<String>,
}

impl<'a> Session<'a> {
    /// The confirmation gate, bound to this session's prompter and style.
    pub fn gate(&self) -> Gate<'_> {
        Gate::new(self.prompter, &self.style)
    }

    /// Resolves the manifest for this invocation, honoring `-f`.
    pub fn manifest(&self, parsed: &ParsedInvocation) -> Result<ComposeManifest> {
        let manifest = compose_file::resolve(
            &self.cwd,
            parsed.override_file.as_deref(),
            self.env_compose_file.as_deref(),
        )?;
        Ok(manifest)
    }

    /// Every discoverable target of `kind`.
    pub fn universe(&self, kind: TargetKind, manifest: Option<&Path>) -> Result<Vec<String>> {
        Ok(self.runtime.universe(self.runner, kind, manifest)?)
    }

    /// Expands the requested targets. The universe is only queried when nothing
    /// was requested; explicit names go to the runtime as typed.
    pub fn targets(
        &self,
        kind: TargetKind,
        parsed: &ParsedInvocation,
        manifest: Option<&Path>,
    ) -> Result<TargetSet> {
        let universe = if parsed.targets.is_empty() {
            self.universe(kind, manifest)?
        } else {
            Vec::new()
        };
        Ok(targets::resolve(&parsed.targets, &universe))
    }

    /// Runs a listing command, through the configured formatter when there is one.
    pub fn list(&self, invocation: &Invocation) -> Result<()> {
        match self.style.formatter() {
            Some(formatter) => self.runner.stream_through(invocation, formatter)?,
            None => self.runner.stream(invocation)?,
        }
        Ok(())
    }

    /// Runs a command attached to the terminal.
    pub fn stream(&self, invocation: &Invocation) -> Result<()> {
        self.runner.stream(invocation)?;
        Ok(())
    }
}

/// The checkpoint before a subcommand changes state. Non-mutating subcommands
/// pass straight through.
pub fn approve(
    session: &Session<'_>,
    sub: &Subcommand,
    description: impl Into<String>,
    affected: &[String],
) -> Result<bool> {
    let mut operation = MutatingOperation::new(description, affected.to_vec());
    operation.requires_confirmation = sub.mutating;
    session.gate().confirm(&mut operation)
}

/// The explicitly requested targets, each once, in first-occurrence order.
/// Empty when nothing was requested; the universe is not consulted.
pub fn distinct_targets(parsed: &ParsedInvocation) -> Vec<String> {
    targets::resolve(&parsed.targets, &[]).resolved
}

/// `verb sub` as the user typed it, for diagnostics.
pub fn command_label(parsed: &ParsedInvocation, sub: &Subcommand) -> String {
    if parsed.verb == sub.name {
        parsed.verb.clone()
    } else {
        format!("{} {}", parsed.verb, sub.name)
    }
}

/// Exactly one target, or a usage error.
pub fn single_target<'p>(parsed: &'p ParsedInvocation, sub: &Subcommand) -> Result<&'p str> {
    match parsed.targets.as_slice() {
        [] => Err(UsageError::MissingTarget { command: command_label(parsed, sub) }.into()),
        [one] => Ok(one.as_str()),
        many => Err(UsageError::TooManyTargets {
            command: command_label(parsed, sub),
            count: many.len(),
        }
        .into()),
    }
}

/// Splits a passthrough invocation into its target and the trailing command,
/// defaulting the command to the configured shell.
pub fn exec_parts<'p>(
    session: &Session<'_>,
    parsed: &'p ParsedInvocation,
    sub: &Subcommand,
) -> Result<(&'p str, Vec<String>)> {
    let (target, rest) = parsed
        .targets
        .split_first()
        .ok_or_else(|| UsageError::MissingTarget { command: command_label(parsed, sub) })?;
    let command = if rest.is_empty() {
        vec![session.config.exec_shell.clone()]
    } else {
        rest.to_vec()
    };
    Ok((target.as_str(), command))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::test_utils::{RecordingRunner, ScriptedPrompter};
    use tempfile::TempDir;

    /// A project directory with a conventional manifest in it.
    pub(crate) fn project() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();
        dir
    }

    pub(crate) fn session<'a>(
        cwd: &Path,
        runner: &'a RecordingRunner,
        prompter: &'a ScriptedPrompter,
    ) -> Session<'a> {
        let config = Config::default();
        Session {
            cwd: cwd.to_path_buf(),
            runtime: Runtime::from_config(&config, cwd).unwrap(),
            config,
            style: Style::plain(),
            runner,
            prompter,
            env_compose_file: None,
        }
    }

    /// `docker compose -f <cwd>/docker-compose.yml`, the prefix every compose call carries.
    pub(crate) fn compose_prefix(cwd: &Path) -> String {
        format!("docker compose -f {}", cwd.join("docker-compose.yml").display())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::test_utils::{RecordingRunner, ScriptedPrompter};

    fn parsed(verb: &str, targets: &[&str]) -> ParsedInvocation {
        ParsedInvocation {
            verb: verb.to_string(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_explicit_targets_skip_discovery() {
        let dir = project();
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new("yes");
        let session = session(dir.path(), &runner, &prompter);

        let set = session
            .targets(TargetKind::Containers, &parsed("d", &["web"]), None)
            .unwrap();
        assert_eq!(set.resolved, vec!["web"]);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_empty_request_expands_to_universe() {
        let dir = project();
        let runner = RecordingRunner::new().respond("docker ps --format {{.Names}}", "a\nb\n");
        let prompter = ScriptedPrompter::new("yes");
        let session = session(dir.path(), &runner, &prompter);

        let set = session
            .targets(TargetKind::RunningContainers, &parsed("d", &[]), None)
            .unwrap();
        assert_eq!(set.resolved, vec!["a", "b"]);
        assert_eq!(set.universe, set.resolved);
    }

    #[test]
    fn test_distinct_targets_keep_first_occurrence() {
        assert_eq!(distinct_targets(&parsed("d", &["b", "a", "b", "a"])), vec!["b", "a"]);
        assert!(distinct_targets(&parsed("d", &[])).is_empty());
    }

    #[test]
    fn test_manifest_override_must_exist() {
        let dir = project();
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new("yes");
        let session = session(dir.path(), &runner, &prompter);

        let mut invocation = parsed("dc", &[]);
        invocation.override_file = Some("missing.yml".to_string());
        assert!(session.manifest(&invocation).is_err());

        invocation.override_file = None;
        let manifest = session.manifest(&invocation).unwrap();
        assert_eq!(manifest.path, dir.path().join("docker-compose.yml"));
    }
}
