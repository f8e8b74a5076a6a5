// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

// --- INVOCATION MODELS ---

/// A single flag accepted by a subcommand.
///
/// `key` is the canonical name stored in [`ParsedInvocation::flags`]; the short
/// letter and the long name are the two spellings a user may type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDef {
    /// Canonical name.
    pub key: &'static str,
    /// `-x` spelling, usable in clusters.
    pub short: Option<char>,
    /// `--name` spelling.
    pub long: Option<&'static str>,
    /// Shown in help output.
    pub help: &'static str,
}

/// Describes how the argument classifier must treat the tokens of a subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Boolean flags the subcommand understands.
    pub flags: &'static [FlagDef],
    /// Whether `-f <file>` / `--file <file>` selects a compose manifest.
    pub accepts_file: bool,
    /// Whether everything after the first positional is passed through verbatim.
    pub passthrough: bool,
}

impl FlagSpec {
    /// Accepts no flags at all.
    pub const NONE: Self = Self {
        flags: &[],
        accepts_file: false,
        passthrough: false,
    };

    /// The flag spelled `-letter`.
    pub fn by_short(&self, letter: char) -> Option<&'static FlagDef> {
        self.flags.iter().find(|f| f.short == Some(letter))
    }

    /// The flag spelled `--name`.
    pub fn by_long(&self, name: &str) -> Option<&'static FlagDef> {
        self.flags.iter().find(|f| f.long == Some(name))
    }
}

/// The result of classifying the raw arguments of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInvocation {
    /// The verb as invoked.
    pub verb: String,
    /// The words after the verb (and subcommand), untouched.
    pub raw_args: Vec<String>,
    /// Canonical keys of the enabled flags.
    pub flags: BTreeSet<&'static str>,
    /// Value of `-f` / `--file`, unexpanded.
    pub override_file: Option<String>,
    /// Positional tokens in encounter order. Empty means "all".
    pub targets: Vec<String>,
}

impl ParsedInvocation {
    /// Whether the flag with canonical name `key` was given.
    pub fn has(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
}

/// Which universe a subcommand's targets are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// The subcommand takes no targets.
    None,
    /// Every container known to the runtime, running or not.
    Containers,
    /// Only running containers.
    RunningContainers,
    /// Services declared in the active compose manifest.
    Services,
}

/// Requested, resolved and discoverable targets of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    /// As typed.
    pub requested: Vec<String>,
    /// What the operation acts on. Each name appears once.
    pub resolved: Vec<String>,
    /// What discovery reported. Empty when it was not consulted.
    pub universe: Vec<String>,
}

/// An operation that changes runtime state and may need the user's consent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutatingOperation {
    /// What will happen, shown above the target list.
    pub description: String,
    /// Fully expanded. Empty for project-wide operations.
    pub affected_targets: Vec<String>,
    /// `false` skips the prompt altogether.
    pub requires_confirmation: bool,
    /// Set by the gate.
    pub confirmed: bool,
}

impl MutatingOperation {
    /// A gated operation that has not been confirmed yet.
    pub fn new(description: impl Into<String>, affected_targets: Vec<String>) -> Self {
        Self {
            description: description.into(),
            affected_targets,
            requires_confirmation: true,
            confirmed: false,
        }
    }
}

/// How a handler finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything ran (possibly nothing, for an empty universe).
    Completed,
    /// The user declined the confirmation gate. Nothing was executed.
    Cancelled,
}

// --- CONFIGURATION MODELS (config.toml) ---

/// `config.toml`. Every key is optional.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Program used for the plain container runtime (`d`, `dq`).
    pub docker_bin: String,
    /// Command prefix for the compose tool, e.g. `docker compose`.
    pub compose_command: String,
    /// Optional colorizer that listing output is piped through (e.g. `grc`).
    pub formatter: Option<String>,
    /// Enables colored diagnostics. `NO_COLOR` still wins.
    pub color: bool,
    /// Lines of history shown before following logs.
    pub log_tail: u32,
    /// Command run by the exec family when none is given.
    pub exec_shell: String,
    /// The `[properties]` table used by `dcpr`.
    pub properties: PropertiesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docker_bin: "docker".to_string(),
            compose_command: "docker compose".to_string(),
            formatter: None,
            color: true,
            log_tail: 100,
            exec_shell: "sh".to_string(),
            properties: PropertiesConfig::default(),
        }
    }
}

/// Settings of the properties report.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PropertiesConfig {
    /// Candidate files probed inside a container; the first existing one wins.
    pub paths: Vec<PathBuf>,
    /// Keys shown by default and used as summary columns.
    pub keys: Vec<String>,
    /// The variable-length summary column that gets truncated.
    pub capped_key: String,
    /// Width at which the capped column is cut.
    pub summary_max_width: usize,
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("/app/build.properties"),
                PathBuf::from("/build.properties"),
                PathBuf::from("/etc/build.properties"),
            ],
            keys: vec![
                "version".to_string(),
                "build.time".to_string(),
                "git.commit".to_string(),
                "git.branch".to_string(),
            ],
            capped_key: "git.branch".to_string(),
            summary_max_width: 40,
        }
    }
}
