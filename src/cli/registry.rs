// src/cli/registry.rs

use crate::{
    cli::handlers::{self, commons::Session},
    core::style::Style,
    models::{FlagDef, FlagSpec, Outcome, ParsedInvocation, TargetKind},
};
use anyhow::Result;
use std::fmt;

/// Universal handler signature shared by every subcommand.
pub type HandlerFn = fn(&Session<'_>, &Subcommand, ParsedInvocation) -> Result<Outcome>;

/// One entry of a verb's subcommand table.
pub struct Subcommand {
    /// Canonical name, also used as the runtime subcommand where they coincide.
    pub name: &'static str,
    /// Alternative spellings accepted by the dispatcher and offered by completion.
    pub aliases: &'static [&'static str],
    /// One-line description for help output.
    pub about: &'static str,
    /// How the classifier treats the remaining words.
    pub flags: FlagSpec,
    /// Where target candidates come from.
    pub targets: TargetKind,
    /// Mutating subcommands always pass through the confirmation gate.
    pub mutating: bool,
    /// Runs the subcommand.
    pub handler: HandlerFn,
}

impl Subcommand {
    /// `true` for the name or any alias.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

impl fmt::Debug for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subcommand")
            .field("name", &self.name)
            .field("targets", &self.targets)
            .field("mutating", &self.mutating)
            .finish_non_exhaustive()
    }
}

/// Whether a verb takes a subcommand word.
#[derive(Debug)]
pub enum VerbShape {
    /// `d ps`, `dc up`: the first argument selects a subcommand.
    Grouped(&'static [&'static Subcommand]),
    /// `dcup`, `dq`: the verb is bound to a single subcommand.
    Direct(&'static Subcommand),
}

/// A top-level command such as `d` or `dcup`.
#[derive(Debug)]
pub struct Verb {
    /// The name typed in the shell.
    pub name: &'static str,
    /// One-line description for help output.
    pub about: &'static str,
    /// How its first word is read.
    pub shape: VerbShape,
}

impl Verb {
    /// Looks up a subcommand by name or alias. Direct verbs have none.
    pub fn find_subcommand(&self, name: &str) -> Option<&'static Subcommand> {
        match self.shape {
            VerbShape::Grouped(subs) => subs.iter().copied().find(|s| s.matches(name)),
            VerbShape::Direct(_) => None,
        }
    }

    /// Subcommand names and aliases, in table order.
    pub fn vocabulary(&self) -> Vec<&'static str> {
        match self.shape {
            VerbShape::Grouped(subs) => subs
                .iter()
                .flat_map(|s| std::iter::once(s.name).chain(s.aliases.iter().copied()))
                .collect(),
            VerbShape::Direct(_) => Vec::new(),
        }
    }
}

/// The set of verbs known to the dispatcher. Built once at startup and handed to
/// both the dispatcher and the completion provider.
#[derive(Debug)]
pub struct Registry {
    verbs: &'static [Verb],
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// The built-in verb table.
    pub fn new() -> Self {
        Self { verbs: VERBS }
    }

    /// Looks up a verb by its exact name.
    pub fn find_verb(&self, name: &str) -> Option<&'static Verb> {
        self.verbs.iter().find(|v| v.name == name)
    }

    /// Every verb, in help order.
    pub fn verbs(&self) -> &'static [Verb] {
        self.verbs
    }

    /// Names of every verb, for the shell integration script.
    pub fn verb_names(&self) -> Vec<&'static str> {
        self.verbs.iter().map(|v| v.name).collect()
    }

    /// Overview of every verb and subcommand.
    pub fn render_help(&self, style: &Style) -> String {
        let mut out = format!(
            "{}\n\n",
            style.header("dockhand: short verbs for Docker and Docker Compose")
        );
        for verb in self.verbs {
            let name = style.target(&format!("{:<5}", verb.name));
            out.push_str(&format!("{}  {}\n", name, verb.about));
            let subs: Vec<&Subcommand> = match verb.shape {
                VerbShape::Grouped(subs) => subs.to_vec(),
                VerbShape::Direct(sub) => vec![sub],
            };
            for sub in subs {
                let label = match verb.shape {
                    VerbShape::Grouped(_) => format!("{} {}", verb.name, sub.name),
                    VerbShape::Direct(_) => verb.name.to_string(),
                };
                let flags = render_flags(sub.flags.flags);
                let gated = if sub.mutating { " [confirm]" } else { "" };
                out.push_str(&format!(
                    "    {:<14} {}{}{}\n",
                    label,
                    sub.about,
                    style.dim(&flags),
                    style.dim(gated)
                ));
            }
        }
        out.push_str("\nOther commands:\n");
        out.push_str("    complete <verb> [words...]   print completion candidates\n");
        out.push_str("    init <bash|zsh>              print aliases and completion setup\n");
        out
    }
}

fn render_flags(flags: &[FlagDef]) -> String {
    if flags.is_empty() {
        return String::new();
    }
    let spelled: Vec<String> = flags
        .iter()
        .map(|f| match (f.short, f.long) {
            (Some(s), Some(l)) => format!("-{}/--{}", s, l),
            (Some(s), None) => format!("-{}", s),
            (None, Some(l)) => format!("--{}", l),
            (None, None) => f.key.to_string(),
        })
        .collect();
    format!(" ({})", spelled.join(", "))
}

// --- Flag tables ---

const ALL: FlagDef = FlagDef {
    key: "all",
    short: Some('a'),
    long: Some("all"),
    help: "include stopped containers",
};

const PS_FLAGS: &[FlagDef] = &[ALL];
const RM_FLAGS: &[FlagDef] = &[FlagDef {
    key: "force",
    short: Some('f'),
    long: Some("force"),
    help: "remove running containers",
}];
const PRUNE_FLAGS: &[FlagDef] = &[
    FlagDef { key: "all", short: Some('a'), long: Some("all"), help: "remove all unused images" },
    FlagDef { key: "volumes", short: None, long: Some("volumes"), help: "prune volumes too" },
];
const UP_FLAGS: &[FlagDef] = &[
    FlagDef { key: "pull", short: Some('p'), long: Some("pull"), help: "always pull images" },
    FlagDef {
        key: "build",
        short: Some('b'),
        long: Some("build"),
        help: "build images before starting",
    },
    FlagDef { key: "logs", short: Some('l'), long: Some("logs"), help: "follow logs afterwards" },
    FlagDef { key: "force", short: None, long: Some("force"), help: "force-recreate containers" },
];
const DOWN_FLAGS: &[FlagDef] = &[FlagDef {
    key: "volumes",
    short: Some('v'),
    long: Some("volumes"),
    help: "remove named volumes",
}];
const BUILD_FLAGS: &[FlagDef] = &[
    FlagDef { key: "pull", short: Some('p'), long: Some("pull"), help: "pull newer base images" },
    FlagDef {
        key: "no-cache",
        short: None,
        long: Some("no-cache"),
        help: "do not use the build cache",
    },
];
const DEFAULT_FLAGS: &[FlagDef] = &[FlagDef {
    key: "remove",
    short: Some('r'),
    long: Some("remove"),
    help: "forget the default",
}];
const LOG_TAIL_FLAGS: &[FlagDef] = &[
    FlagDef {
        key: "regex",
        short: Some('r'),
        long: Some("regex"),
        help: "patterns are regular expressions",
    },
    FlagDef { key: "wait", short: Some('w'), long: Some("wait"), help: "only show new lines" },
];
const PROPS_FLAGS: &[FlagDef] = &[
    FlagDef { key: "all", short: Some('a'), long: Some("all"), help: "print every property" },
    FlagDef { key: "summary", short: Some('s'), long: Some("summary"), help: "tabular summary" },
];

const fn plain(flags: &'static [FlagDef]) -> FlagSpec {
    FlagSpec { flags, accepts_file: false, passthrough: false }
}

const fn compose(flags: &'static [FlagDef]) -> FlagSpec {
    FlagSpec { flags, accepts_file: true, passthrough: false }
}

const PASSTHROUGH: FlagSpec = FlagSpec { flags: &[], accepts_file: false, passthrough: true };
const COMPOSE_PASSTHROUGH: FlagSpec = FlagSpec {
    flags: &[],
    accepts_file: true,
    passthrough: true,
};

// --- `d`: container runtime ---

static D_PS: Subcommand = Subcommand {
    name: "ps",
    aliases: &["ls"],
    about: "list containers",
    flags: plain(PS_FLAGS),
    targets: TargetKind::None,
    mutating: false,
    handler: handlers::docker::list,
};

static D_IMAGES: Subcommand = Subcommand {
    name: "images",
    aliases: &[],
    about: "list images",
    flags: FlagSpec::NONE,
    targets: TargetKind::None,
    mutating: false,
    handler: handlers::docker::list,
};

static D_LOGS: Subcommand = Subcommand {
    name: "logs",
    aliases: &[],
    about: "follow the logs of a container",
    flags: FlagSpec::NONE,
    targets: TargetKind::Containers,
    mutating: false,
    handler: handlers::docker::logs,
};

static D_EXEC: Subcommand = Subcommand {
    name: "exec",
    aliases: &["sh"],
    about: "run a command in a container",
    flags: PASSTHROUGH,
    targets: TargetKind::RunningContainers,
    mutating: false,
    handler: handlers::docker::exec,
};

static D_INSPECT: Subcommand = Subcommand {
    name: "inspect",
    aliases: &[],
    about: "show low-level details",
    flags: FlagSpec::NONE,
    targets: TargetKind::Containers,
    mutating: false,
    handler: handlers::docker::inspect,
};

static D_STATS: Subcommand = Subcommand {
    name: "stats",
    aliases: &[],
    about: "live resource usage",
    flags: FlagSpec::NONE,
    targets: TargetKind::RunningContainers,
    mutating: false,
    handler: handlers::docker::stats,
};

static D_START: Subcommand = Subcommand {
    name: "start",
    aliases: &[],
    about: "start containers",
    flags: FlagSpec::NONE,
    targets: TargetKind::Containers,
    mutating: true,
    handler: handlers::docker::lifecycle,
};

static D_STOP: Subcommand = Subcommand {
    name: "stop",
    aliases: &[],
    about: "stop containers",
    flags: FlagSpec::NONE,
    targets: TargetKind::RunningContainers,
    mutating: true,
    handler: handlers::docker::lifecycle,
};

static D_RESTART: Subcommand = Subcommand {
    name: "restart",
    aliases: &[],
    about: "restart containers",
    flags: FlagSpec::NONE,
    targets: TargetKind::RunningContainers,
    mutating: true,
    handler: handlers::docker::lifecycle,
};

static D_RM: Subcommand = Subcommand {
    name: "rm",
    aliases: &[],
    about: "remove containers",
    flags: plain(RM_FLAGS),
    targets: TargetKind::Containers,
    mutating: true,
    handler: handlers::docker::lifecycle,
};

static D_PRUNE: Subcommand = Subcommand {
    name: "prune",
    aliases: &[],
    about: "remove unused data",
    flags: plain(PRUNE_FLAGS),
    targets: TargetKind::None,
    mutating: true,
    handler: handlers::docker::prune,
};

static D_SUBCOMMANDS: &[&Subcommand] = &[
    &D_PS, &D_IMAGES, &D_LOGS, &D_EXEC, &D_INSPECT, &D_STATS, &D_START, &D_STOP, &D_RESTART,
    &D_RM, &D_PRUNE,
];

// --- `dc`: compose tool ---

static DC_PS: Subcommand = Subcommand {
    name: "ps",
    aliases: &["ls"],
    about: "list project containers",
    flags: compose(PS_FLAGS),
    targets: TargetKind::None,
    mutating: false,
    handler: handlers::compose::list,
};

static DC_SERVICES: Subcommand = Subcommand {
    name: "services",
    aliases: &[],
    about: "list services of the manifest",
    flags: compose(&[]),
    targets: TargetKind::None,
    mutating: false,
    handler: handlers::compose::services,
};

static DC_CONFIG: Subcommand = Subcommand {
    name: "config",
    aliases: &[],
    about: "print the merged manifest",
    flags: compose(&[]),
    targets: TargetKind::None,
    mutating: false,
    handler: handlers::compose::config,
};

static DC_FILE: Subcommand = Subcommand {
    name: "file",
    aliases: &[],
    about: "show the active manifest",
    flags: compose(&[]),
    targets: TargetKind::None,
    mutating: false,
    handler: handlers::compose::file,
};

static DC_LOGS: Subcommand = Subcommand {
    name: "logs",
    aliases: &[],
    about: "follow service logs",
    flags: compose(&[]),
    targets: TargetKind::Services,
    mutating: false,
    handler: handlers::compose::logs,
};

static DC_UP: Subcommand = Subcommand {
    name: "up",
    aliases: &[],
    about: "create and start services",
    flags: compose(UP_FLAGS),
    targets: TargetKind::Services,
    mutating: true,
    handler: handlers::compose::up,
};

static DC_DOWN: Subcommand = Subcommand {
    name: "down",
    aliases: &[],
    about: "stop and remove the project",
    flags: compose(DOWN_FLAGS),
    targets: TargetKind::None,
    mutating: true,
    handler: handlers::compose::down,
};

static DC_START: Subcommand = Subcommand {
    name: "start",
    aliases: &[],
    about: "start services",
    flags: compose(&[]),
    targets: TargetKind::Services,
    mutating: true,
    handler: handlers::compose::lifecycle,
};

static DC_STOP: Subcommand = Subcommand {
    name: "stop",
    aliases: &[],
    about: "stop services",
    flags: compose(&[]),
    targets: TargetKind::Services,
    mutating: true,
    handler: handlers::compose::lifecycle,
};

static DC_RESTART: Subcommand = Subcommand {
    name: "restart",
    aliases: &[],
    about: "restart services",
    flags: compose(&[]),
    targets: TargetKind::Services,
    mutating: true,
    handler: handlers::compose::lifecycle,
};

static DC_BUILD: Subcommand = Subcommand {
    name: "build",
    aliases: &[],
    about: "build service images",
    flags: compose(BUILD_FLAGS),
    targets: TargetKind::Services,
    mutating: true,
    handler: handlers::compose::lifecycle,
};

static DC_PULL: Subcommand = Subcommand {
    name: "pull",
    aliases: &[],
    about: "pull service images",
    flags: compose(&[]),
    targets: TargetKind::Services,
    mutating: true,
    handler: handlers::compose::lifecycle,
};

static DC_EXEC: Subcommand = Subcommand {
    name: "exec",
    aliases: &["sh"],
    about: "run a command in a service",
    flags: COMPOSE_PASSTHROUGH,
    targets: TargetKind::Services,
    mutating: false,
    handler: handlers::compose::exec,
};

static DC_DEFAULT: Subcommand = Subcommand {
    name: "default",
    aliases: &[],
    about: "set or remove the default manifest",
    flags: plain(DEFAULT_FLAGS),
    targets: TargetKind::None,
    mutating: false,
    handler: handlers::compose::default_file,
};

static DC_SUBCOMMANDS: &[&Subcommand] = &[
    &DC_PS, &DC_SERVICES, &DC_CONFIG, &DC_FILE, &DC_LOGS, &DC_UP, &DC_DOWN, &DC_START,
    &DC_STOP, &DC_RESTART, &DC_BUILD, &DC_PULL, &DC_EXEC, &DC_DEFAULT,
];

// --- Shortcut verbs ---

static DQ: Subcommand = Subcommand {
    name: "dq",
    aliases: &[],
    about: "exec into the first running container matching a pattern",
    flags: PASSTHROUGH,
    targets: TargetKind::RunningContainers,
    mutating: false,
    handler: handlers::quick::container,
};

static DCQ: Subcommand = Subcommand {
    name: "dcq",
    aliases: &[],
    about: "exec into the first service matching a pattern",
    flags: COMPOSE_PASSTHROUGH,
    targets: TargetKind::Services,
    mutating: false,
    handler: handlers::quick::service,
};

static DCLT: Subcommand = Subcommand {
    name: "dclt",
    aliases: &[],
    about: "follow logs of services matching patterns",
    flags: compose(LOG_TAIL_FLAGS),
    targets: TargetKind::Services,
    mutating: false,
    handler: handlers::log_tail::handle,
};

static DCPR: Subcommand = Subcommand {
    name: "dcpr",
    aliases: &[],
    about: "report build properties of services",
    flags: compose(PROPS_FLAGS),
    targets: TargetKind::Services,
    mutating: false,
    handler: handlers::properties::handle,
};

static VERBS: &[Verb] = &[
    Verb {
        name: "d",
        about: "container runtime shortcuts",
        shape: VerbShape::Grouped(D_SUBCOMMANDS),
    },
    Verb { name: "dc", about: "compose shortcuts", shape: VerbShape::Grouped(DC_SUBCOMMANDS) },
    Verb { name: "dq", about: "quick exec into a container", shape: VerbShape::Direct(&DQ) },
    Verb { name: "dcq", about: "quick exec into a service", shape: VerbShape::Direct(&DCQ) },
    Verb { name: "dcup", about: "alias for 'dc up'", shape: VerbShape::Direct(&DC_UP) },
    Verb { name: "dclt", about: "log tail by pattern", shape: VerbShape::Direct(&DCLT) },
    Verb { name: "dcpr", about: "properties report", shape: VerbShape::Direct(&DCPR) },
];
