// src/cli/completion.rs

use crate::{
    cli::{
        handlers::commons::Session,
        registry::{Registry, Subcommand, VerbShape},
    },
    core::{arg_parser, compose_file},
    models::{FlagSpec, ParsedInvocation, TargetKind},
};
use std::fmt::Debug;

/// Where completion candidates for targets come from.
pub trait Discovery: Debug {
    /// Names of the given kind. Failures are swallowed: completion never errors.
    fn discover(&self, kind: TargetKind, override_file: Option<&str>) -> Vec<String>;
}

impl Discovery for Session<'_> {
    fn discover(&self, kind: TargetKind, override_file: Option<&str>) -> Vec<String> {
        let manifest = if kind == TargetKind::Services {
            let env_file = self.env_compose_file.as_deref();
            match compose_file::resolve(&self.cwd, override_file, env_file) {
                Ok(manifest) => Some(manifest.path),
                Err(e) => {
                    log::debug!("Completion without manifest: {}", e);
                    return Vec::new();
                }
            }
        } else {
            None
        };
        self.universe(kind, manifest.as_deref()).unwrap_or_else(|e| {
            log::debug!("Completion discovery failed: {}", e);
            Vec::new()
        })
    }
}

/// Computes candidates for the word under the cursor.
#[derive(Debug)]
pub struct Completer<'a> {
    registry: &'a Registry,
    discovery: &'a dyn Discovery,
}

impl<'a> Completer<'a> {
    /// Targets are looked up through `discovery` only when a position needs them.
    pub fn new(registry: &'a Registry, discovery: &'a dyn Discovery) -> Self {
        Self { registry, discovery }
    }

    /// `words` are the words after the verb; the last one is the partial word
    /// being completed (possibly empty).
    pub fn complete(&self, verb: &str, words: &[String]) -> Vec<String> {
        let Some(verb_def) = self.registry.find_verb(verb) else {
            return Vec::new();
        };
        let (partial, before) = match words.split_last() {
            Some((last, before)) => (last.as_str(), before),
            None => ("", words),
        };

        let (sub, typed) = match verb_def.shape {
            VerbShape::Direct(sub) => (sub, before),
            VerbShape::Grouped(_) => match before.split_first() {
                None => return with_prefix(verb_def.vocabulary(), partial),
                Some((name, rest)) => match verb_def.find_subcommand(name) {
                    Some(sub) => (sub, rest),
                    None => return Vec::new(),
                },
            },
        };

        if sub.flags.accepts_file {
            if let Some(previous) = typed.last() {
                if previous == "-f" || previous == "--file" {
                    return Vec::new();
                }
            }
        }

        let parsed = arg_parser::classify(verb, &sub.flags, typed).unwrap_or_else(|e| {
            log::debug!("Completing past an invalid argument: {}", e);
            ParsedInvocation::default()
        });

        // Only the target of the exec family; the rest is the user's own command.
        if sub.flags.passthrough && !parsed.targets.is_empty() {
            return Vec::new();
        }

        if partial.starts_with('-') {
            return unused_flags(&sub.flags, &parsed, partial);
        }

        self.targets(sub, &parsed, partial)
    }

    fn targets(&self, sub: &Subcommand, parsed: &ParsedInvocation, partial: &str) -> Vec<String> {
        if sub.targets == TargetKind::None {
            return Vec::new();
        }
        let universe = self
            .discovery
            .discover(sub.targets, parsed.override_file.as_deref());
        universe
            .into_iter()
            .filter(|name| name.starts_with(partial) && !parsed.targets.contains(name))
            .collect()
    }
}

fn with_prefix(words: Vec<&'static str>, partial: &str) -> Vec<String> {
    words
        .into_iter()
        .filter(|w| w.starts_with(partial))
        .map(str::to_string)
        .collect()
}

/// Both spellings of every flag not given yet, in either spelling.
fn unused_flags(spec: &FlagSpec, parsed: &ParsedInvocation, partial: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    for flag in spec.flags.iter().filter(|f| !parsed.has(f.key)) {
        if let Some(letter) = flag.short {
            candidates.push(format!("-{}", letter));
        }
        if let Some(long) = flag.long {
            candidates.push(format!("--{}", long));
        }
    }
    if spec.accepts_file && parsed.override_file.is_none() {
        candidates.extend(["-f".to_string(), "--file".to_string()]);
    }
    candidates.retain(|c| c.starts_with(partial));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Default)]
    struct FakeDiscovery {
        requests: RefCell<Vec<(TargetKind, Option<String>)>>,
    }

    impl Discovery for FakeDiscovery {
        fn discover(&self, kind: TargetKind, override_file: Option<&str>) -> Vec<String> {
            self.requests
                .borrow_mut()
                .push((kind, override_file.map(str::to_string)));
            match kind {
                TargetKind::Services => vec!["web".into(), "worker".into(), "db".into()],
                _ => vec!["proj_web_1".into(), "proj_db_1".into()],
            }
        }
    }

    fn complete(verb: &str, words: &[&str]) -> (Vec<String>, FakeDiscovery) {
        let registry = Registry::new();
        let discovery = FakeDiscovery::default();
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        let out = Completer::new(&registry, &discovery).complete(verb, &words);
        (out, discovery)
    }

    #[test]
    fn test_first_word_completes_subcommands() {
        let (out, discovery) = complete("dc", &["re"]);
        assert_eq!(out, vec!["restart"]);
        assert!(discovery.requests.borrow().is_empty());

        let (out, _) = complete("d", &[""]);
        assert!(out.contains(&"ps".to_string()) && out.contains(&"ls".to_string()));
    }

    #[test]
    fn test_direct_verbs_start_at_targets() {
        let (out, discovery) = complete("dcup", &["w"]);
        assert_eq!(out, vec!["web", "worker"]);
        assert_eq!(discovery.requests.borrow()[0], (TargetKind::Services, None));
    }

    #[test]
    fn test_used_flags_are_excluded_in_any_spelling() {
        let (out, _) = complete("dcup", &["--pull", "-"]);
        assert!(!out.contains(&"-p".to_string()));
        assert!(!out.contains(&"--pull".to_string()));
        assert!(out.contains(&"-l".to_string()));
        assert!(out.contains(&"--force".to_string()));

        let (out, _) = complete("dcup", &["-pl", "--"]);
        assert_eq!(out, vec!["--build", "--force", "--file"]);
    }

    #[test]
    fn test_typed_targets_are_not_offered_again() {
        let (out, _) = complete("dc", &["stop", "web", ""]);
        assert_eq!(out, vec!["worker", "db"]);
    }

    #[test]
    fn test_nothing_after_file_flag() {
        let (out, discovery) = complete("dc", &["up", "-f", ""]);
        assert!(out.is_empty());
        assert!(discovery.requests.borrow().is_empty());
    }

    #[test]
    fn test_override_reaches_discovery() {
        let (_, discovery) = complete("dc", &["logs", "-f", "other.yml", ""]);
        assert_eq!(
            discovery.requests.borrow()[0],
            (TargetKind::Services, Some("other.yml".to_string()))
        );
    }

    #[test]
    fn test_exec_completes_only_the_first_positional() {
        let (out, _) = complete("d", &["exec", "proj_w"]);
        assert_eq!(out, vec!["proj_web_1"]);

        let (out, discovery) = complete("d", &["exec", "proj_web_1", ""]);
        assert!(out.is_empty());
        assert!(discovery.requests.borrow().is_empty());
    }

    #[test]
    fn test_unknown_verb_or_subcommand_yields_nothing() {
        assert!(complete("nope", &[""]).0.is_empty());
        assert!(complete("d", &["frobnicate", ""]).0.is_empty());
        assert!(complete("d", &["ps", ""]).0.is_empty());
    }
}
