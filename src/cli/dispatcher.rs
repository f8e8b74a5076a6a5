// src/cli/dispatcher.rs

use crate::{
    cli::{
        handlers::commons::Session,
        registry::{Registry, VerbShape},
    },
    core::arg_parser,
    models::Outcome,
};
use anyhow::Result;
use thiserror::Error;

/// Routing failures. All of them happen before any runtime call.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// Not a registered verb.
    #[error("Unknown command '{0}'. Run 'dockhand help' for the list of verbs.")]
    UnknownVerb(String),
    /// A grouped verb called without a subcommand.
    #[error("'{verb}' needs a subcommand: {available}")]
    MissingSubcommand {
        /// The verb as typed.
        verb: String,
        /// Comma-separated subcommand names.
        available: String,
    },
    /// A grouped verb called with a word that is neither a name nor an alias.
    #[error("Unknown subcommand '{verb} {name}'. Available: {available}")]
    UnknownSubcommand {
        /// The verb as typed.
        verb: String,
        /// The unrecognized word.
        name: String,
        /// Comma-separated subcommand names.
        available: String,
    },
}

/// Routes one verb invocation to its handler.
///
/// # Logic:
/// 1. Finds the verb, then the subcommand (grouped verbs consume one word for it).
/// 2. Classifies the remaining words with the subcommand's flag spec.
/// 3. Calls the handler. Usage errors stop here, before any runtime call.
pub fn dispatch(
    registry: &Registry,
    session: &Session<'_>,
    verb: &str,
    args: &[String],
) -> Result<Outcome> {
    let verb_def = registry
        .find_verb(verb)
        .ok_or_else(|| DispatchError::UnknownVerb(verb.to_string()))?;

    let (sub, rest) = match verb_def.shape {
        VerbShape::Direct(sub) => (sub, args),
        VerbShape::Grouped(_) => {
            let available = verb_def.vocabulary().join(", ");
            let (name, rest) = args.split_first().ok_or_else(|| DispatchError::MissingSubcommand {
                verb: verb.to_string(),
                available: available.clone(),
            })?;
            let sub = verb_def
                .find_subcommand(name)
                .ok_or_else(|| DispatchError::UnknownSubcommand {
                    verb: verb.to_string(),
                    name: name.clone(),
                    available,
                })?;
            (sub, rest)
        }
    };

    let parsed = arg_parser::classify(verb, &sub.flags, rest)?;
    log::debug!(
        "Dispatching '{} {}' with flags {:?}, targets {:?}",
        verb,
        sub.name,
        parsed.flags,
        parsed.targets
    );
    (sub.handler)(session, sub, parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::handlers::commons::fixtures::{project, session};
    use crate::core::arg_parser::ClassifyError;
    use crate::test_utils::{RecordingRunner, ScriptedPrompter};

    fn dispatch_words(runner: &RecordingRunner, verb: &str, args: &[&str]) -> Result<Outcome> {
        let dir = project();
        let prompter = ScriptedPrompter::new("yes");
        let session = session(dir.path(), runner, &prompter);
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        dispatch(&Registry::new(), &session, verb, &args)
    }

    #[test]
    fn test_usage_errors_never_reach_the_runtime() {
        let runner = RecordingRunner::new();

        let err = dispatch_words(&runner, "d", &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::MissingSubcommand { .. })
        ));

        let err = dispatch_words(&runner, "dc", &["explode"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::UnknownSubcommand { name, .. }) if name == "explode"
        ));

        let err = dispatch_words(&runner, "dcup", &["-x"]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ClassifyError>(),
            Some(&ClassifyError::UnknownFlag("-x".to_string()))
        );

        let err = dispatch_words(&runner, "dc", &["up", "-f"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClassifyError>(),
            Some(ClassifyError::MissingFlagArgument(_))
        ));

        assert!(dispatch_words(&runner, "docker", &[]).is_err());
        assert!(runner.calls().is_empty());
    }
}
