// src/core/arg_parser.rs

use crate::models::{FlagSpec, ParsedInvocation};
use thiserror::Error;

/// A word the subcommand's flag table cannot place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Neither a declared flag nor `-f`.
    #[error("Unknown flag '{0}'.")]
    UnknownFlag(String),
    /// `-f` at the end or followed by another flag.
    #[error("Flag '{0}' requires a value.")]
    MissingFlagArgument(String),
}

/// Splits the raw arguments of a subcommand into flags, an optional manifest
/// override and positional targets.
///
/// # Logic:
/// - `-f <file>` / `--file <file>` consume the next token when the subcommand accepts
///   a manifest. A following token that looks like a flag is a usage error.
/// - `--name` must be a known long flag.
/// - `-xyz` is a cluster: each letter is a flag on its own.
/// - `--` ends flag parsing and a lone `-` is a plain target.
/// - In pass-through mode everything after the first positional is kept verbatim.
pub fn classify(
    verb: &str,
    spec: &FlagSpec,
    args: &[String],
) -> Result<ParsedInvocation, ClassifyError> {
    let mut parsed = ParsedInvocation {
        verb: verb.to_string(),
        raw_args: args.to_vec(),
        ..Default::default()
    };
    let mut tokens = args.iter().peekable();
    let mut flags_done = false;

    while let Some(token) = tokens.next() {
        if flags_done || token == "-" || !token.starts_with('-') {
            parsed.targets.push(token.clone());
            if spec.passthrough {
                // The rest belongs to the command run inside the target.
                parsed.targets.extend(tokens.by_ref().cloned());
            }
            continue;
        }

        if token == "--" {
            flags_done = true;
            continue;
        }

        if spec.accepts_file && (token == "-f" || token == "--file") {
            let value = match tokens.peek() {
                Some(next) if !next.starts_with('-') => tokens.next().cloned(),
                _ => None,
            };
            let value = value.ok_or_else(|| ClassifyError::MissingFlagArgument(token.clone()))?;
            parsed.override_file = Some(value);
            continue;
        }

        if let Some(name) = token.strip_prefix("--") {
            let flag = spec
                .by_long(name)
                .ok_or_else(|| ClassifyError::UnknownFlag(token.clone()))?;
            parsed.flags.insert(flag.key);
        } else if let Some(cluster) = token.strip_prefix('-') {
            for letter in cluster.chars() {
                let flag = spec
                    .by_short(letter)
                    .ok_or_else(|| ClassifyError::UnknownFlag(format!("-{}", letter)))?;
                parsed.flags.insert(flag.key);
            }
        }
    }

    log::trace!("Classified {:?} as {:?}", args, parsed);
    Ok(parsed)
}
