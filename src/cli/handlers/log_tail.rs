// src/cli/handlers/log_tail.rs

use super::commons::Session;
use crate::{
    cli::registry::Subcommand,
    core::targets,
    models::{Outcome, ParsedInvocation},
};
use anyhow::Result;

/// `dclt [-r] [-w] [patterns...]`: follows the logs of every service matching
/// one of the patterns. `-w` skips the history and only shows new lines.
pub fn handle(
    session: &Session<'_>,
    sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    let universe = session.universe(sub.targets, Some(&manifest.path))?;
    let matched = targets::resolve_many(&parsed.targets, &universe, parsed.has("regex"))?;
    log::debug!("dclt matched {:?} out of {:?}", matched, universe);

    let tail = if parsed.has("wait") {
        "0".to_string()
    } else {
        session.config.log_tail.to_string()
    };
    let invocation = session
        .runtime
        .compose(&manifest.path, ["logs", "-f", "--tail", tail.as_str()])
        .args(matched);
    session.stream(&invocation)?;
    Ok(Outcome::Completed)
}
