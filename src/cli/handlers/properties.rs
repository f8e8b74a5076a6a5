// src/cli/handlers/properties.rs

use super::commons::Session;
use crate::{
    cli::registry::Subcommand,
    constants::PROBE_NOT_FOUND_CODE,
    core::properties::{self, TargetProperties},
    models::{Outcome, ParsedInvocation},
    system::executor::ExecutionError,
};
use anyhow::Result;
use std::path::Path;

/// `dcpr [-a] [-s] [services...]`: reads the build properties file baked into
/// each service's container and reports it.
pub fn handle(
    session: &Session<'_>,
    sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    let set = session.targets(sub.targets, &parsed, Some(&manifest.path))?;
    let settings = &session.config.properties;
    let script = properties::probe_script(&settings.paths);

    let mut rows = Vec::with_capacity(set.resolved.len());
    for service in set.resolved {
        let pairs = probe(session, &manifest.path, &service, &script)?;
        rows.push(TargetProperties { target: service, pairs });
    }

    if parsed.has("summary") {
        let summary = properties::render_summary(
            &rows,
            &settings.keys,
            &settings.capped_key,
            settings.summary_max_width,
        );
        print!("{}", summary);
        return Ok(Outcome::Completed);
    }

    let style = &session.style;
    for row in &rows {
        println!("{}", style.header(&row.target));
        let Some(pairs) = &row.pairs else {
            println!("  {}", style.warning("no build properties found"));
            continue;
        };
        if parsed.has("all") {
            for (key, value) in pairs {
                println!("  {} = {}", style.dim(key), value);
            }
        } else {
            for key in &settings.keys {
                let value = properties::lookup(pairs, key).unwrap_or("-");
                println!("  {} = {}", style.dim(key), value);
            }
        }
    }
    Ok(Outcome::Completed)
}

/// Runs the probe inside `service`. A probe that found no file is not an error;
/// any other failure of the runtime is.
fn probe(
    session: &Session<'_>,
    manifest: &Path,
    service: &str,
    script: &str,
) -> Result<Option<Vec<(String, String)>>> {
    let invocation = session
        .runtime
        .compose(manifest, ["exec", "-T", service, "sh", "-c", script]);
    match session.runner.capture(&invocation) {
        Ok(output) => Ok(Some(properties::parse(&output))),
        Err(ExecutionError::RuntimeInvocation { code: Some(code), .. })
            if code == PROBE_NOT_FOUND_CODE =>
        {
            log::debug!("No properties file in '{}'", service);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::handlers::commons::fixtures::{compose_prefix, project, session};
    use crate::cli::{dispatcher, registry::Registry};
    use crate::core::properties;
    use crate::models::{Config, Outcome};
    use crate::system::executor::ExecutionError;
    use crate::test_utils::{RecordingRunner, ScriptedPrompter};

    fn probe_key(prefix: &str, service: &str) -> String {
        let script = properties::probe_script(&Config::default().properties.paths);
        format!("{} exec -T {} sh -c {}", prefix, service, script)
    }

    #[test]
    fn test_probes_every_service_and_tolerates_missing_files() {
        let dir = project();
        let prefix = compose_prefix(dir.path());
        let runner = RecordingRunner::new()
            .respond(&format!("{} config --services", prefix), "web\ncache\n")
            .respond(&probe_key(&prefix, "web"), "version=1.4.2\ngit.branch=main\n")
            .fail(&probe_key(&prefix, "cache"), 3);
        let prompter = ScriptedPrompter::new("");
        let session = session(dir.path(), &runner, &prompter);

        let outcome =
            dispatcher::dispatch(&Registry::new(), &session, "dcpr", &["-s".to_string()]).unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(runner.calls().len(), 3);
        assert_eq!(prompter.asked(), 0);
    }

    #[test]
    fn test_other_probe_failures_propagate() {
        let dir = project();
        let prefix = compose_prefix(dir.path());
        let runner = RecordingRunner::new().fail(&probe_key(&prefix, "web"), 1);
        let prompter = ScriptedPrompter::new("");
        let session = session(dir.path(), &runner, &prompter);

        let err = dispatcher::dispatch(&Registry::new(), &session, "dcpr", &["web".to_string()])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExecutionError>(),
            Some(ExecutionError::RuntimeInvocation { code: Some(1), .. })
        ));
    }
}
