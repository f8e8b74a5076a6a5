// src/cli/handlers/quick.rs

//! `dq` and `dcq`: exec into the first target whose name contains a pattern.

use super::commons::{Session, exec_parts};
use crate::{
    cli::registry::Subcommand,
    core::targets,
    models::{Outcome, ParsedInvocation},
};
use anyhow::Result;

/// `dq <pattern> [cmd...]`
pub fn container(
    session: &Session<'_>,
    sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let (pattern, command) = exec_parts(session, &parsed, sub)?;
    let universe = session.universe(sub.targets, None)?;
    let name = targets::first_match(pattern, &universe)?;
    println!("{}", session.style.notice(&format!("Entering {}", session.style.target(&name))));

    let invocation = session
        .runtime
        .docker(["exec", "-it", name.as_str()])
        .args(command)
        .interactive();
    session.stream(&invocation)?;
    Ok(Outcome::Completed)
}

/// `dcq [-f file] <pattern> [cmd...]`
pub fn service(
    session: &Session<'_>,
    sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    let (pattern, command) = exec_parts(session, &parsed, sub)?;
    let universe = session.universe(sub.targets, Some(&manifest.path))?;
    let name = targets::first_match(pattern, &universe)?;
    println!("{}", session.style.notice(&format!("Entering {}", session.style.target(&name))));

    let invocation = session
        .runtime
        .compose(&manifest.path, ["exec", name.as_str()])
        .args(command)
        .interactive();
    session.stream(&invocation)?;
    Ok(Outcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::handlers::commons::fixtures::{compose_prefix, project, session};
    use crate::cli::{dispatcher, registry::Registry};
    use crate::core::targets::TargetError;
    use crate::test_utils::{RecordingRunner, ScriptedPrompter};

    fn run(
        dir: &std::path::Path,
        runner: &RecordingRunner,
        verb: &str,
        args: &[&str],
    ) -> Result<Outcome> {
        let prompter = ScriptedPrompter::new("");
        let session = session(dir, runner, &prompter);
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        dispatcher::dispatch(&Registry::new(), &session, verb, &args)
    }

    #[test]
    fn test_dq_picks_first_case_insensitive_match() {
        let dir = project();
        let runner = RecordingRunner::new()
            .respond("docker ps --format {{.Names}}", "proj_db_1\nproj_web_1\nproj_web_2\n");
        run(dir.path(), &runner, "dq", &["WEB"]).unwrap();
        assert_eq!(
            runner.calls(),
            vec!["docker ps --format {{.Names}}", "docker exec -it proj_web_1 sh"]
        );
    }

    #[test]
    fn test_dq_passes_the_trailing_command_verbatim() {
        let dir = project();
        let runner = RecordingRunner::new().respond("docker ps --format {{.Names}}", "api\n");
        run(dir.path(), &runner, "dq", &["ap", "env", "-0"]).unwrap();
        assert_eq!(runner.calls().last().unwrap(), "docker exec -it api env -0");
    }

    #[test]
    fn test_no_match_runs_nothing() {
        let dir = project();
        let runner = RecordingRunner::new().respond("docker ps --format {{.Names}}", "api\n");
        let err = run(dir.path(), &runner, "dq", &["zzz"]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TargetError>(),
            Some(&TargetError::NoMatch("zzz".to_string()))
        );
        assert_eq!(runner.calls(), vec!["docker ps --format {{.Names}}"]);
    }

    #[test]
    fn test_dcq_uses_manifest_services() {
        let dir = project();
        let prefix = compose_prefix(dir.path());
        let runner = RecordingRunner::new()
            .respond(&format!("{} config --services", prefix), "frontend\nbackend\n");
        run(dir.path(), &runner, "dcq", &["end"]).unwrap();
        assert_eq!(
            runner.calls().last().unwrap(),
            &format!("{} exec frontend sh", prefix)
        );
    }

    #[test]
    fn test_missing_pattern_is_a_usage_error() {
        let dir = project();
        let runner = RecordingRunner::new();
        assert!(run(dir.path(), &runner, "dq", &[]).is_err());
        assert!(runner.calls().is_empty());
    }
}
