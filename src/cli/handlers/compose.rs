// src/cli/handlers/compose.rs

//! Handlers for the `dc` verb. Every call carries `-f <manifest>` so the compose
//! tool never guesses on its own.

use super::commons::{Session, approve, distinct_targets, exec_parts};
use super::docker::capitalize;
use crate::{
    cli::registry::Subcommand,
    core::compose_file,
    models::{Outcome, ParsedInvocation},
};
use anyhow::Result;

/// `dc ps [-a]`
pub fn list(session: &Session<'_>, _sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    let mut args = vec!["ps"];
    if parsed.has("all") {
        args.push("-a");
    }
    session.list(&session.runtime.compose(&manifest.path, args))?;
    Ok(Outcome::Completed)
}

/// `dc services`: one service per line, in declaration order.
pub fn services(
    session: &Session<'_>,
    _sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    for service in session.runtime.services(session.runner, &manifest.path)? {
        println!("{}", service);
    }
    Ok(Outcome::Completed)
}

/// `dc config`: the manifest as the compose tool merged it.
pub fn config(
    session: &Session<'_>,
    _sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    session.stream(&session.runtime.compose(&manifest.path, ["config"]))?;
    Ok(Outcome::Completed)
}

/// `dc file`: which manifest would be used, and why.
pub fn file(session: &Session<'_>, _sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    println!(
        "{} {}",
        session.style.target(&manifest.path.display().to_string()),
        session.style.dim(&format!("({})", manifest.source))
    );
    Ok(Outcome::Completed)
}

/// `dc logs [services...]`
pub fn logs(session: &Session<'_>, _sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    let tail = session.config.log_tail.to_string();
    let invocation = session
        .runtime
        .compose(&manifest.path, ["logs", "-f", "--tail", tail.as_str()])
        .args(distinct_targets(&parsed));
    session.stream(&invocation)?;
    Ok(Outcome::Completed)
}

/// `dc up [-p] [-b] [-l] [--force] [services...]`, also reachable as `dcup`.
///
/// Always detached. With `-l` the logs of the same services are followed once
/// the start succeeded.
pub fn up(session: &Session<'_>, sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    let set = session.targets(sub.targets, &parsed, Some(&manifest.path))?;
    if set.resolved.is_empty() {
        println!("{}", session.style.notice("No services declared in the manifest."));
        return Ok(Outcome::Completed);
    }

    let mut description = String::from("Create and start services");
    let mut args = vec!["up", "-d"];
    if parsed.has("pull") {
        description.push_str(", pulling images first");
        args.extend(["--pull", "always"]);
    }
    if parsed.has("build") {
        description.push_str(", building images first");
        args.push("--build");
    }
    if parsed.has("force") {
        description.push_str(", recreating containers");
        args.push("--force-recreate");
    }
    if !approve(session, sub, description, &set.resolved)? {
        return Ok(Outcome::Cancelled);
    }

    let invocation = session
        .runtime
        .compose(&manifest.path, args)
        .args(set.resolved.iter().cloned());
    session.stream(&invocation)?;
    println!("{}", session.style.success("Services are up."));

    if parsed.has("logs") {
        let tail = session.config.log_tail.to_string();
        let invocation = session
            .runtime
            .compose(&manifest.path, ["logs", "-f", "--tail", tail.as_str()])
            .args(set.resolved);
        session.stream(&invocation)?;
    }
    Ok(Outcome::Completed)
}

/// `dc down [-v]`: always project-wide.
pub fn down(session: &Session<'_>, sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    let mut description = format!(
        "Stop and remove all containers and networks of {}",
        manifest.path.display()
    );
    let mut args = vec!["down"];
    if parsed.has("volumes") {
        description.push_str(", including named volumes");
        args.push("-v");
    }
    if !approve(session, sub, description, &[])? {
        return Ok(Outcome::Cancelled);
    }
    session.stream(&session.runtime.compose(&manifest.path, args))?;
    Ok(Outcome::Completed)
}

/// `dc start|stop|restart|build|pull [services...]`
pub fn lifecycle(
    session: &Session<'_>,
    sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    let set = session.targets(sub.targets, &parsed, Some(&manifest.path))?;
    if set.resolved.is_empty() {
        println!("{}", session.style.notice(&format!("No services to {}.", sub.name)));
        return Ok(Outcome::Completed);
    }

    let mut args = vec![sub.name];
    if sub.name == "build" {
        if parsed.has("pull") {
            args.push("--pull");
        }
        if parsed.has("no-cache") {
            args.push("--no-cache");
        }
    }
    let description = format!("{} services", capitalize(sub.name));
    if !approve(session, sub, description, &set.resolved)? {
        return Ok(Outcome::Cancelled);
    }
    session.stream(&session.runtime.compose(&manifest.path, args).args(set.resolved))?;
    Ok(Outcome::Completed)
}

/// `dc exec <service> [cmd...]`
pub fn exec(session: &Session<'_>, sub: &Subcommand, parsed: ParsedInvocation) -> Result<Outcome> {
    let manifest = session.manifest(&parsed)?;
    let (service, command) = exec_parts(session, &parsed, sub)?;
    let invocation = session
        .runtime
        .compose(&manifest.path, ["exec", service])
        .args(command)
        .interactive();
    session.stream(&invocation)?;
    Ok(Outcome::Completed)
}

/// `dc default [file]` / `dc default -r`
///
/// Without arguments the current default is shown.
pub fn default_file(
    session: &Session<'_>,
    _sub: &Subcommand,
    parsed: ParsedInvocation,
) -> Result<Outcome> {
    let style = &session.style;
    if parsed.has("remove") {
        if compose_file::remove_default(&session.cwd)? {
            println!("{}", style.success("Default compose file removed."));
        } else {
            println!("{}", style.notice("No default compose file was set."));
        }
        return Ok(Outcome::Completed);
    }

    match parsed.targets.first() {
        Some(file) => {
            if !session.cwd.join(file).is_file() {
                println!("{}", style.warning(&format!("'{}' does not exist yet.", file)));
            }
            compose_file::set_default(&session.cwd, file)?;
            println!("{}", style.success(&format!("Default compose file set to '{}'.", file)));
        }
        None => match compose_file::read_default(&session.cwd)? {
            Some(file) => println!("{}", style.target(&file)),
            None => println!("{}", style.notice("No default compose file is set.")),
        },
    }
    Ok(Outcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::handlers::commons::fixtures::{compose_prefix, project, session};
    use crate::cli::{dispatcher, registry::Registry};
    use crate::core::style::Style;
    use crate::system::executor::Invocation;
    use crate::test_utils::{RecordingRunner, ScriptedPrompter};
    use std::path::Path;

    fn run_in(
        dir: &Path,
        runner: &RecordingRunner,
        answer: &str,
        verb: &str,
        args: &[&str],
    ) -> Result<Outcome> {
        let prompter = ScriptedPrompter::new(answer);
        let session = session(dir, runner, &prompter);
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        dispatcher::dispatch(&Registry::new(), &session, verb, &args)
    }

    #[test]
    fn test_dcup_pull_and_logs_over_the_whole_manifest() {
        let dir = project();
        let prefix = compose_prefix(dir.path());
        let runner = RecordingRunner::new()
            .respond(&format!("{} config --services", prefix), "web\ndb\n");

        let outcome = run_in(dir.path(), &runner, "yes", "dcup", &["-pl"]).unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(
            runner.calls(),
            vec![
                format!("{} config --services", prefix),
                format!("{} up -d --pull always web db", prefix),
                format!("{} logs -f --tail 100 web db", prefix),
            ]
        );
    }

    #[test]
    fn test_declined_up_never_starts_anything() {
        let dir = project();
        let runner = RecordingRunner::new();

        let args = ["up", "--build", "--force", "api"];
        let outcome = run_in(dir.path(), &runner, "nope", "dc", &args).unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_missing_manifest_override_runs_nothing() {
        let dir = project();
        let runner = RecordingRunner::new();
        let err = run_in(dir.path(), &runner, "yes", "dc", &["up", "-f", "nope.yml"]).unwrap_err();
        assert!(err.to_string().contains("nope.yml"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_override_flag_selects_the_manifest() {
        let dir = project();
        std::fs::write(dir.path().join("other.yml"), "services: {}\n").unwrap();
        let runner = RecordingRunner::new();
        run_in(dir.path(), &runner, "yes", "dc", &["restart", "-f", "other.yml", "web"]).unwrap();
        assert_eq!(
            runner.calls(),
            vec![format!(
                "docker compose -f {} restart web",
                dir.path().join("other.yml").display()
            )]
        );
    }

    #[test]
    fn test_down_is_project_wide_and_gated() {
        let dir = project();
        let prefix = compose_prefix(dir.path());
        let runner = RecordingRunner::new();
        let declined = run_in(dir.path(), &runner, "", "dc", &["down", "-v"]).unwrap();
        assert_eq!(declined, Outcome::Cancelled);
        run_in(dir.path(), &runner, "yes", "dc", &["down", "-v"]).unwrap();
        assert_eq!(runner.calls(), vec![format!("{} down -v", prefix)]);
    }

    #[test]
    fn test_build_flags() {
        let dir = project();
        let prefix = compose_prefix(dir.path());
        let runner = RecordingRunner::new();
        run_in(dir.path(), &runner, "yes", "dc", &["build", "-p", "--no-cache", "web"]).unwrap();
        assert_eq!(runner.calls(), vec![format!("{} build --pull --no-cache web", prefix)]);
    }

    #[test]
    fn test_read_only_subcommands_are_not_gated() {
        let dir = project();
        let prefix = compose_prefix(dir.path());
        let runner = RecordingRunner::new();
        // An answer that would decline; nothing must ask.
        run_in(dir.path(), &runner, "no", "dc", &["logs", "web"]).unwrap();
        run_in(dir.path(), &runner, "no", "dc", &["exec", "web", "ls", "-la"]).unwrap();
        run_in(dir.path(), &runner, "no", "dc", &["ls", "-a"]).unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                format!("{} logs -f --tail 100 web", prefix),
                format!("{} exec web ls -la", prefix),
                format!("{} ps -a", prefix),
            ]
        );
    }

    #[test]
    fn test_logs_follow_each_service_once() {
        let dir = project();
        let prefix = compose_prefix(dir.path());
        let runner = RecordingRunner::new();
        run_in(dir.path(), &runner, "", "dc", &["logs", "web", "db", "web"]).unwrap();
        assert_eq!(runner.calls(), vec![format!("{} logs -f --tail 100 web db", prefix)]);
    }

    #[test]
    fn test_listing_goes_through_the_formatter() {
        let dir = project();
        let prefix = compose_prefix(dir.path());
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new("");
        let mut session = session(dir.path(), &runner, &prompter);
        session.style = Style::new(false, Some(Invocation::parse("grc").unwrap()));

        dispatcher::dispatch(&Registry::new(), &session, "dc", &["ps".to_string()]).unwrap();
        assert_eq!(runner.calls(), vec![format!("{} ps", prefix), "| grc".to_string()]);
    }

    #[test]
    fn test_default_set_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stack.yml"), "services: {}\n").unwrap();
        let runner = RecordingRunner::new();

        run_in(dir.path(), &runner, "", "dc", &["default", "stack.yml"]).unwrap();
        run_in(dir.path(), &runner, "", "dc", &["default", "stack.yml"]).unwrap();
        assert_eq!(
            compose_file::read_default(dir.path()).unwrap().as_deref(),
            Some("stack.yml")
        );
        let settings = std::fs::read_to_string(dir.path().join(".env")).unwrap();
        assert_eq!(settings.matches("COMPOSE_FILE=").count(), 1);

        run_in(dir.path(), &runner, "", "dc", &["default", "-r"]).unwrap();
        assert!(compose_file::read_default(dir.path()).unwrap().is_none());
        assert!(runner.calls().is_empty());
    }
}
