// src/system/runtime.rs

use crate::{
    models::{Config, TargetKind},
    system::executor::{ExecutionError, Invocation, ProcessRunner},
};
use std::path::{Path, PathBuf};

/// Builds invocations of the container runtime and the compose tool.
///
/// Nothing here runs a process on its own except the discovery helpers,
/// which go through the injected [`ProcessRunner`].
#[derive(Debug, Clone)]
pub struct Runtime {
    docker: Invocation,
    compose: Invocation,
    cwd: PathBuf,
}

impl Runtime {
    /// Reads the runtime and compose command lines from `config`. Every
    /// invocation built afterwards runs in `cwd`.
    pub fn from_config(config: &Config, cwd: &Path) -> Result<Self, ExecutionError> {
        Ok(Self {
            docker: Invocation::parse(&config.docker_bin)?,
            compose: Invocation::parse(&config.compose_command)?,
            cwd: cwd.to_path_buf(),
        })
    }

    /// `docker <args...>`
    pub fn docker<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.docker.clone().args(args).current_dir(&self.cwd)
    }

    /// `docker compose -f <manifest> <args...>`
    pub fn compose<I, S>(&self, manifest: &Path, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compose
            .clone()
            .arg("-f")
            .arg(manifest.display().to_string())
            .args(args)
            .current_dir(&self.cwd)
    }

    /// Container names as reported by the runtime, in its order.
    pub fn containers(
        &self,
        runner: &dyn ProcessRunner,
        include_stopped: bool,
    ) -> Result<Vec<String>, ExecutionError> {
        let mut args = vec!["ps"];
        if include_stopped {
            args.push("-a");
        }
        args.extend(["--format", "{{.Names}}"]);
        runner.capture(&self.docker(args)).map(|out| lines(&out))
    }

    /// Services declared by the manifest, in declaration order.
    pub fn services(
        &self,
        runner: &dyn ProcessRunner,
        manifest: &Path,
    ) -> Result<Vec<String>, ExecutionError> {
        runner
            .capture(&self.compose(manifest, ["config", "--services"]))
            .map(|out| lines(&out))
    }

    /// The universe a subcommand draws its targets from.
    pub fn universe(
        &self,
        runner: &dyn ProcessRunner,
        kind: TargetKind,
        manifest: Option<&Path>,
    ) -> Result<Vec<String>, ExecutionError> {
        match (kind, manifest) {
            (TargetKind::None, _) => Ok(Vec::new()),
            (TargetKind::Containers, _) => self.containers(runner, true),
            (TargetKind::RunningContainers, _) => self.containers(runner, false),
            (TargetKind::Services, Some(manifest)) => self.services(runner, manifest),
            (TargetKind::Services, None) => Ok(Vec::new()),
        }
    }
}

fn lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
