// src/system/executor.rs

use crate::CancellationToken;
use std::fmt;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Whether a child process currently owns the terminal.
static CHILD_ACTIVE: AtomicBool = AtomicBool::new(false);

/// `true` while a spawned command is running. A Ctrl+C arriving outside of
/// that window is meant for dockhand itself.
pub fn child_active() -> bool {
    CHILD_ACTIVE.load(Ordering::SeqCst)
}

/// Marks a child as active for as long as it lives.
struct ActiveChild;

impl ActiveChild {
    fn enter() -> Self {
        CHILD_ACTIVE.store(true, Ordering::SeqCst);
        Self
    }
}

impl Drop for ActiveChild {
    fn drop(&mut self) {
        CHILD_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Failures at the process boundary.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// A configured command line has unbalanced quotes.
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    /// A configured command line is blank.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// Spawning or waiting failed, e.g. the program is not installed.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    /// The command ran and reported failure.
    #[error("Command '{command}' exited with {}.", describe_code(.code))]
    RuntimeInvocation {
        /// Display form of the invocation.
        command: String,
        /// Exit code; `None` when killed by a signal.
        code: Option<i32>,
    },
    /// Captured output could not be decoded.
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        /// Display form of the invocation.
        command: String,
        /// The decoding error.
        #[source]
        source: std::string::FromUtf8Error,
    },
    /// Ctrl+C arrived while the command ran.
    #[error("Command '{0}' was interrupted.")]
    Interrupted(String),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

/// A fully built external command: program, arguments and working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Looked up on `PATH`.
    pub program: String,
    /// Passed as-is, never through a shell.
    pub args: Vec<String>,
    /// Inherited from the process when `None`.
    pub cwd: Option<PathBuf>,
    /// Attached to the terminal (`exec -it`). Ctrl+C belongs to the child.
    pub interactive: bool,
}

impl Invocation {
    /// `program` with `args`, in the inherited working directory.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            interactive: false,
        }
    }

    /// Splits a configured command line such as `docker compose` or `grc -es`.
    pub fn parse(command_line: &str) -> Result<Self, ExecutionError> {
        let parts = shlex::split(command_line.trim())
            .ok_or_else(|| ExecutionError::CommandParse(command_line.to_string()))?;
        let (program, args) = parts.split_first().ok_or(ExecutionError::EmptyCommand)?;
        Ok(Self::new(program.clone(), args.iter().cloned()))
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends arguments in order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the command in `cwd`.
    pub fn current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Marks the command as attached to the terminal (`exec -it`).
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    fn to_command(&self) -> StdCommand {
        let mut command = StdCommand::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(dunce::simplified(cwd));
        }
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(&self.args);
        let quoted: Vec<String> = words
            .map(|w| shlex::try_quote(w).map_or_else(|_| w.clone(), |q| q.into_owned()))
            .collect();
        f.write_str(&quoted.join(" "))
    }
}

/// The boundary to external processes. Their exit status and output are the
/// whole contract; stderr always reaches the user's terminal untouched.
pub trait ProcessRunner: Debug {
    /// Runs the command attached to the terminal until it finishes or is interrupted.
    fn stream(&self, invocation: &Invocation) -> Result<(), ExecutionError>;

    /// Like [`ProcessRunner::stream`], with stdout piped through `formatter`.
    fn stream_through(
        &self,
        invocation: &Invocation,
        formatter: &Invocation,
    ) -> Result<(), ExecutionError>;

    /// Runs a short command and returns its standard output.
    fn capture(&self, invocation: &Invocation) -> Result<String, ExecutionError>;
}

/// Spawns real processes. Polls the cancellation token while waiting so a
/// Ctrl+C terminates the child instead of orphaning it.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cancellation_token: CancellationToken,
}

impl SystemRunner {
    /// `cancellation_token` is the one the interrupt handler sets.
    pub fn new(cancellation_token: CancellationToken) -> Self {
        Self { cancellation_token }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token.load(Ordering::SeqCst)
    }

    fn spawn(
        &self,
        invocation: &Invocation,
        command: &mut StdCommand,
    ) -> Result<Child, ExecutionError> {
        log::debug!("Spawning: {}", invocation);
        command.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                log::debug!("Program '{}' not found in PATH.", invocation.program);
            }
            ExecutionError::CommandFailed(invocation.to_string(), e)
        })
    }

    /// Non-blocking wait loop to allow for cancellation.
    fn wait(
        &self,
        invocation: &Invocation,
        child: &mut Child,
    ) -> Result<ExitStatus, ExecutionError> {
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if self.is_cancelled() {
                        return Err(ExecutionError::Interrupted(invocation.to_string()));
                    }
                    return Ok(status);
                }
                Ok(None) => {
                    if self.is_cancelled() {
                        log::debug!(
                            "Cancellation requested, killing child process (PID: {})...",
                            child.id()
                        );
                        if let Err(e) = child.kill() {
                            log::warn!("Failed to kill child process {}: {}", child.id(), e);
                        }
                        // Reap it so nothing is left behind.
                        child.wait().ok();
                        return Err(ExecutionError::Interrupted(invocation.to_string()));
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => return Err(ExecutionError::CommandFailed(invocation.to_string(), e)),
            }
        }
    }

    fn check_status(invocation: &Invocation, status: ExitStatus) -> Result<(), ExecutionError> {
        if status.success() {
            Ok(())
        } else {
            Err(ExecutionError::RuntimeInvocation {
                command: invocation.to_string(),
                code: status.code(),
            })
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn stream(&self, invocation: &Invocation) -> Result<(), ExecutionError> {
        let mut command = invocation.to_command();
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        let _active = ActiveChild::enter();
        let mut child = self.spawn(invocation, &mut command)?;

        if invocation.interactive {
            // The terminal's Ctrl+C goes to the session inside the container.
            let status = child
                .wait()
                .map_err(|e| ExecutionError::CommandFailed(invocation.to_string(), e))?;
            self.cancellation_token.store(false, Ordering::SeqCst);
            return Self::check_status(invocation, status);
        }

        let status = self.wait(invocation, &mut child)?;
        Self::check_status(invocation, status)
    }

    fn stream_through(
        &self,
        invocation: &Invocation,
        formatter: &Invocation,
    ) -> Result<(), ExecutionError> {
        let mut producer_cmd = invocation.to_command();
        producer_cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        let _active = ActiveChild::enter();
        let mut producer = self.spawn(invocation, &mut producer_cmd)?;

        let pipe = producer.stdout.take().ok_or_else(|| {
            ExecutionError::CommandFailed(
                invocation.to_string(),
                std::io::Error::other("stdout was not captured"),
            )
        })?;

        let mut consumer_cmd = formatter.to_command();
        consumer_cmd
            .stdin(Stdio::from(pipe))
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        let mut consumer = match self.spawn(formatter, &mut consumer_cmd) {
            Ok(child) => child,
            Err(e) => {
                producer.kill().ok();
                producer.wait().ok();
                return Err(e);
            }
        };

        let status = self.wait(invocation, &mut producer);
        let formatter_status = self.wait(formatter, &mut consumer);
        Self::check_status(invocation, status?)?;
        if let Ok(formatter_status) = formatter_status {
            if !formatter_status.success() {
                log::warn!("Formatter '{}' exited with {:?}", formatter, formatter_status.code());
            }
        }
        Ok(())
    }

    fn capture(&self, invocation: &Invocation) -> Result<String, ExecutionError> {
        if self.is_cancelled() {
            return Err(ExecutionError::Interrupted(invocation.to_string()));
        }
        log::debug!("Capturing: {}", invocation);

        let _active = ActiveChild::enter();
        let output = invocation
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| ExecutionError::CommandFailed(invocation.to_string(), e))?;

        Self::check_status(invocation, output.status)?;
        String::from_utf8(output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
            command: invocation.to_string(),
            source: e,
        })
    }
}

/// Returns `true` when `program` resolves to an executable file on `PATH`.
pub fn is_executable_in_path(program: &str) -> bool {
    let candidate = std::path::Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }
    std::env::var_os("PATH")
        .map(|path_var| std::env::split_paths(&path_var).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn runner() -> SystemRunner {
        SystemRunner::new(Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn test_parse_configured_command() {
        let inv = Invocation::parse("docker compose").unwrap();
        assert_eq!(inv.program, "docker");
        assert_eq!(inv.args, vec!["compose".to_string()]);
        assert!(matches!(Invocation::parse("   "), Err(ExecutionError::EmptyCommand)));
        assert!(matches!(Invocation::parse("grc 'open"), Err(ExecutionError::CommandParse(_))));
    }

    #[test]
    fn test_display_quotes_arguments() {
        let inv = Invocation::new("docker", ["exec", "web", "sh", "-c", "echo hi"]);
        let words = shlex::split(&inv.to_string()).unwrap();
        assert_eq!(words, vec!["docker", "exec", "web", "sh", "-c", "echo hi"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_and_exit_status() {
        let out = runner().capture(&Invocation::new("sh", ["-c", "echo hello"])).unwrap();
        assert_eq!(out, "hello\n");

        let err = runner().capture(&Invocation::new("sh", ["-c", "exit 3"])).unwrap_err();
        assert!(matches!(err, ExecutionError::RuntimeInvocation { code: Some(3), .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_cancelled_stream_kills_the_child() {
        let token = Arc::new(AtomicBool::new(true));
        let runner = SystemRunner::new(token);
        let err = runner.stream(&Invocation::new("sleep", ["5"])).unwrap_err();
        assert!(matches!(err, ExecutionError::Interrupted(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_stream_through_pipes_into_formatter() {
        let producer = Invocation::new("sh", ["-c", "printf 'web\\ndb\\n'"]);
        let formatter = Invocation::new("cat", Vec::<String>::new());
        runner().stream_through(&producer, &formatter).unwrap();

        // The producer's status decides the result, not the formatter's.
        let failing = Invocation::new("sh", ["-c", "echo partial; exit 4"]);
        let err = runner().stream_through(&failing, &formatter).unwrap_err();
        assert!(matches!(err, ExecutionError::RuntimeInvocation { code: Some(4), .. }));

        let quiet_formatter = Invocation::new("sh", ["-c", "cat >/dev/null; exit 2"]);
        runner().stream_through(&producer, &quiet_formatter).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_formatter_reaps_the_producer() {
        let producer = Invocation::new("sh", ["-c", "echo hi"]);
        let formatter =
            Invocation::new("definitely-not-a-real-formatter-xyz", Vec::<String>::new());
        let err = runner().stream_through(&producer, &formatter).unwrap_err();
        assert!(matches!(err, ExecutionError::CommandFailed(..)));
    }

    #[test]
    fn test_missing_program() {
        let err = runner()
            .capture(&Invocation::new("definitely-not-a-real-program-xyz", Vec::<String>::new()))
            .unwrap_err();
        assert!(matches!(err, ExecutionError::CommandFailed(..)));
    }
}
