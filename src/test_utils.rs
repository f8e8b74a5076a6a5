// src/test_utils.rs
//
// Test doubles for the process and prompt boundaries.

use crate::{
    core::gate::Prompter,
    system::executor::{ExecutionError, Invocation, ProcessRunner},
};
use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Unquoted `program arg arg...` form used to match recorded calls.
pub(crate) fn key(invocation: &Invocation) -> String {
    std::iter::once(invocation.program.as_str())
        .chain(invocation.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Records every invocation instead of running it.
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    calls: RefCell<Vec<String>>,
    outputs: HashMap<String, String>,
    failures: HashMap<String, i32>,
}

impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Canned stdout for a captured command.
    pub(crate) fn respond(mut self, command: &str, stdout: &str) -> Self {
        self.outputs.insert(command.to_string(), stdout.to_string());
        self
    }

    /// Makes a command exit with `code`.
    pub(crate) fn fail(mut self, command: &str, code: i32) -> Self {
        self.failures.insert(command.to_string(), code);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, invocation: &Invocation) -> Result<String, ExecutionError> {
        let key = key(invocation);
        self.calls.borrow_mut().push(key.clone());
        if let Some(code) = self.failures.get(&key) {
            return Err(ExecutionError::RuntimeInvocation {
                command: key,
                code: Some(*code),
            });
        }
        Ok(self.outputs.get(&key).cloned().unwrap_or_default())
    }
}

impl ProcessRunner for RecordingRunner {
    fn stream(&self, invocation: &Invocation) -> Result<(), ExecutionError> {
        self.record(invocation).map(|_| ())
    }

    fn stream_through(
        &self,
        invocation: &Invocation,
        formatter: &Invocation,
    ) -> Result<(), ExecutionError> {
        self.record(invocation)?;
        self.calls.borrow_mut().push(format!("| {}", key(formatter)));
        Ok(())
    }

    fn capture(&self, invocation: &Invocation) -> Result<String, ExecutionError> {
        self.record(invocation)
    }
}

/// Answers every question with the same line.
#[derive(Debug)]
pub(crate) struct ScriptedPrompter {
    answer: String,
    asked: Cell<usize>,
}

impl ScriptedPrompter {
    pub(crate) fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            asked: Cell::new(0),
        }
    }

    pub(crate) fn asked(&self) -> usize {
        self.asked.get()
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&self, _prompt: &str) -> Result<String> {
        self.asked.set(self.asked.get() + 1);
        Ok(self.answer.clone())
    }
}
