// src/core/gate.rs

use crate::{constants::CONFIRM_TOKEN, core::style::Style, models::MutatingOperation};
use anyhow::Result;
use dialoguer::{Input, console::Term, theme::ColorfulTheme};
use std::fmt::Debug;
use std::io::{BufRead, IsTerminal, Write};

/// Source of the user's answer to a confirmation question.
pub trait Prompter: Debug {
    /// Reads one line of input. No timeout: waits as long as it takes.
    fn read_line(&self, prompt: &str) -> Result<String>;
}

/// Reads answers from the terminal through `dialoguer`, or one plain line from
/// stdin when either side is not a terminal (`echo yes | dc down`).
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&self, prompt: &str) -> Result<String> {
        if Term::stderr().is_term() && std::io::stdin().is_terminal() {
            let answer: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;
            return Ok(answer);
        }
        eprint!("{}: ", prompt);
        std::io::stderr().flush().ok();
        read_answer(&mut std::io::stdin().lock())
    }
}

/// One line of non-interactive input. End of input reads as an empty answer.
fn read_answer(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// The checkpoint in front of every mutating operation.
#[derive(Debug)]
pub struct Gate<'a> {
    prompter: &'a dyn Prompter,
    style: &'a Style,
}

impl<'a> Gate<'a> {
    /// A gate that asks through `prompter`.
    pub fn new(prompter: &'a dyn Prompter, style: &'a Style) -> Self {
        Self { prompter, style }
    }

    /// Shows the operation with its fully expanded targets, then asks.
    /// Only the exact answer `yes` (surrounding whitespace ignored) proceeds.
    pub fn confirm(&self, operation: &mut MutatingOperation) -> Result<bool> {
        if !operation.requires_confirmation {
            operation.confirmed = true;
            return Ok(true);
        }

        println!("\n{}", self.style.warning(&operation.description));
        if operation.affected_targets.is_empty() {
            println!("  {}", self.style.dim("(whole project scope)"));
        }
        for target in &operation.affected_targets {
            println!("  - {}", self.style.target(target));
        }

        let prompt = format!("Type '{}' to continue", CONFIRM_TOKEN);
        let answer = self.prompter.read_line(&prompt)?;
        operation.confirmed = answer.trim() == CONFIRM_TOKEN;
        log::debug!(
            "Confirmation for '{}': {:?} -> {}",
            operation.description,
            answer,
            operation.confirmed
        );
        Ok(operation.confirmed)
    }
}
