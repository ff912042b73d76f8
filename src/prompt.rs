//! User input and interaction handling.
//! The orchestrator only talks to the [`Prompter`] trait; the terminal
//! implementation is backed by dialoguer.

use crate::error::{Error, Result};
use dialoguer::{Confirm, Input};

/// Source of answers to interactive questions.
pub trait Prompter {
    /// Asks a yes/no question.
    ///
    /// # Arguments
    /// * `prompt` - Question shown to the user
    /// * `default` - Answer used when the user just presses enter
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Asks for a line of free text.
    fn input(&self, prompt: &str, default: &str) -> Result<String>;
}

/// Terminal prompter built on dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(Error::PromptError)
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()
            .map_err(Error::PromptError)
    }
}
