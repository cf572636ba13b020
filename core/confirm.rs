//! Yes/no confirmation for the interactive collector.

use crate::error::Result;
use dialoguer::Confirm;
use log;

pub const ESCALATE_PROMPT: &str = "Include all files in this folder?";

/// Something that can answer a yes/no question.
pub trait ConfirmSource {
    fn ask(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Asks on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl ConfirmSource for TerminalPrompt {
    fn ask(&self, prompt: &str, default: bool) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(answer)
    }
}

/// Says yes to everything without any I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmSource for AutoConfirm {
    fn ask(&self, _prompt: &str, _default: bool) -> Result<bool> {
        Ok(true)
    }
}

/// Decides whether a node is included.
///
/// `blanket` is the per-branch flag threaded through the walk. It is only ever
/// passed downwards by value, so an escalation made inside one folder cannot
/// reach its siblings or ancestors.
pub struct InteractionPolicy<'a> {
    source: &'a dyn ConfirmSource,
    auto_confirm: bool,
}

impl<'a> InteractionPolicy<'a> {
    pub fn new(source: &'a dyn ConfirmSource, auto_confirm: bool) -> Self {
        Self {
            source,
            auto_confirm,
        }
    }

    pub fn confirm(&self, prompt: &str, blanket: bool) -> Result<bool> {
        if blanket {
            return Ok(true);
        }
        self.ask(prompt)
    }

    /// Called after a folder was accepted. Returns the blanket flag to use for
    /// that folder's own subtree.
    pub fn escalate(&self, blanket: bool) -> Result<bool> {
        if blanket {
            return Ok(true);
        }
        self.ask(ESCALATE_PROMPT)
    }

    fn ask(&self, prompt: &str) -> Result<bool> {
        if self.auto_confirm {
            log::trace!("Auto-confirmed: {}", prompt);
            return Ok(true);
        }
        self.source.ask(prompt, true)
    }
}
