//! Confirmation gate for destructive actions.
//!
//! Asking is split in two: [`PendingAction`] describes what would happen and
//! is pure, a [`Confirmer`] supplies the answer. Only an explicit yes lets
//! the action through; a refusal, a closed stdin or a non-interactive
//! session all abort.

use std::fmt;
use std::io::IsTerminal;

use dialoguer::Confirm;

use crate::error::{CliError, CliResult};

/// Outcome of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Proceed with the action.
    Confirmed,
    /// Do not perform the action.
    Aborted,
}

/// A destructive action awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    action: String,
    resource: String,
    target: String,
}

impl PendingAction {
    /// Describes `action` on the `resource` identified by `target`.
    pub fn new(
        action: impl Into<String>,
        resource: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            resource: resource.into(),
            target: target.into(),
        }
    }

    /// The question shown to the user.
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to {} {}: {}?",
            self.action, self.resource, self.target
        )
    }

    /// Maps an answer to a decision.
    pub const fn resolve(&self, answer: Option<bool>) -> Confirmation {
        match answer {
            Some(true) => Confirmation::Confirmed,
            Some(false) | None => Confirmation::Aborted,
        }
    }
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.action, self.resource, self.target)
    }
}

/// Source of yes/no answers.
pub trait Confirmer: Send + Sync {
    /// Asks `prompt`. `None` means no answer could be obtained.
    fn confirm(&self, prompt: &str) -> Option<bool>;
}

/// Asks on the terminal, defaulting to no.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> Option<bool> {
        if !std::io::stdin().is_terminal() {
            tracing::debug!("stdin is not a terminal, refusing to prompt");
            return None;
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| tracing::debug!(error = %e, "confirmation prompt failed"))
            .ok()
    }
}

/// Answers yes to everything (`--force`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, prompt: &str) -> Option<bool> {
        tracing::debug!(prompt, "confirmation skipped by --force");
        Some(true)
    }
}

/// Runs the gate for `pending`.
///
/// # Errors
///
/// Returns [`CliError::Aborted`] unless the confirmer answered yes.
pub fn gate(confirmer: &dyn Confirmer, pending: &PendingAction) -> CliResult<()> {
    let answer = confirmer.confirm(&pending.prompt());
    match pending.resolve(answer) {
        Confirmation::Confirmed => Ok(()),
        Confirmation::Aborted => Err(CliError::Aborted {
            pending: pending.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<bool>);

    impl Confirmer for Fixed {
        fn confirm(&self, _prompt: &str) -> Option<bool> {
            self.0
        }
    }

    fn pending() -> PendingAction {
        PendingAction::new("delete", "KAS registry entry", "k1")
    }

    #[test]
    fn test_prompt() {
        assert_eq!(
            pending().prompt(),
            "Are you sure you want to delete KAS registry entry: k1?"
        );
    }

    #[test]
    fn test_only_yes_confirms() {
        let action = pending();
        assert_eq!(action.resolve(Some(true)), Confirmation::Confirmed);
        assert_eq!(action.resolve(Some(false)), Confirmation::Aborted);
        assert_eq!(action.resolve(None), Confirmation::Aborted);
    }

    #[test]
    fn test_gate_aborts() {
        for answer in [Some(false), None] {
            let err = gate(&Fixed(answer), &pending()).unwrap_err();
            assert!(matches!(err, CliError::Aborted { .. }));
        }
    }

    #[test]
    fn test_assume_yes_passes() {
        assert!(gate(&AssumeYes, &pending()).is_ok());
    }
}
