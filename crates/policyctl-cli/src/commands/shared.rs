//! Flags and helpers shared by several commands.

use clap::Args;
use policyctl_core::{LabelPatch, LabelUpdateMode, StateFilter};

use crate::error::{CliError, CliResult};
use crate::flags;

/// Labels for create commands.
#[derive(Debug, Default, Args)]
pub struct LabelArgs {
    /// Label in key=value form (repeatable)
    #[arg(long = "label", short = 'l', value_name = "KEY=VALUE")]
    pub labels: Vec<String>,
}

/// Labels for update commands.
#[derive(Debug, Default, Args)]
pub struct LabelUpdateArgs {
    /// Label in key=value form (repeatable)
    #[arg(long = "label", short = 'l', value_name = "KEY=VALUE")]
    pub labels: Vec<String>,

    /// Replace existing labels instead of merging into them
    #[arg(long)]
    pub force_replace_labels: bool,
}

impl LabelUpdateArgs {
    /// Builds the patch, or `None` if no labels were given.
    pub fn patch(&self) -> CliResult<Option<LabelPatch>> {
        let labels = flags::labels(&self.labels)?;
        if labels.is_empty() {
            return Ok(None);
        }
        Ok(Some(LabelPatch::new(
            labels,
            LabelUpdateMode::from_replace_flag(self.force_replace_labels),
        )))
    }

    /// Builds the patch, requiring at least one label.
    pub fn require_patch(&self) -> CliResult<LabelPatch> {
        flags::string_list("label", &self.labels, 1)?;
        self.patch()?
            .ok_or_else(|| CliError::arguments("Invalid --label", "at least one label is required"))
    }
}

/// Parses `--state`, defaulting to active.
pub fn state_filter(value: Option<&str>) -> CliResult<StateFilter> {
    let raw = flags::optional(value);
    if raw.trim().is_empty() {
        return Ok(StateFilter::default());
    }
    raw.parse().map_err(CliError::invalid_flag)
}
