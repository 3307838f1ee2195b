//! Typed access to raw flag values.
//!
//! clap collects the strings; these helpers decide whether they are usable.
//! They never touch the network, so every failure here happens before a
//! command issues its first call.

use policyctl_core::Labels;

use crate::error::{CliError, CliResult};

/// Returns the value of a required flag.
///
/// Blank values count as missing.
///
/// # Errors
///
/// Returns [`CliError::MissingFlag`] naming `name`.
pub fn required(name: &str, value: Option<&str>) -> CliResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(CliError::missing_flag(name)),
    }
}

/// Returns the value of an optional flag, or the empty string.
pub fn optional(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Returns a repeatable flag's values in order.
///
/// # Errors
///
/// Returns an argument error naming `name` when fewer than `min` values
/// were given.
pub fn string_list(name: &str, values: &[String], min: usize) -> CliResult<Vec<String>> {
    if values.len() < min {
        return Err(CliError::arguments(
            format!("Invalid --{name}"),
            format!("at least {min} value(s) required, got {}", values.len()),
        ));
    }
    Ok(values.to_vec())
}

/// Parses repeatable `--label key=value` flags.
///
/// # Errors
///
/// Returns an argument error naming `--label` for an entry without exactly
/// one `=` or with an empty key.
pub fn labels(values: &[String]) -> CliResult<Labels> {
    let raw = string_list("label", values, 0)?;
    Labels::parse(&raw).map_err(CliError::invalid_flag)
}
