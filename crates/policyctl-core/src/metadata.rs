//! Metadata labels attached to every policy object.
//!
//! Labels are user-defined `key=value` annotations. The service stores them
//! as a map; the client keeps them sorted by key so output is stable.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Metadata returned with an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// User-defined labels.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

impl Metadata {
    /// Creates metadata carrying the given labels.
    #[must_use]
    pub const fn with_labels(labels: Labels) -> Self {
        Self { labels }
    }
}

/// Key/value labels, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    /// Creates an empty label set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Parses labels from `key=value` strings.
    ///
    /// Each entry must contain exactly one `=` with a non-empty key. When a
    /// key repeats, the last value wins.
    ///
    /// # Errors
    ///
    /// Returns a format [`ValidationError`] for the `label` field naming the
    /// first malformed entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use policyctl_core::Labels;
    ///
    /// let labels = Labels::parse(["owner=security", "tier=gold"]).unwrap();
    /// assert_eq!(labels.get("owner"), Some("security"));
    ///
    /// assert!(Labels::parse(["missing-separator"]).is_err());
    /// ```
    pub fn parse<I, S>(raw: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels = Self::new();
        for entry in raw {
            let entry = entry.as_ref();
            let (key, value) = split_label(entry).ok_or_else(|| {
                ValidationError::format(
                    "label",
                    format!("invalid label '{entry}', expected key=value"),
                )
            })?;
            labels.insert(key, value);
        }
        Ok(labels)
    }

    /// Inserts or replaces a label.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value of a label.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns true if there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over labels in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn split_label(entry: &str) -> Option<(&str, &str)> {
    let (key, value) = entry.split_once('=')?;
    if key.trim().is_empty() || value.contains('=') {
        return None;
    }
    Some((key, value))
}

impl From<BTreeMap<String, String>> for Labels {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<Labels> for BTreeMap<String, String> {
    fn from(labels: Labels) -> Self {
        labels.0
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// How an update treats the labels already stored on an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelUpdateMode {
    /// Merge the supplied labels into the existing ones.
    #[default]
    Extend,
    /// Drop existing labels and keep only the supplied ones.
    Replace,
}

impl LabelUpdateMode {
    /// Selects the mode from the `--force-replace-labels` switch.
    #[must_use]
    pub const fn from_replace_flag(replace: bool) -> Self {
        if replace {
            Self::Replace
        } else {
            Self::Extend
        }
    }
}

/// Labels to apply in an update together with how to apply them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPatch {
    /// Labels supplied by the caller.
    pub labels: Labels,
    /// Merge or replace.
    pub mode: LabelUpdateMode,
}

impl LabelPatch {
    /// Creates a patch.
    #[must_use]
    pub const fn new(labels: Labels, mode: LabelUpdateMode) -> Self {
        Self { labels, mode }
    }

    /// Returns true if the patch carries no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Applies the patch to stored labels.
    pub fn apply_to(&self, labels: &mut Labels) {
        match self.mode {
            LabelUpdateMode::Extend => {
                for (key, value) in self.labels.iter() {
                    labels.insert(key, value);
                }
            }
            LabelUpdateMode::Replace => labels.clone_from(&self.labels),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_parse_labels() {
        let labels = Labels::parse(["b=2", "a=1"]).unwrap();
        let pairs: Vec<_> = labels.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_parse_allows_empty_value() {
        let labels = Labels::parse(["flag="]).unwrap();
        assert_eq!(labels.get("flag"), Some(""));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let labels = Labels::parse(["env=dev", "env=prod"]).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get("env"), Some("prod"));
    }

    #[test]
    fn test_parse_rejects_bad_entries() {
        for bad in ["novalue", "=value", "a=b=c", ""] {
            let err = Labels::parse([bad]).unwrap_err();
            assert_eq!(err.field, "label");
            assert_eq!(err.kind, ValidationErrorKind::Format);
        }
    }

    #[test]
    fn test_labels_display() {
        let labels = Labels::parse(["x=1", "y=2"]).unwrap();
        assert_eq!(labels.to_string(), "x=1, y=2");
    }

    #[test]
    fn test_labels_serialize_as_map() {
        let labels = Labels::parse(["owner=sec"]).unwrap();
        let json = serde_json::to_string(&Metadata::with_labels(labels)).unwrap();
        assert_eq!(json, r#"{"labels":{"owner":"sec"}}"#);
    }

    #[test]
    fn test_empty_metadata_omits_labels() {
        let json = serde_json::to_string(&Metadata::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_update_mode_from_flag() {
        assert_eq!(LabelUpdateMode::from_replace_flag(true), LabelUpdateMode::Replace);
        assert_eq!(LabelUpdateMode::from_replace_flag(false), LabelUpdateMode::Extend);
        assert_eq!(LabelUpdateMode::default(), LabelUpdateMode::Extend);
    }

    #[test]
    fn test_patch_extend_merges() {
        let mut stored = Labels::parse(["team=core", "env=dev"]).unwrap();
        let patch = LabelPatch::new(Labels::parse(["env=prod"]).unwrap(), LabelUpdateMode::Extend);
        patch.apply_to(&mut stored);
        assert_eq!(stored.get("team"), Some("core"));
        assert_eq!(stored.get("env"), Some("prod"));
    }

    #[test]
    fn test_patch_replace_drops_existing() {
        let mut stored = Labels::parse(["team=core"]).unwrap();
        let patch = LabelPatch::new(Labels::parse(["env=prod"]).unwrap(), LabelUpdateMode::Replace);
        patch.apply_to(&mut stored);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get("team"), None);
    }
}
