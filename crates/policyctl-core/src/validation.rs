//! Validation errors for values supplied by the caller.
//!
//! Every locally detected problem (a malformed label, conflicting public key
//! flags, an unknown rule name) is reported as a [`ValidationError`] naming
//! the offending field, so the CLI can point the user at the exact flag.

use std::fmt;

/// Errors that can occur during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field or flag that failed validation.
    pub field: String,
    /// A human-readable description of the validation failure.
    pub message: String,
    /// The kind of validation that failed.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use policyctl_core::ValidationError;
    /// use policyctl_core::validation::ValidationErrorKind;
    ///
    /// let error = ValidationError::new(
    ///     "label",
    ///     "expected key=value",
    ///     ValidationErrorKind::Format,
    /// );
    /// assert_eq!(error.field, "label");
    /// ```
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: ValidationErrorKind,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    /// Creates a validation error for a required value that is missing.
    pub fn required(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ValidationErrorKind::Required)
    }

    /// Creates a validation error for an invalid format.
    pub fn format(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ValidationErrorKind::Format)
    }

    /// Creates a validation error for a constraint violation.
    pub fn constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ValidationErrorKind::Constraint)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The category of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// A required field was not provided.
    Required,
    /// The value format is invalid.
    Format,
    /// Two or more values contradict each other.
    Constraint,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Format => write!(f, "format"),
            Self::Constraint => write!(f, "constraint"),
        }
    }
}
