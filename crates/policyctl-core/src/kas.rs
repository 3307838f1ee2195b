//! Key Access Server registry entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;
use crate::validation::ValidationError;

/// Field name used in public key validation errors.
const PUBLIC_KEY_FIELD: &str = "public-key";

/// A registered Key Access Server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KasRegistryEntry {
    /// Service-assigned identifier.
    pub id: String,
    /// Address of the key access server.
    pub uri: String,
    /// The server's public key, if the service returned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<PublicKey>,
    /// Labels and other metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl KasRegistryEntry {
    /// Returns the display name of the key location (`Local`, `Remote` or `None`).
    #[must_use]
    pub fn key_kind(&self) -> &'static str {
        self.public_key.as_ref().map_or("None", PublicKey::kind)
    }

    /// Returns the key material or reference, empty if there is no key.
    #[must_use]
    pub fn key_value(&self) -> &str {
        self.public_key.as_ref().map_or("", PublicKey::value)
    }
}

/// A KAS public key: either the key material itself or a URI to fetch it from.
///
/// Exactly one variant exists per entry. Use [`PublicKey::from_flags`] or
/// [`PublicKey::require_from_flags`] to build one from the two mutually
/// exclusive CLI inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicKey {
    /// Key material stored in the registry.
    Local(String),
    /// Reference URI where the key is published.
    Remote(String),
}

impl PublicKey {
    /// Builds an optional key from the local and remote inputs.
    ///
    /// Empty strings count as absent. Returns `Ok(None)` when neither is set.
    ///
    /// # Errors
    ///
    /// Returns a constraint error when both are set.
    ///
    /// # Examples
    ///
    /// ```
    /// use policyctl_core::PublicKey;
    ///
    /// let key = PublicKey::from_flags("ABC123", "").unwrap();
    /// assert_eq!(key, Some(PublicKey::Local("ABC123".to_string())));
    ///
    /// assert_eq!(PublicKey::from_flags("", "").unwrap(), None);
    /// assert!(PublicKey::from_flags("ABC123", "https://kas/key").is_err());
    /// ```
    pub fn from_flags(local: &str, remote: &str) -> Result<Option<Self>, ValidationError> {
        match (local.is_empty(), remote.is_empty()) {
            (false, false) => Err(ValidationError::constraint(
                PUBLIC_KEY_FIELD,
                "Only one public key is allowed. Please pass either a local or remote public key but not both",
            )),
            (false, true) => Ok(Some(Self::Local(local.to_string()))),
            (true, false) => Ok(Some(Self::Remote(remote.to_string()))),
            (true, true) => Ok(None),
        }
    }

    /// Builds a key from the local and remote inputs, requiring exactly one.
    ///
    /// # Errors
    ///
    /// Returns a constraint error when both are set and a required error
    /// when neither is.
    pub fn require_from_flags(local: &str, remote: &str) -> Result<Self, ValidationError> {
        Self::from_flags(local, remote)?.ok_or_else(|| {
            ValidationError::required(
                PUBLIC_KEY_FIELD,
                "A public key is required. Please pass either a local or remote public key",
            )
        })
    }

    /// Returns `Local` or `Remote`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "Local",
            Self::Remote(_) => "Remote",
        }
    }

    /// Returns the key material or reference URI.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Local(v) | Self::Remote(v) => v,
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value(), self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_from_flags_local() {
        let key = PublicKey::from_flags("ABC123", "").unwrap().unwrap();
        assert_eq!(key.kind(), "Local");
        assert_eq!(key.value(), "ABC123");
    }

    #[test]
    fn test_from_flags_remote() {
        let key = PublicKey::from_flags("", "https://kas.example/key")
            .unwrap()
            .unwrap();
        assert_eq!(key, PublicKey::Remote("https://kas.example/key".to_string()));
    }

    #[test]
    fn test_from_flags_both_is_conflict() {
        let err = PublicKey::from_flags("a", "b").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Constraint);
        assert!(err.message.contains("Only one public key"));
    }

    #[test]
    fn test_require_from_flags_neither() {
        let err = PublicKey::require_from_flags("", "").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Required);
        assert!(err.message.contains("A public key is required"));
    }

    #[test]
    fn test_entry_without_key() {
        let entry = KasRegistryEntry {
            id: "k1".to_string(),
            uri: "https://kas.example".to_string(),
            public_key: None,
            metadata: Metadata::default(),
        };
        assert_eq!(entry.key_kind(), "None");
        assert_eq!(entry.key_value(), "");
    }

    #[test]
    fn test_public_key_serializes_tagged() {
        let json = serde_json::to_string(&PublicKey::Local("ABC".to_string())).unwrap();
        assert_eq!(json, r#"{"local":"ABC"}"#);
    }
}
