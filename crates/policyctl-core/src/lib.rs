//! # policyctl Core
//!
//! Domain types for the policyctl administration client.
//!
//! The authorization platform owns these objects; the client only carries
//! them between the command line and the policy service:
//!
//! - [`Attribute`] and [`AttributeValue`] - attribute definitions and their values
//! - [`KasRegistryEntry`] and [`PublicKey`] - registered Key Access Servers
//! - [`Labels`] and [`LabelPatch`] - metadata labels and how updates apply them
//! - [`StateFilter`] - the lifecycle filter used by list operations
//! - [`ValidationError`] - locally detected input problems
//!
//! ## Example
//!
//! ```rust
//! use policyctl_core::{LabelPatch, LabelUpdateMode, Labels, PublicKey};
//!
//! let key = PublicKey::require_from_flags("ABC123", "").unwrap();
//! assert_eq!(key.kind(), "Local");
//!
//! let patch = LabelPatch::new(
//!     Labels::parse(["owner=security"]).unwrap(),
//!     LabelUpdateMode::Replace,
//! );
//! assert!(!patch.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod attribute;
pub mod kas;
pub mod metadata;
pub mod validation;


pub use attribute::{
    Attribute, AttributeRule, AttributeValue, LifecycleState, Namespace, StateFilter,
};
pub use kas::{KasRegistryEntry, PublicKey};
pub use metadata::{LabelPatch, LabelUpdateMode, Labels, Metadata};
pub use validation::{ValidationError, ValidationErrorKind};
