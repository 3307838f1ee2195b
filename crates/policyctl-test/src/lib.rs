//! # policyctl test support
//!
//! Test doubles for exercising policyctl commands without a running policy
//! service.
//!
//! - [`FakePolicyService`]: an in-memory [`PolicyApi`](policyctl_client::PolicyApi)
//!   that records every call it receives
//! - [`MockAttribute`], [`MockValue`], [`MockKasEntry`]: fluent builders for
//!   seeding it
//!
//! ## Example
//!
//! ```rust
//! use policyctl_test::{FakePolicyService, MockAttribute};
//!
//! let fake = FakePolicyService::new();
//! fake.seed_attribute(
//!     MockAttribute::new("classification")
//!         .with_id("attr-1")
//!         .with_values(["secret", "public"])
//!         .build(),
//! );
//!
//! let stored = fake.stored_attribute("attr-1").unwrap();
//! assert_eq!(stored.values.len(), 2);
//! ```

pub mod fake;
pub mod fixtures;

pub use fake::{Call, FakePolicyService};
pub use fixtures::{MockAttribute, MockKasEntry, MockValue};
