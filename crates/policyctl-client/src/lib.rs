//! Policy service client
//!
//! This crate talks to the platform's policy services over gRPC:
//! - **Attributes**: attribute definitions and their values
//! - **KAS registry**: Key Access Server registrations
//!
//! Callers program against the [`PolicyApi`] trait. [`GrpcPolicyClient`] is the
//! production implementation; tests substitute an in-memory fake.
//!
//! # Example
//!
//! ```rust,ignore
//! use policyctl_client::{ClientConfig, GrpcPolicyClient, PolicyApi};
//! use policyctl_core::StateFilter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .endpoint("https://policy.example.com")
//!         .token(std::env::var("POLICYCTL_TOKEN").ok())
//!         .build();
//!     let client = GrpcPolicyClient::connect(&config)?;
//!
//!     for attribute in client.list_attributes(StateFilter::Active).await? {
//!         println!("{} {}", attribute.id, attribute.name);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod api;
pub mod config;
pub mod error;
pub mod grpc;

pub use api::{
    AttributeValueUpdate, KasEntryUpdate, NewAttribute, NewAttributeValue, NewKasEntry,
    PolicyApi,
};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_ENDPOINT};
pub use error::{ClientError, Result};
pub use grpc::GrpcPolicyClient;
