//! gRPC transport for the policy services.
//!
//! The message types in [`types`] are declared by hand; [`GrpcPolicyClient`]
//! drives them through a plain `tonic::client::Grpc` channel.

mod client;
mod convert;
pub mod types;

pub use client::GrpcPolicyClient;
