//! gqlfn-core — transport-agnostic GraphQL request handling.
//!
//! One GraphQL executor serves two very different hosts: a local HTTP
//! listener and a serverless function-invocation runtime. This crate owns
//! the pieces both hosts share.
//!
//! # Architecture
//!
//! ```text
//! inbound event (hyper request | invocation payload)
//!   │
//!   ▼
//! Adapter::normalize      → CanonicalRequest
//!   │
//!   ├── GraphQLOperation::from_request
//!   ├── Executor::execute
//!   │
//!   ▼
//! Adapter::materialize    ← CanonicalResponse
//!   │
//!   ▼
//! outbound event (hyper response | invocation response)
//! ```
//!
//! The active adapter is chosen once per process from [`RuntimeMode`].

pub mod adapter;
pub mod error;
pub mod executor;
pub mod mode;
pub mod pipeline;
pub mod query;
pub mod types;

pub use adapter::Adapter;
pub use error::{ExecutorFailure, HandlerError, StartupError};
pub use executor::{BoxFuture, Executor, GraphQLOperation};
pub use mode::RuntimeMode;
pub use pipeline::{DEFAULT_GRAPHQL_PATH, Pipeline};
pub use types::*;
