//! gqlfn-trigger — local HTTP trigger for gqlfn.
//!
//! Bridges inbound HTTP requests to the GraphQL pipeline when the process
//! runs in LOCAL_HTTP mode.
//!
//! # Architecture
//!
//! ```text
//! HTTP client
//!   │
//!   ▼
//! hyper server (one task per connection)
//!   │
//!   ├── Buffer body (size-limited) → http::Request<Bytes>
//!   ├── LocalHttpAdapter::normalize → CanonicalRequest
//!   ├── Pipeline executes the operation
//!   ├── LocalHttpAdapter::materialize → hyper::Response
//!   │
//!   ▼
//! HTTP response
//! ```

pub mod convert;
pub mod handler;

pub use convert::LocalHttpAdapter;
pub use handler::{DEFAULT_MAX_BODY_BYTES, HttpTrigger};
