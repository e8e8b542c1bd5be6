//! gqlfn-invoke — function-invocation adapter for gqlfn.
//!
//! When the process is launched by a function-invocation host, each unit of
//! work arrives as a structured JSON payload and the answer is returned as a
//! structured value instead of being written to a socket.
//!
//! ```text
//! dispatcher ──payload──▶ InvocationAdapter::normalize ──▶ Pipeline
//!                                                            │
//! dispatcher ◀─response── InvocationAdapter::materialize ◀───┘
//! ```

pub mod convert;
pub mod payload;
pub mod runtime;

pub use convert::InvocationAdapter;
pub use payload::{InvocationPayload, InvocationResponse};
pub use runtime::run;
