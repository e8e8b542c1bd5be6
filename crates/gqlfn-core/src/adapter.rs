//! The Normalizer/Materializer pair each runtime mode implements.

use crate::error::HandlerError;
use crate::mode::RuntimeMode;
use crate::types::{CanonicalRequest, CanonicalResponse};

/// Converts a host-specific event into a [`CanonicalRequest`] and a
/// [`CanonicalResponse`] back into what that host expects.
///
/// Exactly one implementation is wired per process, selected from the
/// detected [`RuntimeMode`]. Implementations must produce equal canonical
/// requests for equivalent inputs so the executor never needs to know
/// which host it is running under.
pub trait Adapter: Send + Sync + 'static {
    /// The inbound event handed over by the host.
    type Event: Send;
    /// The value handed back to the host.
    type Output: Send;

    fn mode(&self) -> RuntimeMode;

    fn normalize(&self, event: Self::Event) -> Result<CanonicalRequest, HandlerError>;

    fn materialize(&self, response: CanonicalResponse) -> Self::Output;
}
