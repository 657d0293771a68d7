//! Request execution with deadlines, bounded retries, and outcome
//! classification.
//!
//! The executor issues one logical call at a time: it consults the
//! circuit breaker for admission, enforces a per-attempt deadline with
//! active cancellation, retries transport-level failures with a linear
//! backoff, and classifies every outcome into a [`SearchError`]
//! variant. The boundary to the network is the [`Transport`] trait,
//! implemented by [`HttpTransport`] in production and [`MockTransport`]
//! in tests.
//!
//! [`SearchError`]: crate::core::SearchError

mod mock;
mod request;
mod retry;
mod transport;

pub use mock::MockTransport;
pub use request::RequestExecutor;
pub use retry::RetryConfig;
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport, TransportFailure};
