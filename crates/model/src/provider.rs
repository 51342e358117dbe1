use std::error::Error;

use crate::error::ErrorKind;
use crate::request::QueryRequest;
use crate::response::QueryResponse;

/// The error type for a query provider.
pub trait QueryProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that forwards a user query to the advisor service and returns
/// the decoded response body.
///
/// Once the provider is created, it should behave like a stateless object.
/// Each call to [`send_query`](QueryProvider::send_query) must issue
/// exactly one outbound request, and implementations must not retry.
pub trait QueryProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: QueryProviderError;

    /// Sends a query to the advisor service.
    ///
    /// A successful transport with an unexpected body is still `Ok`; the
    /// shape of the body is judged later by [`AdvisorPayload::decode`].
    ///
    /// [`AdvisorPayload::decode`]: crate::AdvisorPayload::decode
    fn send_query(
        &self,
        req: &QueryRequest,
    ) -> impl Future<Output = Result<QueryResponse, Self::Error>>
    + Send
    + 'static;
}
