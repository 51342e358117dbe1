use std::pin::Pin;
use std::sync::Arc;

use fin_chat_model::{
    QueryProvider, QueryProviderError, QueryRequest, QueryResponse,
};
use tracing::Instrument;

pub(crate) type SendQueryResult =
    Result<QueryResponse, Box<dyn QueryProviderError>>;
type BoxedSendQueryFuture =
    Pin<Box<dyn Future<Output = SendQueryResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(QueryRequest) -> BoxedSendQueryFuture + Send + Sync>;

/// A wrapper around a query provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct QueryClient {
    handler_fn: HandlerFn,
}

impl QueryClient {
    #[inline]
    pub fn new<P: QueryProvider + 'static>(provider: P) -> Self {
        // Erase `P` so the controller doesn't need a generic parameter.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_query(&req);
            Box::pin(
                async move {
                    trace!("sending query: {:?}", req.query);
                    match fut.await {
                        Ok(resp) => {
                            trace!("got a response: {resp:?}");
                            Ok(resp)
                        }
                        Err(err) => {
                            debug!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn QueryProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("query client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends one query and returns the decoded response.
    #[inline]
    pub async fn send_query(&self, req: QueryRequest) -> SendQueryResult {
        (self.handler_fn)(req).await
    }
}

#[cfg(test)]
mod tests {
    use fin_chat_model::{AdvisorPayload, ErrorKind};
    use fin_chat_test_provider::{
        PresetFailure, PresetOutcome, TestQueryProvider,
    };

    use super::*;

    #[tokio::test]
    async fn test_send_query() {
        let mut provider = TestQueryProvider::default();
        for _ in 0..3 {
            provider.add_outcome(PresetOutcome::text("How are you?", None));
        }
        let observer = provider.clone();
        let client = QueryClient::new(provider);

        for _ in 0..3 {
            let resp =
                client.send_query(QueryRequest::new("Hi")).await.unwrap();
            assert_eq!(
                resp.advisor_payload(),
                AdvisorPayload::Text("How are you?".to_owned())
            );
        }
        assert_eq!(observer.received_queries().len(), 3);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let mut provider = TestQueryProvider::default();
        provider.add_outcome(PresetOutcome::Fail(PresetFailure::Timeout));
        let client = QueryClient::new(provider);
        let err = client
            .send_query(QueryRequest::new("Hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }
}
