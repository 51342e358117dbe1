//! A local fake advisor service for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fin_chat_model::{
    ErrorKind, QueryProvider, QueryProviderError, QueryRequest, QueryResponse,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl QueryProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Shared {
    script: VecDeque<PresetOutcome>,
    received: Vec<String>,
}

/// A local fake advisor service for testing purpose.
///
/// Before sending queries, you need to setup the script, which is how the
/// service should answer each query, in order. Every query consumes one
/// outcome. If there are no enough outcomes in the script, an error will
/// be returned.
///
/// Clones share the same script and the same record of received queries,
/// so a test can keep a clone around for assertions after handing the
/// provider over.
#[derive(Clone, Default)]
pub struct TestQueryProvider {
    shared: Arc<Mutex<Shared>>,
    delay: Option<Duration>,
}

impl TestQueryProvider {
    /// Appends an outcome to the script.
    #[inline]
    pub fn add_outcome(&mut self, outcome: PresetOutcome) {
        self.lock().script.push_back(outcome);
    }

    /// Delays every answer by `duration`.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the query texts received so far.
    #[inline]
    pub fn received_queries(&self) -> Vec<String> {
        self.lock().received.clone()
    }

    /// Returns how many outcomes are left in the script.
    #[inline]
    pub fn remaining_outcomes(&self) -> usize {
        self.lock().script.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        // A poisoned lock only means another test thread panicked.
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Debug for TestQueryProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestQueryProvider")
            .field("remaining_outcomes", &self.remaining_outcomes())
            .field("delay", &self.delay)
            .finish()
    }
}

impl QueryProvider for TestQueryProvider {
    type Error = crate::Error;

    fn send_query(
        &self,
        req: &QueryRequest,
    ) -> impl Future<Output = Result<QueryResponse, Self::Error>>
    + Send
    + 'static
    {
        let outcome = {
            let mut shared = self.lock();
            shared.received.push(req.query.clone());
            shared.script.pop_front()
        };
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;
            match outcome {
                Some(PresetOutcome::Respond(body)) => {
                    Ok(QueryResponse::from_value(body))
                }
                Some(PresetOutcome::Fail(failure)) => Err(Error {
                    message: "simulated failure",
                    kind: match failure {
                        PresetFailure::Unreachable => ErrorKind::Unreachable,
                        PresetFailure::Timeout => ErrorKind::Timeout,
                        PresetFailure::Status(code) => ErrorKind::Status(code),
                    },
                }),
                None => Err(Error {
                    message: "no enough outcomes",
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}
