mod builder;

use std::sync::Arc;

use fin_chat_model::QueryRequest;
use tokio::sync::watch;
use tracing::Instrument;

pub use builder::ControllerBuilder;

use crate::conversation::ConversationState;
use crate::error::SubmitError;
use crate::query_client::QueryClient;
use crate::reply::Reply;

/// Drives the conversation: one user message in, one advisor message out.
///
/// The controller is the only writer of the [`ConversationState`]. Readers
/// take snapshots with [`state`](Controller::state) or follow changes with
/// [`subscribe`](Controller::subscribe).
///
/// Queries are not pipelined. While one is in flight, further submissions
/// are refused with [`SubmitError::Busy`].
#[derive(Clone)]
pub struct Controller {
    inner: Arc<Inner>,
}

struct Inner {
    query_client: QueryClient,
    state: watch::Sender<ConversationState>,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl Controller {
    fn from_builder(builder: ControllerBuilder) -> Self {
        let ControllerBuilder {
            query_client,
            on_idle,
        } = builder;

        let (state, _) = watch::channel(ConversationState::default());
        let inner = Inner {
            query_client,
            state,
            on_idle,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Submits a user message and starts querying the advisor.
    ///
    /// On success the user message is already in the log and the state is
    /// pending when this method returns. The advisor message is appended
    /// later, when the query resolves.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime, since the query runs
    /// as a spawned task.
    pub fn submit(&self, text: &str) -> Result<(), SubmitError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptyInput);
        }

        let mut accepted = false;
        self.inner.state.send_if_modified(|state| {
            if state.pending() {
                return false;
            }
            state.begin(text.to_owned());
            accepted = true;
            true
        });
        if !accepted {
            debug!("refused a submission while pending");
            return Err(SubmitError::Busy);
        }

        let req = QueryRequest::new(text);
        let query_client = self.inner.query_client.clone();
        let completion = Completion {
            inner: Some(Arc::clone(&self.inner)),
        };
        tokio::spawn(
            async move {
                let outcome = query_client.send_query(req).await;
                completion.finish(Reply::from_outcome(outcome));
            }
            .instrument(debug_span!("conversation cycle")),
        );
        Ok(())
    }

    /// Returns a snapshot of the conversation.
    #[inline]
    pub fn state(&self) -> ConversationState {
        self.inner.state.borrow().clone()
    }

    /// Returns a receiver notified on every change of the conversation.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.inner.state.subscribe()
    }

    /// Waits until no query is in flight.
    pub async fn wait_idle(&self) {
        let mut rx = self.inner.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        rx.wait_for(|state| !state.pending()).await.ok();
    }
}

impl Inner {
    fn complete(&self, reply: Reply) {
        let Reply {
            content,
            sidebar_text,
        } = reply;
        self.state.send_modify(|state| {
            state.finish(content, sidebar_text);
        });
        trace!("back to idle");

        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }
}

/// Returns the conversation to idle exactly once per accepted submission.
///
/// If the query task is dropped before it finishes, e.g. because the
/// provider panicked or the runtime shut down, the cycle is closed as a
/// transport failure.
struct Completion {
    inner: Option<Arc<Inner>>,
}

impl Completion {
    fn finish(mut self, reply: Reply) {
        if let Some(inner) = self.inner.take() {
            inner.complete(reply);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            warn!("query dropped before it resolved");
            inner.complete(Reply::transport_failure());
        }
    }
}
