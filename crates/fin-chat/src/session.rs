use fin_chat_core::{
    ConversationState, Controller, ControllerBuilder, SubmitError,
};
use fin_chat_http_provider::{HttpConfig, HttpQueryProvider};
use fin_chat_model::QueryProvider;
use tokio::sync::watch;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    controller_builder: ControllerBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified query provider.
    pub fn with_query_provider<P: QueryProvider + 'static>(
        provider: P,
    ) -> Self {
        let controller_builder =
            ControllerBuilder::with_query_provider(provider);
        Self { controller_builder }
    }

    /// Creates a session builder talking to the advisor service over HTTP,
    /// configured from the environment.
    pub fn from_env() -> Self {
        let config = HttpConfig::from_env();
        info!("advisor service at {}", config.base_url());
        Self::with_query_provider(HttpQueryProvider::new(config))
    }

    /// Attaches a callback to be invoked when an answer has arrived and the
    /// session is ready for the next message.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.controller_builder = self.controller_builder.on_idle(on_idle);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            controller: self.controller_builder.build(),
        }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session is basically a wrapper around [`Controller`], and it must be
/// used from within a Tokio runtime.
#[derive(Clone)]
pub struct Session {
    controller: Controller,
}

impl Session {
    /// Sends a message to the session.
    #[inline]
    pub fn send_message(&self, message: &str) -> Result<(), SubmitError> {
        self.controller.submit(message)
    }

    /// Returns a snapshot of the conversation.
    #[inline]
    pub fn state(&self) -> ConversationState {
        self.controller.state()
    }

    /// Returns a receiver notified on every change of the conversation.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.controller.subscribe()
    }

    /// Waits until the pending message, if any, has been answered.
    #[inline]
    pub async fn wait_idle(&self) {
        self.controller.wait_idle().await;
    }
}
