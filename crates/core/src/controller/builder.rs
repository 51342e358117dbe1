use fin_chat_model::QueryProvider;

use super::Controller;
use crate::query_client::QueryClient;

/// [`Controller`] builder.
pub struct ControllerBuilder {
    pub(crate) query_client: QueryClient,
    pub(crate) on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified query provider.
    #[inline]
    pub fn with_query_provider<P: QueryProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            query_client: QueryClient::new(provider),
            on_idle: None,
        }
    }

    /// Attaches a callback to be invoked each time a query resolves and
    /// the conversation is idle again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the controller.
    #[inline]
    pub fn build(self) -> Controller {
        Controller::from_builder(self)
    }
}
