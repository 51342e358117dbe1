//! Turning the outcome of a query into what the advisor says.
//!
//! Every outcome, including transport failures, becomes exactly one
//! non-empty advisor message plus the new sidebar text.

use fin_chat_model::{AdvisorPayload, QueryProviderError, QueryResponse};

/// Shown when the service answered, but not in a shape we understand.
pub const FALLBACK_ADVISOR_MESSAGE: &str =
    "I apologize, but I encountered an error processing your request.";

/// Shown when the service could not be reached at all.
pub const TRANSPORT_ERROR_MESSAGE: &str = "I apologize, but I encountered an \
     error connecting to the server. Please make sure the advisor service is \
     reachable and try again.";

/// Returns the advisor message text for a decoded payload.
pub fn advisor_content(payload: &AdvisorPayload) -> String {
    match payload {
        AdvisorPayload::Text(text) if !text.is_empty() => text.clone(),
        AdvisorPayload::BackendError(message) => format!("Error: {message}"),
        AdvisorPayload::Text(_) | AdvisorPayload::Malformed => {
            FALLBACK_ADVISOR_MESSAGE.to_owned()
        }
    }
}

/// What one completed query contributes to the conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    /// The advisor message text. Never empty.
    pub content: String,
    /// The new sidebar text.
    pub sidebar_text: String,
}

impl Reply {
    /// Builds the reply for a query outcome.
    pub fn from_outcome(
        outcome: Result<QueryResponse, Box<dyn QueryProviderError>>,
    ) -> Self {
        match outcome {
            Ok(resp) => {
                let payload = resp.advisor_payload();
                match &payload {
                    AdvisorPayload::BackendError(message) => {
                        info!("service reported an error: {message}");
                    }
                    AdvisorPayload::Malformed => {
                        warn!("unrecognized advisor_response, using fallback");
                    }
                    AdvisorPayload::Text(_) => {}
                }
                Self {
                    content: advisor_content(&payload),
                    sidebar_text: resp.web_links.unwrap_or_default(),
                }
            }
            Err(err) => {
                warn!("query failed ({:?}): {err}", err.kind());
                Self::transport_failure()
            }
        }
    }

    /// The reply used when the service could not be reached.
    #[inline]
    pub fn transport_failure() -> Self {
        Self {
            content: TRANSPORT_ERROR_MESSAGE.to_owned(),
            sidebar_text: String::new(),
        }
    }
}
