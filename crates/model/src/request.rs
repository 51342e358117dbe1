use serde::{Deserialize, Serialize};

/// A request to be sent to the advisor service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's query text.
    pub query: String,
}

impl QueryRequest {
    /// Creates a request for the given query text.
    #[inline]
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
        }
    }
}
