//! A query provider for the advisor service's HTTP API.

#[macro_use]
extern crate tracing;

mod config;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use fin_chat_model::{
    ErrorKind, QueryProvider, QueryProviderError, QueryRequest, QueryResponse,
};
use reqwest::{Client, Response, header};

pub use config::{
    BASE_URL_ENV, HttpConfig, HttpConfigBuilder, TIMEOUT_SECS_ENV,
};

/// Error type for [`HttpQueryProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if let Some(status) = err.status() {
            ErrorKind::Status(status.as_u16())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            ErrorKind::Unreachable
        } else {
            ErrorKind::Other
        };
        Self::new(format!("{err}"), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {}

impl QueryProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Query provider speaking to the advisor service over HTTP.
#[derive(Clone, Debug)]
pub struct HttpQueryProvider {
    client: Client,
    config: Arc<HttpConfig>,
}

impl HttpQueryProvider {
    /// Creates a new `HttpQueryProvider` with the given configuration.
    #[inline]
    pub fn new(config: HttpConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Creates a new `HttpQueryProvider` sharing an existing client.
    #[inline]
    pub fn with_client(config: HttpConfig, client: Client) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl QueryProvider for HttpQueryProvider {
    type Error = Error;

    fn send_query(
        &self,
        req: &QueryRequest,
    ) -> impl Future<Output = Result<QueryResponse, Self::Error>>
    + Send
    + 'static
    {
        let url = self.config.query_url();
        let mut builder = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(req);
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        let resp_fut = builder.send();

        async move {
            debug!("posting query to {url}");
            let resp = match resp_fut.await.and_then(Response::error_for_status)
            {
                Ok(resp) => resp,
                Err(err) => return Err(Error::from_reqwest(err)),
            };

            // Here we got a successful status, the body is decoded
            // leniently from now on.
            let status = resp.status();
            let body = resp.bytes().await.map_err(Error::from_reqwest)?;
            let decoded = QueryResponse::from_body(&body);
            if decoded.advisor_response.is_none() {
                warn!(
                    "status {status} without a usable advisor_response \
                     ({} bytes)",
                    body.len()
                );
            }
            Ok(decoded)
        }
    }
}
