use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Environment variable overriding the service base URL.
pub const BASE_URL_ENV: &str = "FIN_CHAT_BASE_URL";
/// Environment variable setting a request timeout, in seconds.
pub const TIMEOUT_SECS_ENV: &str = "FIN_CHAT_TIMEOUT_SECS";

/// Builder for [`HttpConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HttpConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpConfigBuilder {
    /// Creates a builder with every option unset.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets a timeout for each request. Without one, the transport
    /// default applies.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        HttpConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
        }
    }
}

/// Configuration for the HTTP provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpConfig {
    pub(crate) base_url: String,
    pub(crate) timeout: Option<Duration>,
}

impl HttpConfig {
    /// Reads the configuration from `FIN_CHAT_BASE_URL` and
    /// `FIN_CHAT_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        let mut builder = HttpConfigBuilder::new();
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            builder = builder.with_base_url(base_url);
        }
        if let Ok(secs) = env::var(TIMEOUT_SECS_ENV) {
            match parse_timeout(&secs) {
                Some(timeout) => builder = builder.with_timeout(timeout),
                None => warn!(
                    "ignoring invalid {TIMEOUT_SECS_ENV} value: {secs:?}"
                ),
            }
        }
        builder.build()
    }

    /// Returns the base URL, without a trailing slash.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout, if any.
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[inline]
    pub(crate) fn query_url(&self) -> String {
        format!("{}{}", self.base_url, "/query")
    }
}

fn parse_timeout(secs: &str) -> Option<Duration> {
    let secs: f64 = secs.trim().parse().ok()?;
    if secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}
