use std::fmt::{self, Display};

/// The kind of transport error that occurred.
///
/// Every kind is a transport failure from the conversation's point of
/// view. The distinction only matters for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service could not be reached (connection refused, DNS, I/O).
    Unreachable,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The service answered with a non-2xx status code.
    Status(u16),
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unreachable => write!(f, "service unreachable"),
            ErrorKind::Timeout => write!(f, "request timed out"),
            ErrorKind::Status(code) => write!(f, "unexpected status {code}"),
            ErrorKind::Other => write!(f, "transport error"),
        }
    }
}
