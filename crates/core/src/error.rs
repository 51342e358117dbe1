use std::error::Error;
use std::fmt::{self, Display};

/// The reason a submission was refused.
///
/// A refused submission leaves the conversation untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitError {
    /// The text is empty or only whitespace.
    EmptyInput,
    /// A previous query is still awaiting its answer.
    Busy,
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyInput => write!(f, "the message is empty"),
            SubmitError::Busy => {
                write!(f, "still waiting for the previous answer")
            }
        }
    }
}

impl Error for SubmitError {}
