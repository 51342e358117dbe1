use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of transport failure a preset can simulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFailure {
    Unreachable,
    Timeout,
    Status(u16),
}

/// How the fake service answers one query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    /// Answers with a 2xx status and the given raw JSON body.
    #[serde(rename = "respond")]
    Respond(Value),
    /// Fails at the transport level.
    #[serde(rename = "fail")]
    Fail(PresetFailure),
}

impl PresetOutcome {
    /// A well-formed answer with optional links.
    #[inline]
    pub fn text(advisor_response: &str, web_links: Option<&str>) -> Self {
        let mut body = serde_json::json!({
            "advisor_response": advisor_response,
        });
        if let Some(web_links) = web_links {
            body["web_links"] = Value::String(web_links.to_owned());
        }
        Self::Respond(body)
    }

    /// An answer in which the service reports its own error.
    #[inline]
    pub fn backend_error(message: &str) -> Self {
        Self::Respond(serde_json::json!({
            "advisor_response": { "error": message },
        }))
    }
}
