use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The body of a successful response from the advisor service.
///
/// Decoding is lenient on purpose: the service is loosely typed, and a 2xx
/// response must never turn into a transport failure because of its body.
/// Fields that are absent or of an unexpected type are simply `None`, and
/// any additional fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The advisor's answer, kept raw until [`AdvisorPayload::decode`].
    #[serde(default)]
    pub advisor_response: Option<Value>,
    /// Auxiliary link text (a markdown list of search results).
    #[serde(default, deserialize_with = "string_or_none")]
    pub web_links: Option<String>,
    /// The planner output of the service. It is carried for diagnostics
    /// only and never shown to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_response: Option<Value>,
}

impl QueryResponse {
    /// Decodes a response from an arbitrary JSON value.
    ///
    /// Anything other than a JSON object yields an empty response.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Decodes a response from raw body bytes.
    ///
    /// A body that is not valid JSON yields an empty response.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::default(),
        }
    }

    /// Returns the decoded advisor payload.
    #[inline]
    pub fn advisor_payload(&self) -> AdvisorPayload {
        AdvisorPayload::decode(self.advisor_response.as_ref())
    }
}

fn string_or_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// The advisor part of a response, decoded into one of its known shapes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AdvisorPayload {
    /// A plain advisor answer.
    Text(String),
    /// The service reported an error of its own, e.g. the upstream model
    /// failed. The string is the service's human-readable message.
    BackendError(String),
    /// The field is absent, `null`, or of an unrecognized shape.
    Malformed,
}

impl AdvisorPayload {
    /// Decodes the raw `advisor_response` field.
    pub fn decode(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(text)) => Self::Text(text.clone()),
            Some(Value::Object(fields)) => match fields.get("error") {
                Some(Value::String(message)) => {
                    Self::BackendError(message.clone())
                }
                _ => Self::Malformed,
            },
            _ => Self::Malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_text() {
        let resp = QueryResponse::from_value(json!({
            "advisor_response": "Save 20%",
            "web_links": "a.com, b.com",
        }));
        assert_eq!(
            resp.advisor_payload(),
            AdvisorPayload::Text("Save 20%".to_owned())
        );
        assert_eq!(resp.web_links.as_deref(), Some("a.com, b.com"));
    }

    #[test]
    fn test_decode_backend_error() {
        let resp = QueryResponse::from_value(json!({
            "manager_response": { "websearch_needed": "no" },
            "advisor_response": { "error": "rate limited" },
        }));
        assert_eq!(
            resp.advisor_payload(),
            AdvisorPayload::BackendError("rate limited".to_owned())
        );
        assert_eq!(resp.web_links, None);
        assert!(resp.manager_response.is_some());
    }

    #[test]
    fn test_decode_malformed() {
        let bodies = [
            json!({}),
            json!({ "advisor_response": null }),
            json!({ "advisor_response": 42 }),
            json!({ "advisor_response": ["a", "b"] }),
            json!({ "advisor_response": { "error": 7 } }),
            json!({ "advisor_response": { "detail": "nope" } }),
            json!({ "response": "Goodbye!" }),
        ];
        for body in bodies {
            let resp = QueryResponse::from_value(body.clone());
            assert_eq!(
                resp.advisor_payload(),
                AdvisorPayload::Malformed,
                "body: {body}"
            );
        }
    }

    #[test]
    fn test_non_string_links_are_absent() {
        let resp = QueryResponse::from_value(json!({
            "advisor_response": "ok",
            "web_links": 12,
        }));
        assert_eq!(resp.web_links, None);
        assert_eq!(
            resp.advisor_payload(),
            AdvisorPayload::Text("ok".to_owned())
        );
    }

    #[test]
    fn test_from_body_tolerates_garbage() {
        let empty = QueryResponse::default();
        assert_eq!(QueryResponse::from_body(b"<html>oops</html>"), empty);
        assert_eq!(QueryResponse::from_body(b"\"just a string\""), empty);

        let resp =
            QueryResponse::from_body(br#"{"advisor_response":"hi","x":1}"#);
        assert_eq!(
            resp.advisor_payload(),
            AdvisorPayload::Text("hi".to_owned())
        );
    }
}
