use serde::{Deserialize, Serialize};

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    #[serde(rename = "message_delta")]
    MessageDelta(String),
}

/// The preset response for an assistant turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
    /// If set, the request fails with this message instead of streaming
    /// the events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<PresetEvent>>) -> Self {
        Self {
            events: events.into(),
            failure: None,
        }
    }

    /// Creates a `PresetResponse` that streams `reply` as a single delta.
    #[inline]
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_events([PresetEvent::MessageDelta(reply.into())])
    }

    /// Creates a `PresetResponse` whose request always fails.
    #[inline]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            events: vec![],
            failure: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response = PresetResponse::with_events([
            PresetEvent::MessageDelta("Possible ".to_string()),
            PresetEvent::MessageDelta("migraine.".to_string()),
        ]);

        let serialized = serde_json::to_string(&response).unwrap();
        assert_eq!(
            serialized,
            r#"{"events":[{"type":"message_delta","data":"Possible "},{"type":"message_delta","data":"migraine."}]}"#
        );
        let deserialized: PresetResponse =
            serde_json::from_str(&serialized).unwrap();
        assert_eq!(response, deserialized);
    }

    #[test]
    fn test_deserialize_failure() {
        let response: PresetResponse = serde_json::from_str(
            r#"{"events":[],"failure":"service unavailable"}"#,
        )
        .unwrap();
        assert_eq!(response, PresetResponse::failing("service unavailable"));
    }
}
