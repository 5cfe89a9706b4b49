// ABOUTME: WebSocket message type definitions and serialization
// ABOUTME: Outbound voice_start plus a lenient reader for inbound "type" fields

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages the probe sends to the voice WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Announce the intent to start transmitting on a module
    #[serde(rename = "voice_start")]
    VoiceStart(VoiceStart),
}

/// Body of a `voice_start` message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceStart {
    /// Module letter, e.g. `A`
    pub module: String,
    /// Callsign of the transmitting station
    pub callsign: String,
}

impl ClientMessage {
    /// The fixed message the WebSocket probe sends right after connecting
    pub fn probe_voice_start() -> Self {
        ClientMessage::VoiceStart(VoiceStart {
            module: "A".to_string(),
            callsign: "TEST".to_string(),
        })
    }
}

/// Parse `text` as JSON and pull out its `type` field.
///
/// Returns `None` when the text is not JSON. `Some(None)` means valid JSON
/// without a string `type` (including arrays and scalars).
pub fn message_type(text: &str) -> Option<Option<String>> {
    let value: Value = serde_json::from_str(text).ok()?;
    Some(value.get("type").and_then(Value::as_str).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_start_wire_format() {
        let json = serde_json::to_string(&ClientMessage::probe_voice_start()).unwrap();
        assert_eq!(json, r#"{"type":"voice_start","module":"A","callsign":"TEST"}"#);
    }

    #[test]
    fn message_type_variants() {
        assert_eq!(
            message_type(r#"{"type":"voice_ack","ok":true}"#),
            Some(Some("voice_ack".to_string()))
        );
        assert_eq!(message_type(r#"{"ok":true}"#), Some(None));
        assert_eq!(message_type(r#"{"type":7}"#), Some(None));
        assert_eq!(message_type("[1,2]"), Some(None));
        assert_eq!(message_type("[5]"), Some(None));
        assert_eq!(message_type("42"), Some(None));
        assert_eq!(message_type("not json {"), None);
    }
}
