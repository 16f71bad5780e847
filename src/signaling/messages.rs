//! Wire messages exchanged over the signaling WebSocket

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::TurnConfig;

/// Inbound signaling frame. Decoding is deliberately loose: a missing or
/// mis-typed field yields an empty string / JSON null that is forwarded
/// as-is. Only a frame that is not a JSON object fails to decode.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientMessage {
    #[serde(rename = "type", default, deserialize_with = "lossy_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub to: String,
    #[serde(default)]
    pub sdp: Value,
    #[serde(default)]
    pub candidate: Value,
}

/// Accepts any JSON value where a string is expected; a non-string
/// collapses to the empty string instead of failing the whole frame.
fn lossy_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

/// Roster entry sent to the teacher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentInfo {
    pub id: String,
    pub name: String,
    pub channel: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    Connected,
    Disconnected,
}

/// Outbound signaling frame. SDP and ICE payloads stay opaque `Value`s;
/// the relay never interprets them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Config {
        turn: TurnConfig,
    },
    ConnectedStudents {
        students: Vec<StudentInfo>,
    },
    StudentUpdate {
        action: UpdateAction,
        id: String,
        name: String,
        channel: String,
    },
    RemoveFromRaisedHands {
        id: String,
    },
    RaiseHand {
        id: String,
        name: String,
        channel: String,
    },
    Offer {
        from: String,
        sdp: Value,
    },
    Answer {
        sdp: Value,
    },
    Ice {
        candidate: Value,
        from: String,
    },
    Allowed,
    Mute,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inbound_missing_fields_default_to_empty() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"offer"}"#).unwrap();
        assert_eq!(msg.kind, "offer");
        assert_eq!(msg.to, "");
        assert_eq!(msg.sdp, Value::Null);
        assert_eq!(msg.candidate, Value::Null);
    }

    #[test]
    fn inbound_missing_type_is_empty_string() {
        let msg: ClientMessage = serde_json::from_str(r#"{"to":"s1"}"#).unwrap();
        assert_eq!(msg.kind, "");
        assert_eq!(msg.to, "s1");
    }

    #[test]
    fn inbound_mistyped_to_collapses_to_empty() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"answer","to":5,"sdp":"Y"}"#).unwrap();
        assert_eq!(msg.kind, "answer");
        assert_eq!(msg.to, "");
        assert_eq!(msg.sdp, json!("Y"));
    }

    #[test]
    fn inbound_mistyped_type_collapses_to_empty() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":5,"to":"s1"}"#).unwrap();
        assert_eq!(msg.kind, "");
        assert_eq!(msg.to, "s1");
    }

    #[test]
    fn inbound_non_object_is_a_decode_error() {
        assert!(serde_json::from_str::<ClientMessage>("[1,2]").is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn outbound_unit_variants_carry_only_type() {
        let v = serde_json::to_value(&ServerMessage::Allowed).unwrap();
        assert_eq!(v, json!({"type": "allowed"}));
        let v = serde_json::to_value(&ServerMessage::Mute).unwrap();
        assert_eq!(v, json!({"type": "mute"}));
    }

    #[test]
    fn outbound_tagged_shapes_match_wire_format() {
        let v = serde_json::to_value(&ServerMessage::StudentUpdate {
            action: UpdateAction::Disconnected,
            id: "s1".into(),
            name: "Ann".into(),
            channel: "math".into(),
        })
        .unwrap();
        assert_eq!(
            v,
            json!({
                "type": "student_update",
                "action": "disconnected",
                "id": "s1",
                "name": "Ann",
                "channel": "math",
            })
        );

        let v = serde_json::to_value(&ServerMessage::Offer {
            from: "s1".into(),
            sdp: json!("X"),
        })
        .unwrap();
        assert_eq!(v, json!({"type": "offer", "from": "s1", "sdp": "X"}));
    }
}
