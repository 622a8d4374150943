use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Inbound request envelope posted by the speech platform
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub session: Session,
    pub request: SkillRequest,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub new: bool,
}

/// Request body, tagged by `type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SkillRequest {
    #[serde(rename = "LaunchRequest")]
    Launch(LifecycleRequest),
    #[serde(rename = "SessionStartedRequest")]
    SessionStarted(LifecycleRequest),
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded(SessionEndedRequest),
    #[serde(rename = "IntentRequest")]
    Intent(IntentRequest),
}

impl SkillRequest {
    pub fn request_id(&self) -> &str {
        match self {
            SkillRequest::Launch(r) | SkillRequest::SessionStarted(r) => &r.request_id,
            SkillRequest::SessionEnded(r) => &r.request_id,
            SkillRequest::Intent(r) => &r.request_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRequest {
    pub request_id: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    pub request_id: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub request_id: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub intent: Intent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Value of slot `name`, if the user filled it.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intent_request() {
        let body = r#"{
            "version": "1.0",
            "session": {"sessionId": "SessionId.abc", "new": true},
            "request": {
                "type": "IntentRequest",
                "requestId": "EdwRequestId.1",
                "timestamp": "2016-06-20T17:12:34Z",
                "intent": {
                    "name": "OneshotClaimsIntent",
                    "slots": {
                        "Item": {"name": "Item", "value": "Lionel Messi"},
                        "Relationship": {"name": "Relationship", "value": "team"}
                    }
                }
            }
        }"#;

        let envelope: RequestEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.session.session_id, "SessionId.abc");
        assert!(envelope.session.new);
        assert_eq!(envelope.request.request_id(), "EdwRequestId.1");
        match envelope.request {
            SkillRequest::Intent(request) => {
                assert!(request.timestamp.is_some());
                assert_eq!(request.intent.name, "OneshotClaimsIntent");
                assert_eq!(request.intent.slot_value("Item"), Some("Lionel Messi"));
                assert_eq!(request.intent.slot_value("Relationship"), Some("team"));
            }
            other => panic!("expected intent request, got {:?}", other),
        }
    }

    #[test]
    fn test_unfilled_slot_has_no_value() {
        let intent: Intent = serde_json::from_str(
            r#"{"name":"OneshotClaimsIntent","slots":{"Item":{"name":"Item"},"Relationship":{"name":"Relationship","value":" "}}}"#,
        )
        .unwrap();
        assert_eq!(intent.slot_value("Item"), None);
        assert_eq!(intent.slot_value("Relationship"), None);
        assert_eq!(intent.slot_value("Missing"), None);
    }

    #[test]
    fn test_parse_lifecycle_requests() {
        let launch: RequestEnvelope =
            serde_json::from_str(r#"{"request":{"type":"LaunchRequest","requestId":"r1"}}"#).unwrap();
        assert!(matches!(launch.request, SkillRequest::Launch(_)));
        assert_eq!(launch.version, "1.0");

        let ended: RequestEnvelope = serde_json::from_str(
            r#"{"request":{"type":"SessionEndedRequest","requestId":"r2","reason":"USER_INITIATED"}}"#,
        )
        .unwrap();
        match ended.request {
            SkillRequest::SessionEnded(r) => assert_eq!(r.reason.as_deref(), Some("USER_INITIATED")),
            other => panic!("expected session ended, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_request_type_rejected() {
        let result = serde_json::from_str::<RequestEnvelope>(
            r#"{"request":{"type":"AudioPlayer.PlaybackStarted","requestId":"r3"}}"#,
        );
        assert!(result.is_err());
    }
}
