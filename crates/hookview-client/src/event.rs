//! Inbound channel frames and their normalization into captured events.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use hookview_core::events::{CapturedEvent, wire};

/// Prefix of ids generated for events the relay sent without one.
pub const GENERATED_ID_PREFIX: &str = "event";

/// A decoded frame from the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `newWebhookData`, normalized.
    WebhookData(CapturedEvent),
    /// `connectionStatus`.
    ConnectionStatus {
        /// Status text.
        status: String,
        /// Subscriber id the relay assigned, if sent.
        subscriber_id: Option<String>,
    },
    /// Any other event name. Ignored by the manager.
    Unknown(String),
}

#[derive(Debug, Deserialize)]
struct Frame {
    event: String,
    #[serde(default)]
    data: Value,
}

impl InboundMessage {
    /// Decodes a text frame, stamping normalized events with `now`.
    pub fn parse(text: &str, now: DateTime<Utc>) -> Result<Self, serde_json::Error> {
        let frame: Frame = serde_json::from_str(text)?;
        Ok(match frame.event.as_str() {
            wire::NEW_WEBHOOK_DATA => Self::WebhookData(normalize(frame.data, now)),
            wire::CONNECTION_STATUS => {
                let field = |name: &str| frame.data.get(name).and_then(Value::as_str).map(str::to_string);
                Self::ConnectionStatus {
                    status: field("status").unwrap_or_default(),
                    subscriber_id: field("id"),
                }
            }
            _ => Self::Unknown(frame.event),
        })
    }
}

/// Turns the `data` of a `newWebhookData` frame into a captured event.
///
/// An object with a `data` member is an envelope: its `id` and
/// `timestamp` are used when present and well formed. Anything else is a
/// bare payload. Missing ids become `event-<uuid>`, missing timestamps
/// become `now`. A bare payload's own `id` is never taken as the event id.
pub fn normalize(data: Value, now: DateTime<Utc>) -> CapturedEvent {
    match data {
        Value::Object(map) if map.contains_key("data") => from_envelope(map, now),
        payload => CapturedEvent::with_generated_id(GENERATED_ID_PREFIX, now, payload),
    }
}

fn from_envelope(mut map: Map<String, Value>, now: DateTime<Utc>) -> CapturedEvent {
    let payload = map.remove("data").unwrap_or(Value::Null);

    let received_at = map
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or(now);

    let id = match map.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    match id {
        Some(id) => CapturedEvent::new(id, received_at, payload),
        None => CapturedEvent::with_generated_id(GENERATED_ID_PREFIX, received_at, payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_full_envelope_is_kept() {
        let event = normalize(
            json!({"id": "abc", "timestamp": "2024-04-30T10:00:00Z", "data": {"order": 1}}),
            now(),
        );
        assert_eq!(event.id(), "abc");
        assert_eq!(event.received_at(), Utc.with_ymd_and_hms(2024, 4, 30, 10, 0, 0).unwrap());
        assert_eq!(event.payload(), &json!({"order": 1}));
    }

    #[test]
    fn test_envelope_without_id_or_timestamp() {
        let event = normalize(json!({"data": {"order": 1}, "timestamp": "yesterday"}), now());
        assert!(event.id().starts_with("event-"));
        assert_eq!(event.received_at(), now());
        assert_eq!(event.payload(), &json!({"order": 1}));
    }

    #[test]
    fn test_bare_payload_gets_generated_id() {
        let event = normalize(json!({"id": 6011185955070u64, "total_price": "10.00"}), now());
        assert!(event.id().starts_with("event-"));
        assert_eq!(event.payload()["id"], json!(6011185955070u64));
    }

    #[test]
    fn test_parse_frames() {
        let text = r#"{"event":"newWebhookData","data":{"order":1}}"#;
        match InboundMessage::parse(text, now()).unwrap() {
            InboundMessage::WebhookData(event) => assert_eq!(event.payload(), &json!({"order": 1})),
            other => panic!("unexpected {other:?}"),
        }

        let text = r#"{"event":"connectionStatus","data":{"status":"connected","id":"s1"}}"#;
        assert_eq!(
            InboundMessage::parse(text, now()).unwrap(),
            InboundMessage::ConnectionStatus {
                status: "connected".into(),
                subscriber_id: Some("s1".into()),
            }
        );

        let text = r#"{"event":"somethingElse"}"#;
        assert_eq!(
            InboundMessage::parse(text, now()).unwrap(),
            InboundMessage::Unknown("somethingElse".into())
        );

        assert!(InboundMessage::parse("not json", now()).is_err());
    }
}
