//! Webhook payloads: the `POST /webhook` envelope and the reply body sent back to the Send API.

use serde::{Deserialize, Serialize};

/// The only `object` value whose entries are dispatched.
pub const PAGE_OBJECT: &str = "page";

/// Webhook POST body: `{ object, entry: [ { messaging: [event] } ] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

/// One entry of a delivery. Events stay raw JSON until picked, so an event that is
/// never read cannot reject the whole delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub messaging: Vec<serde_json::Value>,
}

/// One messaging occurrence. Postbacks, reads, deliveries etc. carry no `message`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingEvent {
    pub sender: Participant,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
}

/// Inbound message. Attachment-only messages have no `text`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookPayload {
    pub fn is_page(&self) -> bool {
        self.object == PAGE_OBJECT
    }

    /// First messaging event of each entry. Later events in the same entry are not parsed.
    /// Entries whose first event is missing or lacks a sender id are skipped.
    pub fn first_events(&self) -> Vec<MessagingEvent> {
        self.entry
            .iter()
            .filter_map(|e| {
                let Some(first) = e.messaging.first() else {
                    log::debug!("webhook entry without messaging events, skipping");
                    return None;
                };
                match MessagingEvent::deserialize(first) {
                    Ok(event) => Some(event),
                    Err(err) => {
                        log::warn!("skipping unreadable messaging event: {}", err);
                        None
                    }
                }
            })
            .collect()
    }
}

/// Send API body: `{ recipient: { id }, message: { text } }`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub recipient: RecipientRef<'a>,
    pub message: OutgoingText<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipientRef<'a> {
    pub id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingText<'a> {
    pub text: &'a str,
}

impl<'a> SendMessageRequest<'a> {
    pub fn text(recipient_id: &'a str, text: &'a str) -> Self {
        Self {
            recipient: RecipientRef { id: recipient_id },
            message: OutgoingText { text },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_platform_delivery_ignoring_unknown_fields() {
        let body = json!({
            "object": "page",
            "entry": [{
                "id": "PAGE_ID",
                "time": 1458692752478u64,
                "messaging": [{
                    "sender": { "id": "U1" },
                    "recipient": { "id": "PAGE_ID" },
                    "timestamp": 1458692752478u64,
                    "message": { "mid": "m_1", "text": "Hi" }
                }]
            }]
        });
        let payload: WebhookPayload = serde_json::from_value(body).unwrap();
        assert!(payload.is_page());
        let events = payload.first_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sender.id, "U1");
        assert_eq!(
            events[0].message.as_ref().and_then(|m| m.text.as_deref()),
            Some("Hi")
        );
    }

    #[test]
    fn first_events_takes_head_of_each_entry_and_skips_empty() {
        let body = json!({
            "object": "page",
            "entry": [
                { "messaging": [
                    { "sender": { "id": "A" }, "message": { "text": "one" } },
                    { "sender": { "id": "B" }, "message": { "text": "two" } }
                ]},
                { "messaging": [] },
                { "messaging": [ { "sender": { "id": "C" } } ] }
            ]
        });
        let payload: WebhookPayload = serde_json::from_value(body).unwrap();
        let events = payload.first_events();
        let ids: Vec<_> = events.iter().map(|e| e.sender.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert!(events[1].message.is_none());
    }

    #[test]
    fn later_events_are_not_parsed_and_bad_heads_are_skipped() {
        let body = json!({
            "object": "page",
            "entry": [
                { "messaging": [
                    { "sender": { "id": "A" }, "message": { "text": "hi" } },
                    { "recipient": { "id": "PAGE" }, "optin": { "user_ref": "ref-1" } }
                ]},
                { "messaging": [ { "recipient": { "id": "PAGE" }, "optin": { "user_ref": "ref-2" } } ] },
                { "messaging": [ { "sender": { "id": 42 }, "message": { "text": "x" } } ] },
                { "messaging": [ { "sender": { "id": "B" }, "message": "not an object" } ] },
                { "messaging": [ { "sender": { "id": "C" } } ] }
            ]
        });
        let payload: WebhookPayload = serde_json::from_value(body).unwrap();
        let ids: Vec<_> = payload
            .first_events()
            .into_iter()
            .map(|e| e.sender.id)
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn send_request_shape() {
        let body = serde_json::to_value(SendMessageRequest::text("U1", "hello")).unwrap();
        assert_eq!(body, json!({ "recipient": { "id": "U1" }, "message": { "text": "hello" } }));
    }
}
