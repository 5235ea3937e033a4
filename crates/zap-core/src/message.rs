use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation message. Either fetched from the gateway (authoritative,
/// with a gateway-assigned `whatsapp_message_id` once delivery is confirmed)
/// or created locally as an optimistic placeholder at send time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub whatsapp_message_id: Option<String>,
    pub contact_phone: String,
    pub body: String,
    pub from_me: bool,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build the optimistic placeholder for an outbound message. The id is a
    /// session-unique local value; the gateway message id stays empty until
    /// the next poll returns the authoritative copy.
    pub fn outbound(phone: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: local_message_id(),
            whatsapp_message_id: None,
            contact_phone: phone.into(),
            body: body.into(),
            from_me: true,
            timestamp: now,
            created_at: now,
        }
    }
}

static LAST_LOCAL_ID: AtomicI64 = AtomicI64::new(0);

/// Id for an optimistic placeholder message. Derived from the current epoch
/// milliseconds but forced strictly increasing, so placeholders created in
/// the same millisecond never collide within a session.
pub fn local_message_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_LOCAL_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_LOCAL_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ids_strictly_increase() {
        let ids: Vec<i64> = (0..1000).map(|_| local_message_id()).collect();
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0], "{} then {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_outbound_placeholder_shape() {
        let msg = Message::outbound("+15551234567", "hello");
        assert!(msg.from_me);
        assert!(msg.whatsapp_message_id.is_none());
        assert_eq!(msg.contact_phone, "+15551234567");
        assert_eq!(msg.body, "hello");
        assert_eq!(msg.timestamp, msg.created_at);
    }

    #[test]
    fn test_parse_wire_shape_with_null_gateway_id() {
        let msg: Message = serde_json::from_str(
            r#"{"id":7,"whatsappMessageId":null,"contactPhone":"+15551234567","body":"oi","fromMe":false,"timestamp":"2024-05-01T12:00:00Z","createdAt":"2024-05-01T12:00:01Z"}"#,
        )
        .unwrap();
        assert_eq!(msg.id, 7);
        assert!(msg.whatsapp_message_id.is_none());
        assert!(!msg.from_me);
    }
}
