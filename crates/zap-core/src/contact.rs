use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A gateway contact. The phone number is the natural key for conversation
/// lookups and is unique across contacts; the client never mutates contacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub phone: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Name shown in contact lists, falling back to the phone number.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_shape() {
        let contact: Contact = serde_json::from_str(
            r#"{"id":1,"phone":"+15551234567","name":"Ana","createdAt":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(contact.id, 1);
        assert_eq!(contact.phone, "+15551234567");
        assert_eq!(contact.display_name(), "Ana");
    }

    #[test]
    fn test_display_name_falls_back_to_phone() {
        let contact: Contact = serde_json::from_str(
            r#"{"id":2,"phone":"+15550000000","name":null,"createdAt":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(contact.display_name(), "+15550000000");
    }
}
