use async_trait::async_trait;

use zap_core::{Contact, Message};

use crate::client::{ApiClient, SendOutcome};
use crate::error::Result;

/// The slice of the gateway surface the sync layer drives. Split out so the
/// sync loops can be exercised against a programmable fake.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn contacts(&self) -> Result<Vec<Contact>>;

    async fn messages_by_phone(&self, phone: &str) -> Vec<Message>;

    async fn send(&self, phone: &str, message: &str) -> SendOutcome;
}

#[async_trait]
impl Backend for ApiClient {
    async fn contacts(&self) -> Result<Vec<Contact>> {
        ApiClient::contacts(self).await
    }

    async fn messages_by_phone(&self, phone: &str) -> Vec<Message> {
        ApiClient::messages_by_phone(self, phone).await
    }

    async fn send(&self, phone: &str, message: &str) -> SendOutcome {
        ApiClient::send(self, phone, message).await
    }
}
