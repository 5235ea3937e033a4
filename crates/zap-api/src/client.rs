use std::borrow::Cow;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use zap_core::{Contact, HealthStatus, Message};

use crate::error::{ApiError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const API_URL_ENV: &str = "ZAP_API_URL";

/// Backend base address: environment override, else the fixed default.
pub fn api_url_from_env() -> String {
    std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Typed wrapper over the gateway's REST surface. Stateless apart from the
/// pooled HTTP client; error handling is deliberately asymmetric per
/// operation (see each method).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Structured result of a send. Callers rely on this instead of an error:
/// the send path never raises.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Sent { message_id: Option<String> },
    Failed { error: String },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    phone: &'a str,
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: Option<String>,
    error: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(api_url_from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// All known contacts, in gateway order. Gates the client's "loaded"
    /// state, so failures propagate.
    pub async fn contacts(&self) -> Result<Vec<Contact>> {
        let res = self.http.get(self.endpoint("contacts")).send().await?;
        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }
        Ok(res.json().await?)
    }

    /// Every message across all conversations, in gateway order.
    pub async fn messages(&self) -> Result<Vec<Message>> {
        let res = self.http.get(self.endpoint("messages")).send().await?;
        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }
        Ok(res.json().await?)
    }

    /// Messages for one conversation. 404 means the conversation has no
    /// messages yet; any other failure degrades to an empty list and a log
    /// line so conversation rendering never breaks on a transient hiccup.
    pub async fn messages_by_phone(&self, phone: &str) -> Vec<Message> {
        let path = format!("messages/phone/{}", encode_phone(phone));
        let res = match self.http.get(self.endpoint(&path)).send().await {
            Ok(res) => res,
            Err(e) => {
                warn!(phone, error = %e, "message fetch failed");
                return Vec::new();
            }
        };

        match classify_message_fetch(res.status()) {
            MessageFetch::NoMessages => Vec::new(),
            MessageFetch::Degraded => {
                warn!(phone, status = %res.status(), "message fetch failed");
                Vec::new()
            }
            MessageFetch::Parse => match res.json().await {
                Ok(messages) => messages,
                Err(e) => {
                    warn!(phone, error = %e, "message fetch returned a malformed body");
                    Vec::new()
                }
            },
        }
    }

    /// Send an outbound message through the gateway. Never returns an error;
    /// every failure is folded into [`SendOutcome::Failed`] with the body's
    /// `error` field when the gateway reported one, else the status text.
    pub async fn send(&self, phone: &str, message: &str) -> SendOutcome {
        let res = self
            .http
            .post(self.endpoint("send"))
            .json(&SendRequest { phone, message })
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(e) => {
                return SendOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let status = res.status();
        let body: SendResponse = res.json().await.unwrap_or_default();
        send_outcome(status, body)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let res = self.http.get(self.endpoint("health")).send().await?;
        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }
        Ok(res.json().await?)
    }
}

enum MessageFetch {
    Parse,
    NoMessages,
    Degraded,
}

fn classify_message_fetch(status: StatusCode) -> MessageFetch {
    if status == StatusCode::NOT_FOUND {
        MessageFetch::NoMessages
    } else if status.is_success() {
        MessageFetch::Parse
    } else {
        MessageFetch::Degraded
    }
}

fn send_outcome(status: StatusCode, body: SendResponse) -> SendOutcome {
    if status.is_success() {
        SendOutcome::Sent {
            message_id: body.message_id,
        }
    } else {
        SendOutcome::Failed {
            error: body.error.unwrap_or_else(|| status.to_string()),
        }
    }
}

/// Phone numbers land in a path segment, so everything outside
/// `[0-9A-Za-z]` is percent-encoded: `+15551234567` -> `%2B15551234567`.
fn encode_phone(phone: &str) -> Cow<'_, str> {
    utf8_percent_encode(phone, NON_ALPHANUMERIC).into()
}
