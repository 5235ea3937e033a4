#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use tokio::sync::Semaphore;

use zap_api::ApiError;
use zap_sync::{Backend, Contact, Message, SendOutcome};

pub fn contact(id: i64, phone: &str) -> Contact {
    Contact {
        id,
        phone: phone.to_string(),
        name: None,
        created_at: Utc::now(),
    }
}

pub fn inbound_message(id: i64, phone: &str, body: &str) -> Message {
    let now = Utc::now();
    Message {
        id,
        whatsapp_message_id: Some(format!("wamid.{id}")),
        contact_phone: phone.to_string(),
        body: body.to_string(),
        from_me: false,
        timestamp: now,
        created_at: now,
    }
}

type ContactReply = Result<Vec<Contact>, StatusCode>;

/// Programmable gateway double. Contact fetches follow a queued plan (the
/// last entry repeats once the queue drains); message fetches and sends can
/// be held open with a gate so tests can observe in-flight state.
pub struct FakeBackend {
    contact_plan: Mutex<VecDeque<ContactReply>>,
    contact_repeat: Mutex<ContactReply>,
    pub contact_calls: AtomicUsize,

    messages: Mutex<HashMap<String, Vec<Message>>>,
    message_calls: Mutex<Vec<String>>,
    message_gate: Semaphore,
    gate_messages: AtomicBool,

    send_reply: Mutex<SendOutcome>,
    sent: Mutex<Vec<(String, String)>>,
    pub send_calls: AtomicUsize,
    send_gate: Semaphore,
    gate_sends: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            contact_plan: Mutex::new(VecDeque::new()),
            contact_repeat: Mutex::new(Ok(Vec::new())),
            contact_calls: AtomicUsize::new(0),
            messages: Mutex::new(HashMap::new()),
            message_calls: Mutex::new(Vec::new()),
            message_gate: Semaphore::new(0),
            gate_messages: AtomicBool::new(false),
            send_reply: Mutex::new(SendOutcome::Sent { message_id: None }),
            sent: Mutex::new(Vec::new()),
            send_calls: AtomicUsize::new(0),
            send_gate: Semaphore::new(0),
            gate_sends: AtomicBool::new(false),
        }
    }

    pub fn plan_contacts(&self, replies: Vec<ContactReply>) {
        self.contact_plan.lock().unwrap().extend(replies);
    }

    pub fn set_messages(&self, phone: &str, messages: Vec<Message>) {
        self.messages
            .lock()
            .unwrap()
            .insert(phone.to_string(), messages);
    }

    pub fn set_send_reply(&self, outcome: SendOutcome) {
        *self.send_reply.lock().unwrap() = outcome;
    }

    pub fn hold_message_fetches(&self) {
        self.gate_messages.store(true, Ordering::SeqCst);
    }

    pub fn release_message_fetch(&self) {
        self.message_gate.add_permits(1);
    }

    pub fn hold_sends(&self) {
        self.gate_sends.store(true, Ordering::SeqCst);
    }

    pub fn release_send(&self) {
        self.send_gate.add_permits(1);
    }

    pub fn message_call_log(&self) -> Vec<String> {
        self.message_calls.lock().unwrap().clone()
    }

    pub fn clear_message_call_log(&self) {
        self.message_calls.lock().unwrap().clear();
    }

    pub fn sent_log(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn contacts(&self) -> zap_api::Result<Vec<Contact>> {
        self.contact_calls.fetch_add(1, Ordering::SeqCst);
        let reply = {
            let mut plan = self.contact_plan.lock().unwrap();
            match plan.pop_front() {
                Some(reply) => {
                    *self.contact_repeat.lock().unwrap() = reply.clone();
                    reply
                }
                None => self.contact_repeat.lock().unwrap().clone(),
            }
        };
        reply.map_err(ApiError::Status)
    }

    async fn messages_by_phone(&self, phone: &str) -> Vec<Message> {
        self.message_calls.lock().unwrap().push(phone.to_string());
        if self.gate_messages.load(Ordering::SeqCst) {
            let permit = self.message_gate.acquire().await.unwrap();
            permit.forget();
        }
        self.messages
            .lock()
            .unwrap()
            .get(phone)
            .cloned()
            .unwrap_or_default()
    }

    async fn send(&self, phone: &str, message: &str) -> SendOutcome {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string()));
        if self.gate_sends.load(Ordering::SeqCst) {
            let permit = self.send_gate.acquire().await.unwrap();
            permit.forget();
        }
        self.send_reply.lock().unwrap().clone()
    }
}
