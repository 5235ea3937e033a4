use std::sync::Arc;
use tokio::sync::RwLock;

use zap_core::{Contact, Message};

/// Optimistic-send state machine. `Settled` and `Idle` both accept a new
/// send; only `Sending` gates one out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPhase {
    #[default]
    Idle,
    Sending,
    Settled,
}

/// UI-visible state. Single writer per field by convention: the contact loop
/// owns `contacts` and `is_loading`, the conversation loop owns `messages`
/// (plus the send flow's optimistic append/remove), the operator owns
/// `draft` and `selected`.
#[derive(Debug, Default)]
pub struct ViewState {
    pub contacts: Vec<Contact>,
    pub selected: Option<Contact>,
    pub messages: Vec<Message>,
    pub draft: String,
    pub send_phase: SendPhase,
    pub is_loading: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    /// Replace the contact list wholesale; no merging with prior state.
    pub fn set_contacts(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
        self.is_loading = false;
    }

    /// Switch (or clear) the selected conversation. Displayed messages are
    /// cleared immediately, before any fetch for the new selection resolves.
    pub fn select_conversation(&mut self, contact: Option<Contact>) {
        self.selected = contact;
        self.messages.clear();
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn remove_message(&mut self, id: i64) {
        self.messages.retain(|m| m.id != id);
    }
}

pub type SharedViewState = Arc<RwLock<ViewState>>;
