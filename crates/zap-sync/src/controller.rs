use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use zap_api::{Backend, SendOutcome};
use zap_core::{Contact, Message};

use crate::config::SyncConfig;
use crate::events::SyncEvent;
use crate::state::{SendPhase, SharedViewState, ViewState};

/// Owns the two periodic refresh cycles (contact list, active conversation)
/// and the optimistic send flow. All results land in the shared view state;
/// user-facing notifications travel over the event channel.
pub struct SyncController {
    backend: Arc<dyn Backend>,
    api_url: String,
    config: SyncConfig,
    state: SharedViewState,
    event_tx: mpsc::Sender<SyncEvent>,
    event_rx: Option<mpsc::Receiver<SyncEvent>>,
    contact_task: Option<JoinHandle<()>>,
    conversation_task: Option<JoinHandle<()>>,
}

impl SyncController {
    pub fn new(backend: Arc<dyn Backend>, api_url: impl Into<String>, config: SyncConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(256);
        Self {
            backend,
            api_url: api_url.into(),
            config,
            state: Arc::new(tokio::sync::RwLock::new(ViewState::new())),
            event_tx,
            event_rx: Some(event_rx),
            contact_task: None,
            conversation_task: None,
        }
    }

    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<SyncEvent>> {
        self.event_rx.take()
    }

    pub fn state(&self) -> SharedViewState {
        self.state.clone()
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.state.write().await.draft = text.into();
    }

    /// Start the contact refresh cycle: one fetch immediately, then one per
    /// `contact_interval` until [`stop`](Self::stop). The first failure of a
    /// streak emits a single `ConnectionFailed`; repeats stay quiet until a
    /// success resets the flag.
    pub fn start(&mut self) {
        if self.contact_task.is_some() {
            return;
        }

        let backend = self.backend.clone();
        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        let api_url = self.api_url.clone();
        let interval = self.config.contact_interval;

        self.contact_task = Some(tokio::spawn(async move {
            let mut has_notified_failure = false;
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                match backend.contacts().await {
                    Ok(contacts) => {
                        let count = contacts.len();
                        {
                            let mut state = state.write().await;
                            state.set_contacts(contacts);
                        }
                        has_notified_failure = false;
                        let _ = event_tx.send(SyncEvent::ContactsUpdated { count }).await;
                    }
                    Err(e) => {
                        warn!(error = %e, "contact fetch failed");
                        {
                            let mut state = state.write().await;
                            state.is_loading = false;
                        }
                        if !has_notified_failure {
                            has_notified_failure = true;
                            let _ = event_tx
                                .send(SyncEvent::ConnectionFailed {
                                    api_url: api_url.clone(),
                                    error: e.to_string(),
                                })
                                .await;
                        }
                    }
                }
            }
        }));
    }

    /// Switch the active conversation. The previous conversation's cycle is
    /// cancelled and displayed messages are cleared before the new cycle's
    /// first fetch can resolve; with no selection, nothing is fetched.
    pub async fn select_conversation(&mut self, contact: Option<Contact>) {
        if let Some(task) = self.conversation_task.take() {
            task.abort();
        }

        {
            let mut state = self.state.write().await;
            state.select_conversation(contact.clone());
        }

        let Some(contact) = contact else { return };

        let backend = self.backend.clone();
        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        let interval = self.config.message_interval;

        self.conversation_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                let messages = backend.messages_by_phone(&contact.phone).await;
                let count = messages.len();
                {
                    let mut state = state.write().await;
                    state.set_messages(messages);
                }
                // Commit first, then ask the presentation layer to scroll.
                let _ = event_tx
                    .send(SyncEvent::MessagesUpdated {
                        phone: contact.phone.clone(),
                        count,
                    })
                    .await;
                let _ = event_tx.send(SyncEvent::ScrollToLatest).await;
            }
        }));
    }

    /// Stop both refresh cycles. Idempotent; no fetch lands afterwards.
    pub fn stop(&mut self) {
        if let Some(task) = self.contact_task.take() {
            task.abort();
        }
        if let Some(task) = self.conversation_task.take() {
            task.abort();
        }
    }

    /// Optimistically send the current draft. No-op unless the trimmed draft
    /// is non-empty, a conversation is selected and no send is in flight; a
    /// send requested while one is in flight is ignored, not queued.
    pub fn send_draft(&self) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(send_draft_inner(backend, state, event_tx))
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn send_draft_inner(
    backend: Arc<dyn Backend>,
    state: SharedViewState,
    event_tx: mpsc::Sender<SyncEvent>,
) {
    // Preconditions are checked and the placeholder appended under one write
    // lock, so two racing sends cannot both pass the in-flight gate.
    let (phone, body, placeholder_id) = {
        let mut state = state.write().await;

        if state.send_phase == SendPhase::Sending {
            return;
        }
        let body = state.draft.trim().to_string();
        if body.is_empty() {
            return;
        }
        let Some(contact) = state.selected.clone() else {
            return;
        };

        state.draft.clear();
        state.send_phase = SendPhase::Sending;

        let placeholder = Message::outbound(contact.phone.clone(), body.clone());
        let placeholder_id = placeholder.id;
        state.push_message(placeholder);

        (contact.phone, body, placeholder_id)
    };
    let _ = event_tx.send(SyncEvent::ScrollToLatest).await;

    match backend.send(&phone, &body).await {
        SendOutcome::Sent { message_id } => {
            // The placeholder stays visible until the next poll returns the
            // authoritative copy.
            debug!(phone = %phone, ?message_id, "message accepted by gateway");
        }
        SendOutcome::Failed { error } => {
            {
                let mut state = state.write().await;
                state.remove_message(placeholder_id);
            }
            let error = if error.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                error
            };
            let _ = event_tx.send(SyncEvent::SendFailed { error }).await;
        }
    }

    state.write().await.send_phase = SendPhase::Settled;
}
