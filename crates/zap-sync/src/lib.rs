mod config;
mod controller;
mod events;
mod state;

pub use config::SyncConfig;
pub use controller::SyncController;
pub use events::SyncEvent;
pub use state::{SendPhase, SharedViewState, ViewState};

pub use zap_api::{Backend, SendOutcome};
pub use zap_core::{Contact, Message};
