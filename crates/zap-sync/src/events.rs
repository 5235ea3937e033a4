/// Events the sync layer emits for the presentation layer. `ScrollToLatest`
/// is only ever emitted after the new message list has been committed to
/// state, so a listener that scrolls on it always sees the fresh list.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    ContactsUpdated { count: usize },
    ConnectionFailed { api_url: String, error: String },
    MessagesUpdated { phone: String, count: usize },
    ScrollToLatest,
    SendFailed { error: String },
}
