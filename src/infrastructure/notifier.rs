// Notification sink that fans transient messages out to stream subscribers
use crate::application::ports::NotificationSink;
use crate::application::session_runner::SessionEvent;
use tokio::sync::broadcast;

pub struct BroadcastNotifier {
    events: broadcast::Sender<SessionEvent>,
}

impl BroadcastNotifier {
    pub fn new(events: broadcast::Sender<SessionEvent>) -> Self {
        Self { events }
    }
}

impl NotificationSink for BroadcastNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(notification = message, "Notification sent");
        // Nobody listening is not an error for a transient message
        let _ = self
            .events
            .send(SessionEvent::Notification(message.to_string()));
    }
}
