// Outbound capabilities the monitoring session relies on
use async_trait::async_trait;

/// Shows a transient message to the user. Fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// Ends the user's session (sign-out). Owned by whatever hosts the dashboard.
#[async_trait]
pub trait SessionTerminator: Send + Sync {
    async fn end_session(&self);
}
