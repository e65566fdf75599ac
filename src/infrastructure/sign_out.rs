// Sign-out adapter - ending the session shuts the service down
use crate::application::ports::SessionTerminator;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Notify;

pub struct ShutdownTerminator {
    shutdown: Arc<Notify>,
}

impl ShutdownTerminator {
    pub fn new(shutdown: Arc<Notify>) -> Self {
        Self { shutdown }
    }
}

#[async_trait]
impl SessionTerminator for ShutdownTerminator {
    async fn end_session(&self) {
        tracing::info!("Session ended by sign-out, requesting shutdown");
        // notify_one keeps a permit if the server is not waiting yet
        self.shutdown.notify_one();
    }
}

/// Resolves on Ctrl-C or when the session signs out.
pub async fn shutdown_signal(shutdown: Arc<Notify>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                // Fall back to sign-out only
                shutdown.notified().await;
            }
        }
        _ = shutdown.notified() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_end_session_releases_shutdown_signal() {
        let shutdown = Arc::new(Notify::new());
        let terminator = ShutdownTerminator::new(shutdown.clone());

        terminator.end_session().await;

        tokio::time::timeout(Duration::from_secs(1), shutdown_signal(shutdown))
            .await
            .expect("shutdown signal should resolve after sign-out");
    }
}
