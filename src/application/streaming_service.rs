// Streaming dashboard service - Live session updates for the render sink
use crate::application::dashboard_service::DashboardService;
use crate::application::session_runner::{SessionEvent, SessionHandle};
use crate::domain::dashboard::Dashboard;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

const STREAM_BUFFER: usize = 32;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum StreamMessage {
    Dashboard(Dashboard),
    Notification { message: String },
    Ended,
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    session: SessionHandle,
    dashboards: DashboardService,
}

impl StreamingDashboardService {
    pub fn new(session: SessionHandle, dashboards: DashboardService) -> Self {
        Self {
            session,
            dashboards,
        }
    }

    /// Current dashboard first, then every update until the session ends or
    /// the receiver is dropped.
    pub fn stream_dashboard(&self) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);

        // Subscribe before reading the current view so nothing falls in between
        let mut events = self.session.subscribe();
        let mut views = self.session.views();
        let initial = self.dashboards.build(&views.borrow_and_update());
        let active = self.session.is_active();
        let dashboards = self.dashboards.clone();

        tokio::spawn(async move {
            if tx.send(StreamMessage::Dashboard(initial)).await.is_err() {
                return;
            }
            if !active {
                let _ = tx.send(StreamMessage::Ended).await;
                return;
            }

            loop {
                let msg = tokio::select! {
                    // Drain queued events before noticing the runner is gone
                    biased;
                    event = events.recv() => match event {
                        Ok(SessionEvent::Updated(view)) => StreamMessage::Dashboard(dashboards.build(&view)),
                        Ok(SessionEvent::Notification(message)) => StreamMessage::Notification { message },
                        Ok(SessionEvent::Ended) => {
                            let _ = tx.send(StreamMessage::Ended).await;
                            break;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Dashboard stream lagged behind session events");
                            continue;
                        }
                        Err(RecvError::Closed) => break,
                    },
                    changed = views.changed() => {
                        if changed.is_ok() {
                            continue;
                        }
                        // Runner aborted without signing out
                        tracing::debug!("Session runner stopped, closing dashboard stream");
                        let _ = tx.send(StreamMessage::Ended).await;
                        break;
                    }
                };

                if tx.send(msg).await.is_err() {
                    tracing::debug!("Dashboard stream client went away");
                    break;
                }
            }
        });

        rx
    }
}
