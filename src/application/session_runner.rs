// Session runner - One task owning the session, its tick timer and commands
use crate::application::ports::{NotificationSink, SessionTerminator};
use crate::application::session::{MonitoringSession, SessionView};
use crate::application::simulator::MetricsSimulator;
use crate::domain::filter::FilterState;
use crate::domain::threshold::filter_advisory;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const COMMAND_BUFFER: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("monitoring session has ended")]
    Closed,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Updated(SessionView),
    Notification(String),
    Ended,
}

#[derive(Debug, Clone, Copy)]
pub struct RunnerSettings {
    pub tick_interval: Duration,
    pub history_capacity: usize,
}

impl RunnerSettings {
    pub fn new(tick_interval: Duration, history_capacity: usize) -> Self {
        Self {
            tick_interval,
            history_capacity,
        }
    }
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000), 10)
    }
}

enum SessionCommand {
    ToggleFilter { reply: oneshot::Sender<FilterState> },
    SignOut { reply: oneshot::Sender<()> },
}

/// Cheap, cloneable access to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    views: watch::Receiver<SessionView>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    pub async fn toggle_filter(&self) -> Result<FilterState, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::ToggleFilter { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn sign_out(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::SignOut { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Latest published view. Still answers after the session ended.
    pub fn current_view(&self) -> SessionView {
        self.views.borrow().clone()
    }

    /// Fires on every published view and errors once the runner task is gone.
    pub fn views(&self) -> watch::Receiver<SessionView> {
        self.views.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.commands.is_closed()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

/// Aborts the runner task (and with it the tick timer) when dropped.
pub struct SessionGuard {
    task: Option<JoinHandle<()>>,
}

impl SessionGuard {
    /// Wait for the runner to finish on its own, e.g. after sign-out.
    #[cfg(test)]
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct SessionRunner<R> {
    session: MonitoringSession,
    simulator: MetricsSimulator<R>,
    tick_interval: Duration,
    commands: mpsc::Receiver<SessionCommand>,
    views: watch::Sender<SessionView>,
    events: broadcast::Sender<SessionEvent>,
    notifier: Arc<dyn NotificationSink>,
    terminator: Arc<dyn SessionTerminator>,
}

/// Start a fresh session. The first tick fires one interval after start.
pub fn spawn<R>(
    settings: RunnerSettings,
    simulator: MetricsSimulator<R>,
    events: broadcast::Sender<SessionEvent>,
    notifier: Arc<dyn NotificationSink>,
    terminator: Arc<dyn SessionTerminator>,
) -> (SessionHandle, SessionGuard)
where
    R: Rng + Send + 'static,
{
    let session = MonitoringSession::new(settings.history_capacity);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (view_tx, view_rx) = watch::channel(session.view());

    let runner = SessionRunner {
        session,
        simulator,
        tick_interval: settings.tick_interval,
        commands: command_rx,
        views: view_tx,
        events: events.clone(),
        notifier,
        terminator,
    };

    tracing::info!(
        tick_interval_ms = settings.tick_interval.as_millis() as u64,
        history_capacity = settings.history_capacity,
        "Monitoring session started"
    );

    let task = tokio::spawn(runner.run());

    let handle = SessionHandle {
        commands: command_tx,
        views: view_rx,
        events,
    };
    (handle, SessionGuard { task: Some(task) })
}

impl<R: Rng> SessionRunner<R> {
    async fn run(mut self) {
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.on_tick(),
                command = self.commands.recv() => match command {
                    Some(SessionCommand::ToggleFilter { reply }) => {
                        let state = self.on_toggle();
                        let _ = reply.send(state);
                    }
                    Some(SessionCommand::SignOut { reply }) => {
                        self.on_sign_out().await;
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        tracing::debug!("All session handles dropped");
                        break;
                    }
                },
            }
        }

        tracing::info!(ticks = self.session.ticks(), "Monitoring session stopped");
    }

    fn on_tick(&mut self) {
        let had_advisory = filter_advisory(self.session.snapshot().filter_health).is_some();

        let next = self
            .simulator
            .tick(self.session.snapshot(), self.session.filter());
        self.session
            .apply_tick(next, chrono::Utc::now().timestamp_millis());

        let view = self.session.view();
        let snapshot = view.snapshot;
        tracing::debug!(
            tick = view.ticks,
            ph = snapshot.ph,
            tds = snapshot.tds,
            temperature = snapshot.temperature,
            turbidity = snapshot.turbidity,
            filter_health = snapshot.filter_health,
            history_len = self.session.history().len(),
            alerts = view.assessment.has_alerts(),
            "Simulation tick"
        );

        if !had_advisory {
            for advisory in &view.assessment.advisories {
                tracing::warn!(filter_health = snapshot.filter_health, "{}", advisory.message());
            }
        }

        self.publish(view);
    }

    fn on_toggle(&mut self) -> FilterState {
        let state = self.session.toggle_filter();
        tracing::info!(filter = state.status_label(), "Filter toggled");
        self.notifier.notify(state.notification());
        self.publish(self.session.view());
        state
    }

    async fn on_sign_out(&mut self) {
        tracing::info!("Sign-out requested, ending monitoring session");
        // Refuse further commands before the terminator runs
        self.commands.close();
        self.terminator.end_session().await;
        let _ = self.events.send(SessionEvent::Ended);
    }

    fn publish(&self, view: SessionView) {
        self.views.send_replace(view.clone());
        // No subscribers is fine
        let _ = self.events.send(SessionEvent::Updated(view));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::simulator::DriftProfile;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::broadcast::error::TryRecvError;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl NotificationSink for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    #[derive(Default)]
    struct CountingTerminator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionTerminator for CountingTerminator {
        async fn end_session(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Harness {
        handle: SessionHandle,
        guard: SessionGuard,
        notifier: Arc<RecordingNotifier>,
        terminator: Arc<CountingTerminator>,
    }

    fn start() -> Harness {
        let (events, _) = broadcast::channel(64);
        let notifier = Arc::new(RecordingNotifier::default());
        let terminator = Arc::new(CountingTerminator::default());
        let (handle, guard) = spawn(
            RunnerSettings::default(),
            MetricsSimulator::seeded(21, DriftProfile::default()),
            events,
            notifier.clone(),
            terminator.clone(),
        );
        Harness {
            handle,
            guard,
            notifier,
            terminator,
        }
    }

    async fn next_update(rx: &mut broadcast::Receiver<SessionEvent>) -> SessionView {
        loop {
            match rx.recv().await.expect("event channel open") {
                SessionEvent::Updated(view) => return view,
                _ => continue,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_every_interval() {
        let harness = start();
        let mut events = harness.handle.subscribe();
        let started = Instant::now();

        let first = next_update(&mut events).await;
        assert_eq!(first.ticks, 1);
        assert!(started.elapsed() >= Duration::from_millis(5000));
        assert!(started.elapsed() < Duration::from_millis(5100));

        let second = next_update(&mut events).await;
        assert_eq!(second.ticks, 2);
        assert_eq!(second.history.len(), 2);
        assert_eq!(harness.handle.current_view().ticks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_filter_does_not_wear() {
        let harness = start();
        let mut events = harness.handle.subscribe();

        for _ in 0..3 {
            let view = next_update(&mut events).await;
            assert_eq!(view.snapshot.filter_health, 85.0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_twice_notifies_in_order() {
        let harness = start();

        assert_eq!(harness.handle.toggle_filter().await.unwrap(), FilterState::Running);
        assert_eq!(harness.handle.toggle_filter().await.unwrap(), FilterState::Stopped);

        assert_eq!(
            *harness.notifier.messages.lock().unwrap(),
            vec!["Filter started".to_string(), "Filter stopped".to_string()]
        );
        assert_eq!(harness.handle.current_view().filter, FilterState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_filter_wears_on_tick() {
        let harness = start();
        let mut events = harness.handle.subscribe();

        harness.handle.toggle_filter().await.unwrap();
        let view = next_update(&mut events).await;
        // The toggle itself publishes a view before any tick
        assert_eq!(view.ticks, 0);

        let view = next_update(&mut events).await;
        assert_eq!(view.ticks, 1);
        assert!((view.snapshot.filter_health - 84.8).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_out_stops_session() {
        let harness = start();
        let mut events = harness.handle.subscribe();

        harness.handle.sign_out().await.unwrap();
        assert_eq!(harness.terminator.calls.load(Ordering::SeqCst), 1);
        assert!(!harness.handle.is_active());

        let mut saw_ended = false;
        while let Ok(event) = events.try_recv() {
            saw_ended |= matches!(event, SessionEvent::Ended);
        }
        assert!(saw_ended);

        assert!(matches!(
            harness.handle.toggle_filter().await,
            Err(SessionError::Closed)
        ));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(harness.handle.current_view().ticks, 0);

        harness.guard.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_guard_cancels_timer() {
        let harness = start();
        let mut events = harness.handle.subscribe();

        let view = next_update(&mut events).await;
        assert_eq!(view.ticks, 1);

        drop(harness.guard);
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(harness.handle.current_view().ticks, 1);
        assert!(!harness.handle.is_active());
    }
}
