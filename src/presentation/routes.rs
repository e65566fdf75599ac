// Router assembly
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, health_check, sign_out, stream_dashboard, toggle_filter,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    // Compression is applied by the response builders, not a layer
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/filter/toggle", post(toggle_filter))
        .route("/sign-out", post(sign_out))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::ports::SessionTerminator;
    use crate::application::session_runner::{self, RunnerSettings, SessionGuard};
    use crate::application::simulator::{DriftProfile, MetricsSimulator};
    use crate::application::streaming_service::StreamingDashboardService;
    use crate::infrastructure::chunked_json::decode_frames;
    use crate::infrastructure::notifier::BroadcastNotifier;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::broadcast;
    use tower::ServiceExt; // for `oneshot`

    #[derive(Default)]
    struct FlagTerminator {
        ended: AtomicBool,
    }

    #[async_trait]
    impl SessionTerminator for FlagTerminator {
        async fn end_session(&self) {
            self.ended.store(true, Ordering::SeqCst);
        }
    }

    fn test_app() -> (Router, SessionGuard, Arc<FlagTerminator>) {
        let (events, _) = broadcast::channel(64);
        let terminator = Arc::new(FlagTerminator::default());
        let (session, guard) = session_runner::spawn(
            // Long interval keeps the timer out of the way
            RunnerSettings::new(Duration::from_secs(3600), 10),
            MetricsSimulator::seeded(17, DriftProfile::default()),
            events.clone(),
            Arc::new(BroadcastNotifier::new(events)),
            terminator.clone(),
        );
        let dashboard_service = DashboardService::new("Water Monitoring System".to_string());
        let streaming_service =
            StreamingDashboardService::new(session.clone(), dashboard_service.clone());
        let state = Arc::new(AppState {
            session,
            dashboard_service,
            streaming_service,
        });
        (build_router(state), guard, terminator)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _guard, _) = test_app();
        let response = app.oneshot(get("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_dashboard_shows_seed_values() {
        let (app, _guard, _) = test_app();
        let response = app.oneshot(get("/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["title"], "Water Monitoring System");
        assert_eq!(body["tick"], 0);
        assert_eq!(body["filter"]["state"], "stopped");
        assert_eq!(body["tiles"][0]["id"], "ph");
        assert_eq!(body["tiles"][0]["value"], 7.2);
        assert_eq!(body["tiles"][0]["status"], "nominal");
        assert_eq!(body["tiles"][4]["id"], "filterHealth");
        assert_eq!(body["tiles"][4]["value"], 85.0);
        assert_eq!(body["historyTimestamps"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_dashboard_brotli() {
        let (app, _guard, _) = test_app();
        let request = Request::builder()
            .uri("/dashboard")
            .header(header::ACCEPT_ENCODING, "gzip, br")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");
    }

    #[tokio::test]
    async fn test_toggle_twice() {
        let (app, _guard, _) = test_app();

        let first = json_body(app.clone().oneshot(post("/filter/toggle")).await.unwrap()).await;
        assert_eq!(first["filter"], "running");
        assert_eq!(first["message"], "Filter started");

        let second = json_body(app.clone().oneshot(post("/filter/toggle")).await.unwrap()).await;
        assert_eq!(second["filter"], "stopped");
        assert_eq!(second["message"], "Filter stopped");

        let dashboard = json_body(app.oneshot(get("/dashboard")).await.unwrap()).await;
        assert_eq!(dashboard["filter"]["status"], "Stopped");
    }

    #[tokio::test]
    async fn test_sign_out_ends_session() {
        let (app, guard, terminator) = test_app();

        let response = app.clone().oneshot(post("/sign-out")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(terminator.ended.load(Ordering::SeqCst));

        let response = app.clone().oneshot(get("/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::GONE);

        let response = app.clone().oneshot(post("/filter/toggle")).await.unwrap();
        assert_eq!(response.status(), StatusCode::GONE);

        let response = app.oneshot(post("/sign-out")).await.unwrap();
        assert_eq!(response.status(), StatusCode::GONE);

        guard.join().await;
    }

    #[tokio::test]
    async fn test_stream_until_sign_out() {
        let (app, _guard, _) = test_app();

        let response = app.clone().oneshot(get("/dashboard/stream")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        app.clone().oneshot(post("/filter/toggle")).await.unwrap();
        app.oneshot(post("/sign-out")).await.unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let frames = decode_frames(&bytes);
        let types: Vec<&str> = frames.iter().filter_map(|f| f["type"].as_str()).collect();

        assert_eq!(types, vec!["dashboard", "notification", "dashboard", "ended"]);
        assert_eq!(frames[1]["payload"]["message"], "Filter started");
        assert_eq!(frames[2]["payload"]["filter"]["state"], "running");
    }
}
