// HTTP request handlers
use crate::application::session_runner::SessionError;
use crate::domain::filter::FilterState;
use crate::infrastructure::chunked_json::frame_response;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub filter: FilterState,
    pub message: String,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            SessionError::Closed => (StatusCode::GONE, self.to_string()).into_response(),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current dashboard
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    if !state.session.is_active() {
        return SessionError::Closed.into_response();
    }

    let dashboard = state
        .dashboard_service
        .build(&state.session.current_view());

    match json_response(&dashboard, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Flip the filter between running and stopped
pub async fn toggle_filter(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ToggleResponse>, SessionError> {
    let filter = state.session.toggle_filter().await?;
    Ok(Json(ToggleResponse {
        filter,
        message: filter.notification().to_string(),
    }))
}

/// End the session; stops the simulation timer
pub async fn sign_out(State(state): State<Arc<AppState>>) -> Result<StatusCode, SessionError> {
    state.session.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Live dashboard stream (length-prefixed JSON frames)
pub async fn stream_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    if !state.session.is_active() {
        return SessionError::Closed.into_response();
    }

    let rx = state.streaming_service.stream_dashboard();
    frame_response(rx, accepts_brotli(&headers))
}
