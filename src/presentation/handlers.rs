// HTTP request handlers
use crate::domain::error::ReliabilityError;
use crate::domain::window::TimeWindow;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct WindowQuery {
    pub days: Option<u32>,
}

impl WindowQuery {
    fn window(&self) -> Result<TimeWindow, ReliabilityError> {
        self.days
            .map(TimeWindow::from_days)
            .unwrap_or_else(|| Ok(TimeWindow::default()))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub fn error_status(error: &ReliabilityError) -> StatusCode {
    match error {
        ReliabilityError::UnknownMill(_) => StatusCode::NOT_FOUND,
        ReliabilityError::InvalidWindow(_) => StatusCode::BAD_REQUEST,
        ReliabilityError::DataUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        ReliabilityError::InvalidConfig(_) | ReliabilityError::TaskFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn respond<T: Serialize>(result: Result<T, ReliabilityError>, compress: bool) -> Response {
    let response = match result {
        Ok(body) => json_response(&body, StatusCode::OK, compress).await,
        Err(e) => {
            let status = error_status(&e);
            if status.is_server_error() {
                tracing::error!("Request failed: {}", e);
            }
            let body = ErrorBody {
                error: e.to_string(),
            };
            json_response(&body, status, compress).await
        }
    };

    match response {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List configured mills
pub async fn list_mills(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let mills = state.reliability_service.mills().to_vec();
    respond(Ok(mills), accepts_brotli(&headers)).await
}

/// Fleet-wide metrics, histograms and comparison table
pub async fn fleet_report(
    Query(query): Query<WindowQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let result = match query.window() {
        Ok(window) => state.reliability_service.fleet_report(window, Utc::now()).await,
        Err(e) => Err(e),
    };
    respond(result, compress).await
}

/// One mill's events, metrics and comparison against the fleet
pub async fn mill_detail(
    Path(id): Path<String>,
    Query(query): Query<WindowQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let result = match query.window() {
        Ok(window) => state.reliability_service.mill_detail(&id, window).await,
        Err(e) => Err(e),
    };
    respond(result, compress).await
}
