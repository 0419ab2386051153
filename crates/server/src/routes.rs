//! HTTP surface.
//!
//! `GET  /`                 — dashboard page.
//! `GET  /api/health`       — liveness + process start time.
//! `GET  /api/battery`      — current reading plus charge-limit status.
//! `GET  /api/charge-limit` — probe result only.
//! `POST /api/charge-limit` — apply a new maximum-charge limit.

use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wattson_core::WattsonError;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/api/health", get(health))
        .route("/api/battery", get(battery))
        .route("/api/charge-limit", get(charge_limit).post(set_charge_limit))
        .with_state(state)
}

/// Error payload shared by every failing endpoint.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Controller and telemetry failures rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<WattsonError> for ApiError {
    fn from(err: WattsonError) -> Self {
        // Missing telemetry is the hardware's fault (503); everything else
        // is a caller problem reported with the error's display text.
        let status = match err {
            WattsonError::Telemetry(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

async fn dashboard() -> Html<&'static str> {
    Html(include_str!("../templates/index.html"))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub monitoring: bool,
    /// Level at the monitor's last logged change, once it has seen one.
    pub last_percent: Option<f64>,
    pub started_at: String,
}

async fn health(State(app): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = app.monitor.snapshot().await;
    Json(HealthResponse {
        status: "ok",
        monitoring: true,
        last_percent: snapshot.last_percent,
        started_at: app.started_at.to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct BatteryResponse {
    /// Charge level rounded to the nearest integer.
    pub percent: i64,
    pub charging: bool,
    /// Estimated seconds until empty; -1 unknown, -2 on AC power.
    pub secsleft: i64,
    pub temperature: Option<f64>,
    pub charge_limit: Option<u8>,
    pub charge_limit_supported: bool,
}

async fn battery(State(app): State<Arc<AppState>>) -> Result<Json<BatteryResponse>, ApiError> {
    let Some(reading) = app.telemetry.read() else {
        return Err(WattsonError::Telemetry("no battery detected".into()).into());
    };
    let support = app.control.probe();

    Ok(Json(BatteryResponse {
        percent: reading.percent.round() as i64,
        charging: reading.plugged,
        secsleft: reading.secs_left,
        temperature: reading.temperature_c,
        charge_limit: support.current_limit,
        charge_limit_supported: support.supported,
    }))
}

#[derive(Debug, Serialize)]
pub struct ChargeLimitResponse {
    pub supported: bool,
    pub current_limit: Option<u8>,
}

async fn charge_limit(State(app): State<Arc<AppState>>) -> Json<ChargeLimitResponse> {
    let support = app.control.probe();
    Json(ChargeLimitResponse {
        supported: support.supported,
        current_limit: support.current_limit,
    })
}

#[derive(Debug, Deserialize)]
pub struct ChargeLimitRequest {
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct SetChargeLimitResponse {
    pub success: bool,
    pub message: String,
}

/// Applying a limit may spawn the privileged helper and wait on it, so the
/// call moves off the async workers for its bounded blocking window.
async fn set_charge_limit(
    State(app): State<Arc<AppState>>,
    Json(body): Json<ChargeLimitRequest>,
) -> Result<Json<SetChargeLimitResponse>, ApiError> {
    let limit = body.limit;
    tracing::info!("charge limit requested: {limit}%");

    let state = app.clone();
    tokio::task::spawn_blocking(move || state.control.set_limit(limit))
        .await
        .map_err(|e| ApiError::internal(format!("charge limit task failed: {e}")))??;

    Ok(Json(SetChargeLimitResponse {
        success: true,
        message: format!("charge limit set to {limit}%"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;
    use wattson_power::{spawn_monitor, PrivilegedWriter, TelemetrySource, ThresholdControl};

    /// Fails every call; the direct-write path should make it unreachable.
    struct NoWriter;

    impl PrivilegedWriter for NoWriter {
        fn write(&self, _path: &Path, _value: u8) -> wattson_core::Result<()> {
            Err(WattsonError::WriteFailed("not available in tests".into()))
        }
    }

    fn write_battery(root: &Path, percent: &str, status: &str) {
        let dir = root.join("BAT0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("type"), "Battery\n").unwrap();
        fs::write(dir.join("capacity"), percent).unwrap();
        fs::write(dir.join("status"), status).unwrap();
    }

    fn app_with_root(root: &Path) -> Arc<AppState> {
        let telemetry = TelemetrySource::with_root(root);
        let monitor = spawn_monitor(
            telemetry.clone(),
            Duration::from_secs(60),
            Duration::from_secs(30),
        );
        let control = ThresholdControl::with(root, Box::new(NoWriter));
        Arc::new(AppState::new(telemetry, monitor, control))
    }

    #[tokio::test]
    async fn battery_endpoint_reports_reading_and_limit() {
        let td = TempDir::new().unwrap();
        write_battery(td.path(), "57\n", "Discharging\n");
        fs::write(
            td.path().join("BAT0/charge_control_end_threshold"),
            "80\n",
        )
        .unwrap();

        let Json(resp) = battery(State(app_with_root(td.path()))).await.unwrap();
        assert_eq!(resp.percent, 57);
        assert!(!resp.charging);
        assert_eq!(resp.charge_limit, Some(80));
        assert!(resp.charge_limit_supported);
    }

    #[tokio::test]
    async fn battery_endpoint_without_battery_is_503() {
        let td = TempDir::new().unwrap();

        let err = battery(State(app_with_root(td.path()))).await.unwrap_err();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.detail.contains("no battery detected"));
    }

    #[tokio::test]
    async fn charge_limit_endpoint_on_unsupported_hardware() {
        let td = TempDir::new().unwrap();
        write_battery(td.path(), "57\n", "Discharging\n");

        let Json(resp) = charge_limit(State(app_with_root(td.path()))).await;
        assert!(!resp.supported);
        assert_eq!(resp.current_limit, None);
    }

    #[tokio::test]
    async fn setting_a_limit_round_trips() {
        let td = TempDir::new().unwrap();
        write_battery(td.path(), "57\n", "Discharging\n");
        fs::write(
            td.path().join("BAT0/charge_control_end_threshold"),
            "100\n",
        )
        .unwrap();
        let app = app_with_root(td.path());

        let Json(resp) = set_charge_limit(
            State(app.clone()),
            Json(ChargeLimitRequest { limit: 80 }),
        )
        .await
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.message, "charge limit set to 80%");

        let Json(limit) = charge_limit(State(app)).await;
        assert_eq!(limit.current_limit, Some(80));
    }

    #[tokio::test]
    async fn out_of_range_limit_is_400_with_detail() {
        let td = TempDir::new().unwrap();
        write_battery(td.path(), "57\n", "Discharging\n");
        fs::write(
            td.path().join("BAT0/charge_control_end_threshold"),
            "80\n",
        )
        .unwrap();

        let err = set_charge_limit(
            State(app_with_root(td.path())),
            Json(ChargeLimitRequest { limit: 15 }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.detail.contains("allowed range"));
    }

    #[tokio::test]
    async fn unsupported_hardware_limit_write_is_400() {
        let td = TempDir::new().unwrap();
        write_battery(td.path(), "57\n", "Discharging\n");

        let err = set_charge_limit(
            State(app_with_root(td.path())),
            Json(ChargeLimitRequest { limit: 85 }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.detail.contains("not supported"));
    }

    #[tokio::test]
    async fn health_reports_monitoring() {
        let td = TempDir::new().unwrap();
        write_battery(td.path(), "57\n", "Discharging\n");

        let Json(resp) = health(State(app_with_root(td.path()))).await;
        assert_eq!(resp.status, "ok");
        assert!(resp.monitoring);
        assert!(!resp.started_at.is_empty());
    }

    #[test]
    fn battery_response_wire_shape() {
        let resp = BatteryResponse {
            percent: 57,
            charging: false,
            secsleft: 9000,
            temperature: None,
            charge_limit: Some(80),
            charge_limit_supported: true,
        };
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["percent"], 57);
        assert_eq!(value["charging"], false);
        assert_eq!(value["secsleft"], 9000);
        assert!(value["temperature"].is_null());
        assert_eq!(value["charge_limit"], 80);
        assert_eq!(value["charge_limit_supported"], true);
    }
}
