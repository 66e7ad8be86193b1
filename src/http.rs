use crate::collectors::{collect_snapshot, MetricsSource, Snapshot};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

#[derive(Clone)]
pub struct HttpAppState {
    pub source: Arc<dyn MetricsSource>,
}

/// Wire shape of `GET /stats`: every number is rendered as a string with
/// exactly two decimals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub cpu_usage: String,
    pub ram_usage: String,
    pub disk_usage: DiskUsage,
    pub network_speed: NetworkSpeed,
}

/// Usage of the first volume, or the bare number `0` when the host reports no
/// filesystems at all.
#[derive(Debug, PartialEq)]
pub enum DiskUsage {
    Percent(String),
    NoVolumes,
}

impl Serialize for DiskUsage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DiskUsage::Percent(text) => serializer.serialize_str(text),
            DiskUsage::NoVolumes => serializer.serialize_u64(0),
        }
    }
}

/// Cumulative megabyte counters of the first interface. Both keys are left
/// out of the JSON entirely when no interfaces exist.
#[derive(Debug, Serialize)]
pub struct NetworkSpeed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx: Option<String>,
}

fn two_decimals(value: f64) -> String {
    format!("{value:.2}")
}

impl From<&Snapshot> for StatsResponse {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            cpu_usage: two_decimals(snapshot.cpu_usage_percent),
            ram_usage: two_decimals(snapshot.memory_used_percent),
            disk_usage: match snapshot.disk_used_percent {
                Some(pct) => DiskUsage::Percent(two_decimals(pct)),
                None => DiskUsage::NoVolumes,
            },
            network_speed: NetworkSpeed {
                rx: snapshot.network_rx_mb.map(two_decimals),
                tx: snapshot.network_tx_mb.map(two_decimals),
            },
        }
    }
}

pub fn build_router(source: Arc<dyn MetricsSource>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(HttpAppState { source })
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn stats_handler(State(state): State<HttpAppState>) -> Response {
    match collect_snapshot(state.source.clone()).await {
        Ok(snapshot) => Json(StatsResponse::from(&snapshot)).into_response(),
        Err(err) => {
            error!(error = %err, "failed to collect stats");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to get stats" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::stub::StubSource;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_stats(source: StubSource) -> (StatusCode, String) {
        let app = build_router(Arc::new(source));
        let response = app
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn healthz_returns_ok() {
        let app = build_router(Arc::new(StubSource::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), b"ok");
    }

    #[tokio::test]
    async fn stats_matches_expected_wire_format() {
        let (status, body) = get_stats(StubSource::default()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"{"cpuUsage":"42.57","ramUsage":"50.00","diskUsage":"55.10","networkSpeed":{"rx":"100.00","tx":"50.00"}}"#
        );
    }

    #[tokio::test]
    async fn repeated_polls_are_byte_identical() {
        let source = StubSource::default();
        let (_, first) = get_stats(source.clone()).await;
        let (_, second) = get_stats(source).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_disk_list_yields_numeric_zero() {
        let source = StubSource {
            disks: Vec::new(),
            ..StubSource::default()
        };
        let (status, body) = get_stats(source).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""diskUsage":0,"#), "body: {body}");
    }

    #[tokio::test]
    async fn empty_interface_list_omits_rx_tx() {
        let source = StubSource {
            net: Vec::new(),
            ..StubSource::default()
        };
        let (status, body) = get_stats(source).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.ends_with(r#""networkSpeed":{}}"#), "body: {body}");
        assert!(!body.contains("rx"), "body: {body}");
    }

    #[tokio::test]
    async fn probe_failure_returns_generic_500() {
        let source = StubSource {
            fail_probe: Some("disk"),
            ..StubSource::default()
        };
        let (status, body) = get_stats(source).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"Failed to get stats"}"#);
    }
}
