pub mod classify;
pub mod render;
pub mod sampler;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Capacity the RAM "used GB" figure is derived against. This is an assumed
/// constant, not the host's true total; the derived figure is a documented
/// approximation carried over from the dashboard this replaces.
pub const ASSUMED_RAM_TOTAL_GB: f64 = 8.0;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Wire payload of `GET /stats` as the client sees it. Numeric fields arrive
/// as strings; `diskUsage` degrades to the bare number `0` when the collector
/// found no volumes, and `rx`/`tx` are missing when it found no interfaces.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    pub cpu_usage: String,
    pub ram_usage: String,
    pub disk_usage: DiskField,
    #[serde(default)]
    pub network_speed: NetworkSpeedPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DiskField {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkSpeedPayload {
    #[serde(default)]
    pub rx: Option<String>,
    #[serde(default)]
    pub tx: Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed stats payload: {0}")]
    Payload(String),
}

/// Seam between the sampler and the network so tests can drive the polling
/// loop with a mock.
#[async_trait]
pub trait StatsFetcher: Send + Sync + 'static {
    async fn fetch(&self) -> Result<StatsPayload, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl StatsFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<StatsPayload, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Payload(err.to_string()))
    }
}

/// Last successfully received snapshot, kept verbatim across fetch failures
/// (stale-on-error). `None` marks a metric the collector never reported or
/// reported as unparseable; the renderer matches on it instead of letting a
/// NaN leak into threshold comparisons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub cpu_percent: Option<f64>,
    pub ram_percent: Option<f64>,
    pub disk_percent: Option<f64>,
    pub net_rx_mb: Option<f64>,
    pub net_tx_mb: Option<f64>,
}

fn parse_metric(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl DisplayState {
    pub fn apply(&mut self, payload: &StatsPayload) {
        self.cpu_percent = parse_metric(&payload.cpu_usage);
        self.ram_percent = parse_metric(&payload.ram_usage);
        self.disk_percent = match &payload.disk_usage {
            DiskField::Text(text) => parse_metric(text),
            DiskField::Number(value) => value.is_finite().then_some(*value),
        };
        self.net_rx_mb = payload.network_speed.rx.as_deref().and_then(parse_metric);
        self.net_tx_mb = payload.network_speed.tx.as_deref().and_then(parse_metric);
    }

    /// Used GB recomputed from the reported percentage against
    /// [`ASSUMED_RAM_TOTAL_GB`], not the host's measured capacity.
    pub fn ram_used_gb(&self) -> Option<f64> {
        self.ram_percent.map(|pct| pct / 100.0 * ASSUMED_RAM_TOTAL_GB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> StatsPayload {
        serde_json::from_str(
            r#"{"cpuUsage":"42.57","ramUsage":"50.00","diskUsage":"55.10","networkSpeed":{"rx":"100.00","tx":"50.00"}}"#,
        )
        .expect("payload parses")
    }

    #[test]
    fn apply_mirrors_a_full_payload() {
        let mut state = DisplayState::default();
        state.apply(&full_payload());

        assert_eq!(state.cpu_percent, Some(42.57));
        assert_eq!(state.ram_percent, Some(50.0));
        assert_eq!(state.disk_percent, Some(55.1));
        assert_eq!(state.net_rx_mb, Some(100.0));
        assert_eq!(state.net_tx_mb, Some(50.0));
    }

    #[test]
    fn numeric_disk_zero_and_missing_network_parse() {
        let payload: StatsPayload = serde_json::from_str(
            r#"{"cpuUsage":"1.00","ramUsage":"2.00","diskUsage":0,"networkSpeed":{}}"#,
        )
        .expect("degraded payload parses");

        let mut state = DisplayState::default();
        state.apply(&payload);

        assert_eq!(state.disk_percent, Some(0.0));
        assert_eq!(state.net_rx_mb, None);
        assert_eq!(state.net_tx_mb, None);
    }

    #[test]
    fn unparseable_text_becomes_absent_not_nan() {
        let payload: StatsPayload = serde_json::from_str(
            r#"{"cpuUsage":"NaN","ramUsage":"oops","diskUsage":"x","networkSpeed":{"rx":"NaN"}}"#,
        )
        .expect("payload parses structurally");

        let mut state = DisplayState::default();
        state.apply(&payload);

        assert_eq!(state.cpu_percent, None);
        assert_eq!(state.ram_percent, None);
        assert_eq!(state.disk_percent, None);
        assert_eq!(state.net_rx_mb, None);
    }

    #[test]
    fn ram_used_gb_derives_from_assumed_total() {
        let mut state = DisplayState::default();
        state.apply(&full_payload());
        assert_eq!(state.ram_used_gb(), Some(4.0));

        assert_eq!(DisplayState::default().ram_used_gb(), None);
    }
}
