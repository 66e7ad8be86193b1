pub mod system;

use std::sync::Arc;
use thiserror::Error;
use tokio::task;

/// One normalized reading of all tracked host metrics. Recomputed fresh for
/// every request and discarded after serialization; nothing is retained
/// between polls.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub cpu_usage_percent: f64,
    /// `active / total * 100`. Out-of-range values from the OS pass through
    /// unclamped.
    pub memory_used_percent: f64,
    /// Usage of the first reported volume; `None` when the host reports no
    /// filesystems at all.
    pub disk_used_percent: Option<f64>,
    /// Cumulative byte counters of the first reported interface, converted to
    /// megabytes. These are totals since boot, not rates.
    pub network_rx_mb: Option<f64>,
    pub network_tx_mb: Option<f64>,
}

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("{probe} probe failed: {message}")]
    Probe {
        probe: &'static str,
        message: String,
    },
    #[error("probe task panicked: {0}")]
    Join(#[from] task::JoinError),
}

impl CollectError {
    pub fn probe(probe: &'static str, message: impl Into<String>) -> Self {
        Self::Probe {
            probe,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MemoryReading {
    pub active_bytes: u64,
    pub total_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct DiskReading {
    pub mount: String,
    pub used_percent: f64,
}

#[derive(Debug, Clone)]
pub struct NetReading {
    pub iface: String,
    pub rx_bytes_total: u64,
    pub tx_bytes_total: u64,
}

/// Seam between the HTTP handler and the operating system. Readings are
/// synchronous; [`collect_snapshot`] moves them onto blocking tasks.
pub trait MetricsSource: Send + Sync + 'static {
    fn cpu_load(&self) -> Result<f64, CollectError>;
    fn memory(&self) -> Result<MemoryReading, CollectError>;
    fn disks(&self) -> Result<Vec<DiskReading>, CollectError>;
    fn network(&self) -> Result<Vec<NetReading>, CollectError>;
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Fan-out/fan-in: all four probes run concurrently with no ordering between
/// them, and the snapshot is built only once every one has finished. A single
/// failing probe fails the whole collection; empty disk or interface lists do
/// not.
pub async fn collect_snapshot(source: Arc<dyn MetricsSource>) -> Result<Snapshot, CollectError> {
    let cpu_task = {
        let source = source.clone();
        task::spawn_blocking(move || source.cpu_load())
    };
    let memory_task = {
        let source = source.clone();
        task::spawn_blocking(move || source.memory())
    };
    let disk_task = {
        let source = source.clone();
        task::spawn_blocking(move || source.disks())
    };
    let net_task = task::spawn_blocking(move || source.network());

    let (cpu, memory, disks, net) = tokio::try_join!(cpu_task, memory_task, disk_task, net_task)?;
    let cpu_usage_percent = cpu?;
    let memory = memory?;
    let disks = disks?;
    let net = net?;

    if memory.total_bytes == 0 {
        return Err(CollectError::probe("memory", "total memory reported as zero"));
    }
    let memory_used_percent = memory.active_bytes as f64 / memory.total_bytes as f64 * 100.0;

    let first_net = net.first();
    Ok(Snapshot {
        cpu_usage_percent,
        memory_used_percent,
        disk_used_percent: disks.first().map(|d| d.used_percent),
        network_rx_mb: first_net.map(|n| n.rx_bytes_total as f64 / BYTES_PER_MB),
        network_tx_mb: first_net.map(|n| n.tx_bytes_total as f64 / BYTES_PER_MB),
    })
}
