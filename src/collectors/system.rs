use crate::collectors::{CollectError, DiskReading, MemoryReading, MetricsSource, NetReading};
use std::thread;
use std::time::Duration;
use sysinfo::{CpuExt, DiskExt, NetworkExt, NetworksExt, System, SystemExt};

/// Delay between the two CPU refreshes; sysinfo derives usage from the delta
/// of consecutive reads and needs a minimum window between them.
const CPU_SAMPLE_WINDOW: Duration = Duration::from_millis(250);

/// [`MetricsSource`] backed by sysinfo. Each probe builds its own `System`
/// and refreshes only the subsystem it reads, so the four probes stay
/// independent and can run on separate blocking tasks.
pub struct SysinfoSource;

impl MetricsSource for SysinfoSource {
    fn cpu_load(&self) -> Result<f64, CollectError> {
        let mut system = System::new();
        system.refresh_cpu();
        thread::sleep(CPU_SAMPLE_WINDOW);
        system.refresh_cpu();

        if system.cpus().is_empty() {
            return Err(CollectError::probe("cpu", "no cpus reported"));
        }
        let sum: f32 = system.cpus().iter().map(|c| c.cpu_usage()).sum();
        Ok((sum / system.cpus().len() as f32) as f64)
    }

    fn memory(&self) -> Result<MemoryReading, CollectError> {
        let mut system = System::new();
        system.refresh_memory();
        Ok(MemoryReading {
            active_bytes: system.used_memory() * 1024,
            total_bytes: system.total_memory() * 1024,
        })
    }

    fn disks(&self) -> Result<Vec<DiskReading>, CollectError> {
        let mut system = System::new();
        system.refresh_disks_list();
        system.refresh_disks();

        Ok(system
            .disks()
            .iter()
            .map(|d| {
                let total = d.total_space();
                let used = total.saturating_sub(d.available_space());
                let used_percent = if total > 0 {
                    used as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                DiskReading {
                    mount: d.mount_point().to_string_lossy().to_string(),
                    used_percent,
                }
            })
            .collect())
    }

    fn network(&self) -> Result<Vec<NetReading>, CollectError> {
        let mut system = System::new();
        system.refresh_networks_list();
        system.refresh_networks();

        let mut out: Vec<NetReading> = system
            .networks()
            .iter()
            .map(|(iface, data)| NetReading {
                iface: iface.to_string(),
                rx_bytes_total: data.total_received(),
                tx_bytes_total: data.total_transmitted(),
            })
            .collect();
        // sysinfo hands interfaces back in hash order; sort by name so
        // "first interface" is stable across polls.
        out.sort_by(|a, b| a.iface.cmp(&b.iface));
        Ok(out)
    }
}
