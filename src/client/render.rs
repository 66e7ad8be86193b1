use crate::client::classify::{
    classify, classify_throughput, CPU_CUTOFFS, DISK_CUTOFFS, RAM_CUTOFFS,
};
use crate::client::{DisplayState, ASSUMED_RAM_TOTAL_GB};

/// Renders the display state as terminal lines. Absent metrics come out as
/// `n/a`; a value is only classified after it has been matched as present.
pub fn render(state: &DisplayState) -> String {
    [
        cpu_line(state),
        ram_line(state),
        disk_line(state),
        net_line(state),
    ]
    .join("\n")
}

fn cpu_line(state: &DisplayState) -> String {
    match state.cpu_percent {
        Some(value) => format!(
            "cpu   {value:6.2} %                      [{}]",
            classify(value, CPU_CUTOFFS).label()
        ),
        None => "cpu      n/a".to_string(),
    }
}

fn ram_line(state: &DisplayState) -> String {
    match (state.ram_percent, state.ram_used_gb()) {
        (Some(percent), Some(used_gb)) => format!(
            "ram   {percent:6.2} % ({used_gb:.2} GB / {ASSUMED_RAM_TOTAL_GB} GB assumed)  [{}]",
            classify(percent, RAM_CUTOFFS).label()
        ),
        _ => "ram      n/a".to_string(),
    }
}

fn disk_line(state: &DisplayState) -> String {
    match state.disk_percent {
        Some(value) => format!(
            "disk  {value:6.2} %                      [{}]",
            classify(value, DISK_CUTOFFS).label()
        ),
        None => "disk     n/a".to_string(),
    }
}

fn net_line(state: &DisplayState) -> String {
    match (state.net_rx_mb, state.net_tx_mb) {
        (Some(rx), Some(tx)) => format!(
            "net   {rx:6.2} MB rx / {tx:.2} MB tx     [{}]",
            classify_throughput(rx).label()
        ),
        _ => "net      n/a".to_string(),
    }
}
