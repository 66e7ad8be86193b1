/// Status band for metrics where lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Good,
    Warning,
    Critical,
}

impl Band {
    pub fn label(self) -> &'static str {
        match self {
            Band::Good => "good",
            Band::Warning => "warning",
            Band::Critical => "critical",
        }
    }
}

/// Inverted scale for throughput, where higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThroughputBand {
    Fast,
    Moderate,
    Slow,
}

impl ThroughputBand {
    pub fn label(self) -> &'static str {
        match self {
            ThroughputBand::Fast => "fast",
            ThroughputBand::Moderate => "moderate",
            ThroughputBand::Slow => "slow",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Cutoffs {
    pub good: f64,
    pub warning: f64,
}

pub const CPU_CUTOFFS: Cutoffs = Cutoffs {
    good: 50.0,
    warning: 75.0,
};
pub const RAM_CUTOFFS: Cutoffs = Cutoffs {
    good: 60.0,
    warning: 80.0,
};
pub const DISK_CUTOFFS: Cutoffs = Cutoffs {
    good: 60.0,
    warning: 80.0,
};

/// Half-open bands: `value < good` is good, `good <= value < warning` is
/// warning, everything else is critical.
pub fn classify(value: f64, cutoffs: Cutoffs) -> Band {
    if value < cutoffs.good {
        Band::Good
    } else if value < cutoffs.warning {
        Band::Warning
    } else {
        Band::Critical
    }
}

/// Classifies the cumulative MB counter the collector reports. This is a
/// total since boot, not a true rate; the fast/moderate/slow reading is kept
/// as-is from the dashboard it replaces.
pub fn classify_throughput(megabytes: f64) -> ThroughputBand {
    if megabytes > 50.0 {
        ThroughputBand::Fast
    } else if megabytes > 10.0 {
        ThroughputBand::Moderate
    } else {
        ThroughputBand::Slow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_half_open() {
        let cutoffs = Cutoffs {
            good: 50.0,
            warning: 75.0,
        };
        assert_eq!(classify(0.0, cutoffs), Band::Good);
        assert_eq!(classify(49.999, cutoffs), Band::Good);
        assert_eq!(classify(50.0, cutoffs), Band::Warning);
        assert_eq!(classify(74.999, cutoffs), Band::Warning);
        assert_eq!(classify(75.0, cutoffs), Band::Critical);
        assert_eq!(classify(100.0, cutoffs), Band::Critical);
        // Out-of-range values are not clamped anywhere upstream.
        assert_eq!(classify(140.0, cutoffs), Band::Critical);
        assert_eq!(classify(-5.0, cutoffs), Band::Good);
    }

    #[test]
    fn metric_cutoffs_match_the_fixed_table() {
        assert_eq!(classify(49.0, CPU_CUTOFFS), Band::Good);
        assert_eq!(classify(60.0, CPU_CUTOFFS), Band::Warning);
        assert_eq!(classify(80.0, CPU_CUTOFFS), Band::Critical);

        assert_eq!(classify(59.0, RAM_CUTOFFS), Band::Good);
        assert_eq!(classify(60.0, RAM_CUTOFFS), Band::Warning);
        assert_eq!(classify(80.0, RAM_CUTOFFS), Band::Critical);

        assert_eq!(classify(59.0, DISK_CUTOFFS), Band::Good);
        assert_eq!(classify(79.0, DISK_CUTOFFS), Band::Warning);
        assert_eq!(classify(80.0, DISK_CUTOFFS), Band::Critical);
    }

    #[test]
    fn throughput_scale_is_inverted_and_exclusive() {
        assert_eq!(classify_throughput(50.01), ThroughputBand::Fast);
        assert_eq!(classify_throughput(50.0), ThroughputBand::Moderate);
        assert_eq!(classify_throughput(10.01), ThroughputBand::Moderate);
        assert_eq!(classify_throughput(10.0), ThroughputBand::Slow);
        assert_eq!(classify_throughput(0.0), ThroughputBand::Slow);
    }
}
