use crate::client::{DisplayState, StatsFetcher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Polling scheduler for the stats endpoint. Two states: monitoring (timer
/// armed) and paused. `start` and `pause` are both idempotent and independent
/// of any rendering layer. Pausing stops the timer only; an in-flight request
/// keeps running, and its result is discarded through the generation check in
/// the loop below.
pub struct Sampler<F> {
    fetcher: Arc<F>,
    interval: Duration,
    display: Arc<RwLock<DisplayState>>,
    generation: Arc<AtomicU64>,
    stop: Option<watch::Sender<bool>>,
}

impl<F: StatsFetcher> Sampler<F> {
    pub fn new(fetcher: F, interval: Duration) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            interval,
            display: Arc::new(RwLock::new(DisplayState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            stop: None,
        }
    }

    pub fn display(&self) -> Arc<RwLock<DisplayState>> {
        self.display.clone()
    }

    pub fn is_monitoring(&self) -> bool {
        self.stop.is_some()
    }

    /// Arms the timer: one fetch right away, then one per interval. A no-op
    /// when already monitoring.
    pub fn start(&mut self) {
        if self.stop.is_some() {
            return;
        }
        // Every start opens a new generation; results tagged with an older
        // one are thrown away when they arrive.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = watch::channel(false);
        self.stop = Some(tx);
        tokio::spawn(sampling_loop(
            self.fetcher.clone(),
            self.display.clone(),
            self.generation.clone(),
            generation,
            self.interval,
            rx,
        ));
    }

    /// Disarms the timer and invalidates whatever fetch is still in flight.
    /// The last-known display state stays as it was.
    pub fn pause(&mut self) {
        if let Some(stop) = self.stop.take() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            let _ = stop.send(true);
        }
    }
}

async fn sampling_loop<F: StatsFetcher>(
    fetcher: Arc<F>,
    display: Arc<RwLock<DisplayState>>,
    generation: Arc<AtomicU64>,
    my_generation: u64,
    interval: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            _ = ticker.tick() => {
                let result = fetcher.fetch().await;
                if generation.load(Ordering::SeqCst) != my_generation {
                    debug!("discarding stale sample");
                    break;
                }
                match result {
                    Ok(payload) => display.write().await.apply(&payload),
                    Err(err) => warn!(error = %err, "stats fetch failed"),
                }
            }
        }
    }
}
