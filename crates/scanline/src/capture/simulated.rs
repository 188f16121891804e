//! In-process capture source for replays and tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scanline_core::Resolution;

use super::{CapabilityMissing, CaptureError, CaptureSettings, CaptureSource, SourceFactory};

/// Counters shared by every source a [`SimulatedFactory`] builds.
#[derive(Debug, Default)]
pub struct SimulatedStats {
    starts: AtomicUsize,
    failed_starts: AtomicUsize,
    stops: AtomicUsize,
    releases: AtomicUsize,
    builds: AtomicUsize,
    pending_failures: AtomicUsize,
}

impl SimulatedStats {
    /// Successful starts.
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn failed_starts(&self) -> usize {
        self.failed_starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Make the next `n` start attempts fail.
    pub fn fail_next_starts(&self, n: usize) {
        self.pending_failures.store(n, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Capture source with a fixed preview size.
#[derive(Debug)]
pub struct SimulatedSource {
    preview: Resolution,
    running: bool,
    released: bool,
    stats: Arc<SimulatedStats>,
}

impl SimulatedSource {
    pub fn new(preview: Resolution) -> Self {
        Self::with_stats(preview, Arc::default())
    }

    pub fn with_stats(preview: Resolution, stats: Arc<SimulatedStats>) -> Self {
        Self {
            preview,
            running: false,
            released: false,
            stats,
        }
    }

    pub fn stats(&self) -> &Arc<SimulatedStats> {
        &self.stats
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl CaptureSource for SimulatedSource {
    fn start(&mut self) -> Result<(), CaptureError> {
        if self.released {
            return Err(CaptureError::StartFailed {
                reason: "source already released".to_string(),
            });
        }
        if self.stats.take_failure() {
            self.stats.failed_starts.fetch_add(1, Ordering::SeqCst);
            return Err(CaptureError::StartFailed {
                reason: "simulated camera failure".to_string(),
            });
        }
        self.running = true;
        self.stats.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
        self.stats.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&mut self) {
        self.running = false;
        self.released = true;
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
    }

    fn preview_size(&self) -> Option<Resolution> {
        (!self.released).then_some(self.preview)
    }
}

/// Factory producing [`SimulatedSource`]s, or a capability failure.
#[derive(Clone, Debug)]
pub struct SimulatedFactory {
    preview: Resolution,
    unavailable: Option<CapabilityMissing>,
    stats: Arc<SimulatedStats>,
}

impl SimulatedFactory {
    pub fn new(preview: Resolution) -> Self {
        Self {
            preview,
            unavailable: None,
            stats: Arc::default(),
        }
    }

    /// Make every `build` fail with `reason`.
    pub fn unavailable(mut self, reason: CapabilityMissing) -> Self {
        self.unavailable = Some(reason);
        self
    }

    pub fn stats(&self) -> Arc<SimulatedStats> {
        Arc::clone(&self.stats)
    }
}

impl SourceFactory for SimulatedFactory {
    type Source = SimulatedSource;

    fn build(&self, _settings: &CaptureSettings) -> Result<SimulatedSource, CapabilityMissing> {
        if let Some(reason) = self.unavailable {
            return Err(reason);
        }
        self.stats.builds.fetch_add(1, Ordering::SeqCst);
        Ok(SimulatedSource::with_stats(
            self.preview,
            Arc::clone(&self.stats),
        ))
    }
}
