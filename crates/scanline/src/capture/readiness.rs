//! Capture readiness state machine.
//!
//! Capture may only start once three independent preconditions hold at the
//! same time:
//! - the display surface exists,
//! - a start was requested (the scanner came to the foreground),
//! - a capture source was constructed (permission granted, detector built).
//!
//! The start request is edge-triggered: it is consumed by a successful start,
//! so re-evaluating readiness never starts capture twice.

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use super::{CaptureError, CaptureSource};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessFlags {
    pub surface_available: bool,
    pub start_requested: bool,
    pub source_constructed: bool,
}

impl ReadinessFlags {
    pub fn all_set(&self) -> bool {
        self.surface_available && self.start_requested && self.source_constructed
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    #[default]
    Idle,
    Active,
}

/// Result of evaluating readiness after an input event.
#[derive(Debug)]
pub enum StartOutcome {
    /// At least one precondition is missing.
    Waiting,
    Started,
    /// Capture was already running; the start request was absorbed.
    AlreadyActive,
    /// The source failed to start and has been released.
    Failed(CaptureError),
}

impl StartOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, StartOutcome::Started)
    }
}

/// Tracks readiness flags and owns the capture source.
#[derive(Debug)]
pub struct CaptureReadiness<S> {
    surface_available: bool,
    start_requested: bool,
    source: Option<S>,
    state: CaptureState,
}

impl<S> Default for CaptureReadiness<S> {
    fn default() -> Self {
        Self {
            surface_available: false,
            start_requested: false,
            source: None,
            state: CaptureState::Idle,
        }
    }
}

impl<S: CaptureSource> CaptureReadiness<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> ReadinessFlags {
        ReadinessFlags {
            surface_available: self.surface_available,
            start_requested: self.start_requested,
            source_constructed: self.source.is_some(),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn surface_created(&mut self) -> StartOutcome {
        self.surface_available = true;
        self.start_if_ready()
    }

    pub fn surface_destroyed(&mut self) {
        self.surface_available = false;
    }

    pub fn request_start(&mut self) -> StartOutcome {
        self.start_requested = true;
        self.start_if_ready()
    }

    /// Hand over a freshly built source. A previously held source is released.
    pub fn attach_source(&mut self, source: S) -> StartOutcome {
        if let Some(mut old) = self.source.replace(source) {
            warn!("replacing an existing capture source; releasing the old one");
            old.release();
            self.state = CaptureState::Idle;
        }
        self.start_if_ready()
    }

    /// Stop capture but keep the source for a later resume.
    pub fn pause(&mut self) {
        if let Some(source) = self.source.as_mut() {
            source.stop();
            if self.state == CaptureState::Active {
                info!("capture stopped");
            }
        }
        self.state = CaptureState::Idle;
    }

    /// Release and drop the source.
    pub fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            info!("capture source released");
        }
        self.state = CaptureState::Idle;
    }

    /// Start capture when all three flags are set.
    pub fn start_if_ready(&mut self) -> StartOutcome {
        let flags = self.flags();
        if !flags.all_set() {
            debug!("capture not ready: {flags:?}");
            return StartOutcome::Waiting;
        }
        if self.state == CaptureState::Active {
            self.start_requested = false;
            debug!("capture already active, start request absorbed");
            return StartOutcome::AlreadyActive;
        }
        let Some(source) = self.source.as_mut() else {
            return StartOutcome::Waiting;
        };

        match source.start() {
            Ok(()) => {
                self.start_requested = false;
                self.state = CaptureState::Active;
                info!("capture started");
                StartOutcome::Started
            }
            Err(err) => {
                error!("{err}; releasing capture source");
                self.release();
                StartOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{SimulatedSource, SimulatedStats};
    use scanline_core::Resolution;
    use std::sync::Arc;

    fn source(stats: &Arc<SimulatedStats>) -> SimulatedSource {
        SimulatedSource::with_stats(Resolution::new(640, 480), Arc::clone(stats))
    }

    #[test]
    fn two_of_three_flags_never_start() {
        let stats = Arc::new(SimulatedStats::default());

        let mut a: CaptureReadiness<SimulatedSource> = CaptureReadiness::new();
        assert!(matches!(a.surface_created(), StartOutcome::Waiting));
        assert!(matches!(a.request_start(), StartOutcome::Waiting));

        let mut b = CaptureReadiness::new();
        assert!(matches!(b.surface_created(), StartOutcome::Waiting));
        assert!(matches!(b.attach_source(source(&stats)), StartOutcome::Waiting));

        let mut c = CaptureReadiness::new();
        assert!(matches!(c.request_start(), StartOutcome::Waiting));
        assert!(matches!(c.attach_source(source(&stats)), StartOutcome::Waiting));

        assert_eq!(stats.starts(), 0);
    }

    #[test]
    fn third_flag_starts_exactly_once() {
        let stats = Arc::new(SimulatedStats::default());
        let mut r = CaptureReadiness::new();
        r.request_start();
        r.attach_source(source(&stats));
        assert!(r.surface_created().is_started());
        assert_eq!(stats.starts(), 1);
        assert_eq!(r.state(), CaptureState::Active);

        let flags = r.flags();
        assert!(!flags.start_requested);
        assert!(flags.surface_available);
        assert!(flags.source_constructed);

        // Re-checking readiness or re-creating the surface does not restart.
        assert!(matches!(r.start_if_ready(), StartOutcome::Waiting));
        assert!(matches!(r.surface_created(), StartOutcome::Waiting));
        assert_eq!(stats.starts(), 1);
    }

    #[test]
    fn start_request_while_active_is_absorbed() {
        let stats = Arc::new(SimulatedStats::default());
        let mut r = CaptureReadiness::new();
        r.surface_created();
        r.attach_source(source(&stats));
        assert!(r.request_start().is_started());

        assert!(matches!(r.request_start(), StartOutcome::AlreadyActive));
        assert!(!r.flags().start_requested);
        assert_eq!(stats.starts(), 1);
    }

    #[test]
    fn failed_start_releases_source_and_allows_new_cycle() {
        let stats = Arc::new(SimulatedStats::default());
        stats.fail_next_starts(1);

        let mut r = CaptureReadiness::new();
        r.surface_created();
        r.attach_source(source(&stats));
        assert!(matches!(r.request_start(), StartOutcome::Failed(_)));
        assert_eq!(r.state(), CaptureState::Idle);
        assert!(!r.flags().source_constructed);
        assert_eq!(stats.releases(), 1);

        // No automatic retry.
        assert!(matches!(r.start_if_ready(), StartOutcome::Waiting));

        // The start request survives the failure; a new source completes
        // the next cycle.
        assert!(r.flags().start_requested);
        assert!(r.attach_source(source(&stats)).is_started());
        assert_eq!(stats.starts(), 1);
        assert_eq!(stats.failed_starts(), 1);
    }

    #[test]
    fn pause_stops_without_release_and_resume_restarts() {
        let stats = Arc::new(SimulatedStats::default());
        let mut r = CaptureReadiness::new();
        r.surface_created();
        r.attach_source(source(&stats));
        assert!(r.request_start().is_started());

        r.pause();
        assert_eq!(r.state(), CaptureState::Idle);
        assert!(r.flags().source_constructed);
        assert_eq!(stats.stops(), 1);
        assert_eq!(stats.releases(), 0);

        assert!(r.request_start().is_started());
        assert_eq!(stats.starts(), 2);
    }

    #[test]
    fn release_without_source_is_harmless() {
        let mut r: CaptureReadiness<SimulatedSource> = CaptureReadiness::new();
        r.release();
        r.pause();
        assert_eq!(r.state(), CaptureState::Idle);
    }

    #[test]
    fn surface_loss_blocks_next_start() {
        let stats = Arc::new(SimulatedStats::default());
        let mut r = CaptureReadiness::new();
        r.surface_created();
        r.attach_source(source(&stats));
        r.request_start();
        r.pause();
        r.surface_destroyed();

        assert!(matches!(r.request_start(), StartOutcome::Waiting));
        assert!(r.flags().start_requested);
        assert!(r.surface_created().is_started());
        assert_eq!(stats.starts(), 2);
    }
}
