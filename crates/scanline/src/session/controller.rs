use std::sync::mpsc::{self, SyncSender};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use scanline_core::{on_scan_line, PreviewToScreen, Resolution, ViewfinderGeometry};
use serde::{Deserialize, Serialize};

use super::{CancelReason, DetectionEvent, DetectionVerdict, ScanOutcome, ScanReceiver, ScanResult};
use crate::capture::{
    CapabilityMissing, CaptureReadiness, CaptureSettings, CaptureSource, CaptureState,
    ReadinessFlags, SourceFactory, StartOutcome,
};
use crate::ScanConfig;

/// Lifecycle phase of a session. Everything but `Scanning` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Scanning,
    Delivered,
    Cancelled,
    Closed,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionPhase::Scanning)
    }
}

struct SessionInner<S> {
    phase: SessionPhase,
    capture: CaptureReadiness<S>,
    tx: Option<SyncSender<ScanOutcome>>,
}

impl<S> SessionInner<S> {
    /// Enter a terminal phase and publish the outcome. The sender is dropped
    /// afterwards, so the channel can never carry a second outcome.
    fn finish(&mut self, phase: SessionPhase, outcome: ScanOutcome) {
        self.phase = phase;
        if let Some(tx) = self.tx.take() {
            if tx.try_send(outcome).is_err() {
                debug!("scan outcome dropped, receiver is gone");
            }
        }
    }

    fn cancel(&mut self, reason: CancelReason) {
        warn!("scan cancelled: {reason:?}");
        self.finish(SessionPhase::Cancelled, ScanOutcome::Cancelled(reason));
    }
}

/// One scanning session.
///
/// Owns the viewfinder geometry, the capture readiness state and the
/// capture source. Platform callbacks map onto the `on_*` methods, which may
/// be called from any thread: a single lock serializes them with detection
/// handling, so at most one outcome is ever produced.
pub struct ScanSession<S> {
    screen: Resolution,
    viewfinder: ViewfinderGeometry,
    settings: CaptureSettings,
    inner: Mutex<SessionInner<S>>,
}

impl<S: CaptureSource> ScanSession<S> {
    /// Create a session for a screen and return it with its result channel.
    ///
    /// A device without a camera yields a session that is already cancelled.
    pub fn new(
        screen: Resolution,
        config: &ScanConfig,
        has_camera: bool,
    ) -> (Self, ScanReceiver) {
        let (tx, rx) = mpsc::sync_channel(1);
        let viewfinder = ViewfinderGeometry::for_screen(screen, &config.framing);
        debug!(
            "viewfinder {:?} (laser line y={}) for screen {}x{}",
            viewfinder.rect, viewfinder.mid_y, screen.width, screen.height
        );

        let mut inner = SessionInner {
            phase: SessionPhase::Scanning,
            capture: CaptureReadiness::new(),
            tx: Some(tx),
        };
        if !has_camera {
            inner.cancel(CancelReason::CapabilityMissing(CapabilityMissing::NoCamera));
        }

        let session = Self {
            screen,
            viewfinder,
            settings: config.capture.clone(),
            inner: Mutex::new(inner),
        };
        (session, ScanReceiver::new(rx))
    }

    pub fn screen(&self) -> Resolution {
        self.screen
    }

    pub fn viewfinder(&self) -> ViewfinderGeometry {
        self.viewfinder
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase
    }

    pub fn readiness(&self) -> ReadinessFlags {
        self.lock().capture.flags()
    }

    pub fn capture_state(&self) -> CaptureState {
        self.lock().capture.state()
    }

    /// The display surface became available.
    pub fn on_surface_created(&self) -> StartOutcome {
        let mut inner = self.lock();
        if inner.phase.is_terminal() {
            return StartOutcome::Waiting;
        }
        inner.capture.surface_created()
    }

    pub fn on_surface_destroyed(&self) {
        self.lock().capture.surface_destroyed();
    }

    /// The scanner came to the foreground.
    ///
    /// `service_available` reports whether the detection service is usable
    /// on this device; if not, the session is cancelled.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub fn on_resume(&self, service_available: bool) -> StartOutcome {
        let mut inner = self.lock();
        if inner.phase.is_terminal() {
            return StartOutcome::Waiting;
        }
        if !service_available {
            inner.cancel(CancelReason::CapabilityMissing(
                CapabilityMissing::DetectionServiceUnavailable,
            ));
            return StartOutcome::Waiting;
        }
        inner.capture.request_start()
    }

    /// The scanner went to the background. Capture stops, the source is kept.
    pub fn on_pause(&self) {
        self.lock().capture.pause();
    }

    /// Camera permission answer. On grant the detector and its capture
    /// source are built through `factory`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, factory))
    )]
    pub fn on_permission_result<F>(&self, granted: bool, factory: &F) -> StartOutcome
    where
        F: SourceFactory<Source = S>,
    {
        let mut inner = self.lock();
        if inner.phase.is_terminal() {
            return StartOutcome::Waiting;
        }
        if !granted {
            inner.cancel(CancelReason::PermissionDenied);
            return StartOutcome::Waiting;
        }
        match factory.build(&self.settings) {
            Ok(source) => inner.capture.attach_source(source),
            Err(missing) => {
                inner.cancel(CancelReason::CapabilityMissing(missing));
                StartOutcome::Waiting
            }
        }
    }

    /// Evaluate one detection from the engine.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
    pub fn on_detection(&self, event: &DetectionEvent) -> DetectionVerdict {
        let mut inner = self.lock();
        if inner.phase.is_terminal() {
            return DetectionVerdict::Ignored;
        }
        let Some(preview) = inner.capture.source().and_then(|s| s.preview_size()) else {
            return DetectionVerdict::Unready;
        };
        let mapping = match PreviewToScreen::new(self.screen, preview) {
            Ok(mapping) => mapping,
            Err(err) => {
                debug!("skipping detection: {err}");
                return DetectionVerdict::Skipped(err);
            }
        };

        let mapped = mapping.map_rect(&event.bounds);
        if !on_scan_line(&self.viewfinder.rect, &mapped, self.viewfinder.mid_y) {
            debug!("detection {mapped:?} not on the scan line");
            return DetectionVerdict::Rejected;
        }

        info!("barcode accepted at {mapped:?}");
        inner.finish(
            SessionPhase::Delivered,
            ScanOutcome::Decoded(ScanResult {
                raw_value: event.raw_value.clone(),
            }),
        );
        DetectionVerdict::Accepted
    }

    /// The user backed out. Returns `false` if the session already ended.
    pub fn cancel(&self) -> bool {
        let mut inner = self.lock();
        if inner.phase.is_terminal() {
            return false;
        }
        inner.cancel(CancelReason::UserAborted);
        true
    }

    /// Tear the session down: release the source and close the channel.
    pub fn on_destroy(&self) {
        let mut inner = self.lock();
        inner.capture.release();
        inner.phase = SessionPhase::Closed;
        inner.tx = None;
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner<S>> {
        // Every transition under the lock is a plain assignment, so the state
        // is consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
