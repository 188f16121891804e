//! Capture source seams and the readiness state machine that starts them.

mod readiness;
mod simulated;

pub use readiness::{CaptureReadiness, CaptureState, ReadinessFlags, StartOutcome};
pub use simulated::{SimulatedFactory, SimulatedSource, SimulatedStats};

use scanline_core::Resolution;
use serde::{Deserialize, Serialize};

/// Errors raised by a capture source.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("capture start failed: {reason}")]
    StartFailed { reason: String },
}

/// Reasons a device cannot scan at all.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityMissing {
    #[error("device has no camera")]
    NoCamera,
    #[error("barcode detection service is unavailable")]
    DetectionServiceUnavailable,
    #[error("barcode detector dependencies are unavailable (low_storage={low_storage})")]
    DetectorUnavailable { low_storage: bool },
}

/// A running camera feeding the detection engine.
///
/// `stop` keeps the underlying resources so that `start` can be called
/// again; `release` frees them for good.
pub trait CaptureSource {
    fn start(&mut self) -> Result<(), CaptureError>;
    fn stop(&mut self);
    fn release(&mut self);
    /// Negotiated preview size, known once the camera has been opened.
    fn preview_size(&self) -> Option<Resolution>;
}

/// Builds the detector and its camera source once permission is granted.
pub trait SourceFactory {
    type Source: CaptureSource;

    /// Fails when the detector is not operational on this device.
    fn build(&self, settings: &CaptureSettings) -> Result<Self::Source, CapabilityMissing>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    Back,
    Front,
}

/// Settings handed to the source factory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub facing: CameraFacing,
    /// Preview size requested from the camera; the driver picks the closest
    /// supported one.
    pub requested_preview: Resolution,
    pub requested_fps: f32,
    pub auto_focus: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Back,
            requested_preview: Resolution::new(1600, 1024),
            requested_fps: 15.0,
            auto_focus: true,
        }
    }
}
