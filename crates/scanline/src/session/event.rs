use scanline_core::{GeometryError, Rect};
use serde::{Deserialize, Serialize};

/// One candidate barcode reported by the detection engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// Bounding box in preview coordinates.
    pub bounds: Rect,
    /// Decoded barcode text.
    pub raw_value: String,
}

impl DetectionEvent {
    pub fn new(bounds: Rect, raw_value: impl Into<String>) -> Self {
        Self {
            bounds,
            raw_value: raw_value.into(),
        }
    }
}

/// What the session did with a detection event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionVerdict {
    /// Became the session result.
    Accepted,
    /// Not inside the viewfinder or not on the laser line.
    Rejected,
    /// No capture source or preview size yet.
    Unready,
    /// The detection could not be mapped to screen space.
    Skipped(GeometryError),
    /// The session already has an outcome or was torn down.
    Ignored,
}
