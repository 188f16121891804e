//! Scan-line acceptance predicate.
//!
//! A detection is accepted when its bounding rect, mapped to screen space,
//! lies completely inside the viewfinder and crosses the laser line.

use nalgebra::Point2;

use crate::{PreviewToScreen, Rect, Resolution};

/// True when `mapped` (screen space) is inside `viewfinder` and straddles
/// the laser line at `mid_y`.
///
/// The straddle test samples `(mapped.left + 1, mid_y)`, one pixel right of
/// the left edge. A detection one pixel wide therefore never straddles.
#[inline]
pub fn on_scan_line(viewfinder: &Rect, mapped: &Rect, mid_y: i32) -> bool {
    viewfinder.contains_rect(mapped) && mapped.contains_point(Point2::new(mapped.left + 1, mid_y))
}

/// Full acceptance check on a raw (preview space) detection rect.
///
/// Any missing input means the camera or the overlay is not ready yet and
/// yields `false`, as does a preview resolution that cannot be mapped from.
pub fn accept(
    screen: Option<Resolution>,
    viewfinder: Option<&Rect>,
    preview: Option<Resolution>,
    detection: Option<&Rect>,
    mid_y: i32,
) -> bool {
    let (Some(screen), Some(viewfinder), Some(preview), Some(detection)) =
        (screen, viewfinder, preview, detection)
    else {
        return false;
    };
    match PreviewToScreen::new(screen, preview) {
        Ok(mapping) => on_scan_line(viewfinder, &mapping.map_rect(detection), mid_y),
        Err(_) => false,
    }
}
