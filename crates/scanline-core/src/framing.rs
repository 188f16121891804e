//! Viewfinder framing rectangle.
//!
//! The viewfinder covers 5/8 of the screen on each axis, bounded by hard
//! minimum and maximum sizes, and is centered on the screen. The bounds keep
//! the user far enough from the barcode for the image to be in focus.

use serde::{Deserialize, Serialize};

use crate::{Rect, Resolution};

const TARGET_NUM: i64 = 5;
const TARGET_DEN: i64 = 8;

/// Hard size bounds for the viewfinder rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingBounds {
    pub min_width: u32,
    pub min_height: u32,
    /// 5/8 of 1920.
    pub max_width: u32,
    /// 5/8 of 1080.
    pub max_height: u32,
    /// Additionally cap the rect at the screen size.
    ///
    /// Off by default: on screens smaller than the minimum bounds the
    /// viewfinder then extends past the screen edges.
    pub clamp_to_screen: bool,
}

impl Default for FramingBounds {
    fn default() -> Self {
        Self {
            min_width: 240,
            min_height: 240,
            max_width: 1200,
            max_height: 675,
            clamp_to_screen: false,
        }
    }
}

/// Viewfinder rect in screen coordinates plus the y of its laser line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewfinderGeometry {
    pub rect: Rect,
    pub mid_y: i32,
}

impl ViewfinderGeometry {
    /// Compute the viewfinder for a screen.
    pub fn for_screen(screen: Resolution, bounds: &FramingBounds) -> Self {
        let rect = framing_rect(screen, bounds);
        Self {
            rect,
            mid_y: laser_line_y(&rect),
        }
    }
}

/// Centered framing rect for `screen`.
pub fn framing_rect(screen: Resolution, bounds: &FramingBounds) -> Rect {
    let mut width =
        desired_dimension_in_range(screen.width, bounds.min_width, bounds.max_width);
    let mut height =
        desired_dimension_in_range(screen.height, bounds.min_height, bounds.max_height);
    if bounds.clamp_to_screen {
        width = width.min(i64::from(screen.width));
        height = height.min(i64::from(screen.height));
    }

    let left = (i64::from(screen.width) - width) / 2;
    let top = (i64::from(screen.height) - height) / 2;
    Rect::new(
        saturate(left),
        saturate(top),
        saturate(left + width),
        saturate(top + height),
    )
}

/// Vertical center of the viewfinder, where the laser line is drawn.
pub fn laser_line_y(rect: &Rect) -> i32 {
    let top = i64::from(rect.top);
    // Lies between top and bottom, so it always fits back into i32.
    saturate((i64::from(rect.bottom) - top) / 2 + top)
}

/// 5/8 of `resolution`, raised to `hard_min` or lowered to `hard_max`.
///
/// The minimum is checked first, so inconsistent bounds (`min > max`) still
/// produce a deterministic size.
pub fn desired_dimension_in_range(resolution: u32, hard_min: u32, hard_max: u32) -> i64 {
    let dim = TARGET_NUM * i64::from(resolution) / TARGET_DEN;
    if dim < i64::from(hard_min) {
        return i64::from(hard_min);
    }
    if dim > i64::from(hard_max) {
        return i64::from(hard_max);
    }
    dim
}

fn saturate(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}
