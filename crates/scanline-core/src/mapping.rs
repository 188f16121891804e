//! Preview-space to screen-space mapping.
//!
//! Each axis is scaled independently by `screen / preview`. No aspect-ratio
//! correction is applied: a preview with a different aspect ratio than the
//! screen is stretched, which is what the camera surface does on screen too.

use nalgebra::Vector2;

use crate::{GeometryError, Rect, Resolution};

/// Per-axis scale from preview space to screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewToScreen {
    pub scale: Vector2<f64>,
}

impl PreviewToScreen {
    /// Scale factors for `preview -> screen`.
    ///
    /// Fails with [`GeometryError::InvalidInput`] when the preview has a zero
    /// dimension.
    pub fn new(screen: Resolution, preview: Resolution) -> Result<Self, GeometryError> {
        if preview.is_degenerate() {
            return Err(GeometryError::InvalidInput {
                width: preview.width,
                height: preview.height,
            });
        }
        Ok(Self {
            scale: Vector2::new(
                f64::from(screen.width) / f64::from(preview.width),
                f64::from(screen.height) / f64::from(preview.height),
            ),
        })
    }

    /// Scale every edge and truncate toward zero.
    #[inline]
    pub fn map_rect(&self, raw: &Rect) -> Rect {
        Rect::new(
            scale_edge(raw.left, self.scale.x),
            scale_edge(raw.top, self.scale.y),
            scale_edge(raw.right, self.scale.x),
            scale_edge(raw.bottom, self.scale.y),
        )
    }
}

/// Map `raw` (preview space) into screen space.
pub fn map_to_screen(
    screen: Resolution,
    preview: Resolution,
    raw: &Rect,
) -> Result<Rect, GeometryError> {
    Ok(PreviewToScreen::new(screen, preview)?.map_rect(raw))
}

#[inline]
fn scale_edge(v: i32, ratio: f64) -> i32 {
    // `as` truncates toward zero and saturates at the i32 range.
    (f64::from(v) * ratio) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ratios_follow_resolutions() {
        let m = PreviewToScreen::new(Resolution::new(1920, 1080), Resolution::new(1600, 1024))
            .unwrap();
        assert_relative_eq!(m.scale.x, 1.2);
        assert_relative_eq!(m.scale.y, 1080.0 / 1024.0);
    }

    #[test]
    fn doubles_when_preview_is_half_the_screen() {
        let mapped = map_to_screen(
            Resolution::new(1000, 1000),
            Resolution::new(500, 500),
            &Rect::new(200, 230, 300, 270),
        )
        .unwrap();
        assert_eq!(mapped, Rect::new(400, 460, 600, 540));
    }

    #[test]
    fn edges_truncate_toward_zero() {
        let m = PreviewToScreen::new(Resolution::new(1000, 1000), Resolution::new(300, 300))
            .unwrap();
        // 10 * 3.333.. = 33.33 -> 33, -10 * 3.333.. = -33.33 -> -33
        let mapped = m.map_rect(&Rect::new(10, -10, 11, 1));
        assert_eq!(mapped, Rect::new(33, -33, 36, 3));
    }

    #[test]
    fn axes_scale_independently() {
        let mapped = map_to_screen(
            Resolution::new(800, 400),
            Resolution::new(400, 400),
            &Rect::new(10, 10, 20, 20),
        )
        .unwrap();
        assert_eq!(mapped, Rect::new(20, 10, 40, 20));
    }

    #[test]
    fn scaling_before_mapping_matches_scaling_after() {
        let screen = Resolution::new(1920, 1080);
        let preview = Resolution::new(640, 480);
        let raw = Rect::new(37, 51, 211, 149);
        for k in [2, 3, 5] {
            let scaled_raw = Rect::new(raw.left * k, raw.top * k, raw.right * k, raw.bottom * k);
            let a = map_to_screen(screen, preview, &scaled_raw).unwrap();
            let b = map_to_screen(screen, preview, &raw).unwrap();
            // Truncation error of the unscaled mapping grows by at most k.
            assert!((a.left - b.left * k).abs() <= k);
            assert!((a.top - b.top * k).abs() <= k);
            assert!((a.right - b.right * k).abs() <= k);
            assert!((a.bottom - b.bottom * k).abs() <= k);
        }
    }

    #[test]
    fn zero_preview_dimension_is_invalid() {
        let err = map_to_screen(
            Resolution::new(1920, 1080),
            Resolution::new(0, 480),
            &Rect::new(0, 0, 10, 10),
        )
        .unwrap_err();
        assert_eq!(
            err,
            GeometryError::InvalidInput {
                width: 0,
                height: 480
            }
        );
    }
}
