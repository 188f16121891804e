use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Pixel resolution of a display or a camera preview stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned integer rectangle.
///
/// Follows the usual platform convention: `right` and `bottom` are
/// exclusive for point containment, while rectangle containment compares
/// edges inclusively. An empty rectangle contains nothing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rect from its top-left corner and size.
    pub const fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(
            left,
            top,
            left.saturating_add(width),
            top.saturating_add(height),
        )
    }

    /// Saturates at `i32::MAX` for rects wider than the `i32` range.
    #[inline]
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// `left <= x < right && top <= y < bottom` on a non-empty rect.
    #[inline]
    pub fn contains_point(&self, p: Point2<i32>) -> bool {
        !self.is_empty()
            && p.x >= self.left
            && p.x < self.right
            && p.y >= self.top
            && p.y < self.bottom
    }

    /// True when `other` lies inside or on the edges of this (non-empty) rect.
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        !self.is_empty()
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_containment_is_half_open() {
        let r = Rect::new(10, 20, 30, 40);
        assert!(r.contains_point(Point2::new(10, 20)));
        assert!(r.contains_point(Point2::new(29, 39)));
        assert!(!r.contains_point(Point2::new(30, 25)));
        assert!(!r.contains_point(Point2::new(15, 40)));
        assert!(!r.contains_point(Point2::new(9, 25)));
    }

    #[test]
    fn rect_containment_includes_shared_edges() {
        let outer = Rect::new(0, 0, 100, 100);
        assert!(outer.contains_rect(&outer));
        assert!(outer.contains_rect(&Rect::new(0, 10, 100, 90)));
        assert!(!outer.contains_rect(&Rect::new(-1, 10, 50, 50)));
        assert!(!outer.contains_rect(&Rect::new(10, 10, 101, 50)));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let empty = Rect::new(5, 5, 5, 10);
        assert!(empty.is_empty());
        assert!(!empty.contains_rect(&Rect::new(5, 5, 5, 10)));
        assert!(!empty.contains_point(Point2::new(5, 6)));
    }

    #[test]
    fn origin_size_constructor() {
        let r = Rect::from_origin_size(3, 4, 10, 20);
        assert_eq!(r, Rect::new(3, 4, 13, 24));
        assert_eq!(r.width(), 10);
        assert_eq!(r.height(), 20);
    }

    #[test]
    fn extent_saturates_on_huge_rects() {
        let r = Rect::new(i32::MIN, -10, i32::MAX, 10);
        assert_eq!(r.width(), i32::MAX);
        assert_eq!(r.height(), 20);
        assert_eq!(Rect::from_origin_size(i32::MAX - 1, 0, 10, 10).right, i32::MAX);
    }
}
