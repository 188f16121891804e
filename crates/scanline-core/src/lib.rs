//! Core geometry for camera barcode scanning.
//!
//! This crate is small and purely geometric. It knows nothing about cameras
//! or detection engines; it answers one question: given the screen, the
//! camera preview and a detected barcode rect, is the barcode aligned on the
//! viewfinder's laser line?
//!
//! ```
//! use scanline_core::{accept, FramingBounds, Rect, Resolution, ViewfinderGeometry};
//!
//! let screen = Resolution::new(1920, 1080);
//! let preview = Resolution::new(1600, 1024);
//! let vf = ViewfinderGeometry::for_screen(screen, &FramingBounds::default());
//!
//! let barcode = Rect::new(500, 400, 800, 560);
//! let ok = accept(Some(screen), Some(&vf.rect), Some(preview), Some(&barcode), vf.mid_y);
//! assert!(ok);
//! ```

mod acceptance;
mod error;
mod framing;
mod geometry;
mod mapping;

pub use acceptance::{accept, on_scan_line};
pub use error::GeometryError;
pub use framing::{
    desired_dimension_in_range, framing_rect, laser_line_y, FramingBounds, ViewfinderGeometry,
};
pub use geometry::{Rect, Resolution};
pub use mapping::{map_to_screen, PreviewToScreen};

pub use nalgebra::Point2;
