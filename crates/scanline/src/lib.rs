//! Camera barcode scan sessions.
//!
//! This crate provides:
//! - a capture readiness state machine that starts the camera exactly once
//!   when the display surface, a start request and a capture source are all
//!   present,
//! - [`ScanSession`], which evaluates detections from an external barcode
//!   engine against the viewfinder and delivers at most one result,
//! - JSON config and scripted replays for exercising sessions offline.
//!
//! ## Quickstart
//!
//! ```
//! use scanline::capture::SimulatedFactory;
//! use scanline::{DetectionEvent, Rect, Resolution, ScanConfig, ScanSession};
//!
//! let factory = SimulatedFactory::new(Resolution::new(1600, 1024));
//! let (session, results) = ScanSession::new(Resolution::new(1920, 1080), &ScanConfig::default(), true);
//!
//! session.on_surface_created();
//! session.on_permission_result(true, &factory);
//! session.on_resume(true);
//!
//! session.on_detection(&DetectionEvent::new(Rect::new(500, 400, 800, 560), "4006381333931"));
//! let outcome = results.recv().unwrap();
//! assert_eq!(outcome.raw_value(), Some("4006381333931"));
//! ```
//!
//! Geometry lives in `scanline-core` and is re-exported here.

pub mod capture;
mod io;
pub mod replay;
mod session;

pub use io::{ConfigError, ScanConfig};
pub use session::{
    CancelReason, DetectionEvent, DetectionVerdict, Disconnected, ScanOutcome, ScanReceiver,
    ScanResult, ScanSession, SessionPhase,
};

pub use scanline_core as core;
pub use scanline_core::{FramingBounds, GeometryError, Rect, Resolution, ViewfinderGeometry};
