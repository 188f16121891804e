//! Scan session: one scanner screen from creation to teardown.

mod controller;
mod event;
mod outcome;

pub use controller::{ScanSession, SessionPhase};
pub use event::{DetectionEvent, DetectionVerdict};
pub use outcome::{CancelReason, Disconnected, ScanOutcome, ScanReceiver, ScanResult};
